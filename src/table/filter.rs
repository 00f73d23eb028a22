//! Fuzzy ranking for the global table filter
//!
//! Ranks a query against an item string in tiers, from an exact
//! case-sensitive match down to "every query character appears in order".
//! The in-order tier is scored by how tightly the characters cluster, so a
//! typo such as `bitcon` still ranks against `bitcoin`.

/// Match tiers, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ranking {
    NoMatch = 0,
    Matches = 1,
    Acronym = 2,
    Contains = 3,
    WordStartsWith = 4,
    StartsWith = 5,
    Equal = 6,
    CaseSensitiveEqual = 7,
}

/// Outcome of ranking one item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankInfo {
    pub ranking: Ranking,
    /// Tier value; the `Matches` tier adds a closeness bonus in (0, 1]
    pub rank: f64,
    pub passed: bool,
}

/// Ranks `query` against `item`, passing at [`Ranking::Matches`] or better
pub fn rank_item(item: &str, query: &str) -> RankInfo {
    rank_item_with_threshold(item, query, Ranking::Matches)
}

pub fn rank_item_with_threshold(item: &str, query: &str, threshold: Ranking) -> RankInfo {
    let (ranking, rank) = match_ranking(item, query);
    RankInfo {
        ranking,
        rank,
        passed: ranking != Ranking::NoMatch && ranking >= threshold,
    }
}

fn tier(ranking: Ranking) -> (Ranking, f64) {
    (ranking, ranking as u8 as f64)
}

fn match_ranking(item: &str, query: &str) -> (Ranking, f64) {
    if query.chars().count() > item.chars().count() {
        return tier(Ranking::NoMatch);
    }

    if item == query {
        return tier(Ranking::CaseSensitiveEqual);
    }

    let item = item.to_lowercase();
    let query = query.to_lowercase();

    if item == query {
        return tier(Ranking::Equal);
    }

    if item.starts_with(&query) {
        return tier(Ranking::StartsWith);
    }

    if item.contains(&format!(" {}", query)) {
        return tier(Ranking::WordStartsWith);
    }

    if item.contains(&query) {
        return tier(Ranking::Contains);
    }

    if query.chars().count() == 1 {
        return tier(Ranking::NoMatch);
    }

    if acronym(&item).contains(&query) {
        return tier(Ranking::Acronym);
    }

    closeness_ranking(&item, &query)
}

/// First letter of every space- or hyphen-separated word
fn acronym(item: &str) -> String {
    item.split(' ')
        .flat_map(|word| word.split('-'))
        .filter_map(|part| part.chars().next())
        .collect()
}

/// Every query character must appear in order; tighter spreads score higher
fn closeness_ranking(item: &str, query: &str) -> (Ranking, f64) {
    let haystack: Vec<char> = item.chars().collect();
    let mut cursor = 0usize;
    let mut first_end = None;

    for needle in query.chars() {
        match haystack[cursor..].iter().position(|&c| c == needle) {
            Some(offset) => {
                cursor += offset + 1;
                first_end.get_or_insert(cursor);
            }
            None => return tier(Ranking::NoMatch),
        }
    }

    let Some(first_end) = first_end else {
        return tier(Ranking::NoMatch);
    };
    let spread = (cursor - first_end).max(1) as f64;

    (Ranking::Matches, Ranking::Matches as u8 as f64 + 1.0 / spread)
}
