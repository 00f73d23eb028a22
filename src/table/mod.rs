//! Client-side table engine for market records
//!
//! [`TableView`] holds the records of the latest fetch plus the ephemeral
//! view state (sorting, committed search, pagination, column visibility and
//! widths). Rows flow through filter → sort → paginate on every read; the
//! input set is replaced wholesale on refetch and never mutated.

pub mod column;
pub mod debounce;
pub mod export;
pub mod filter;
pub mod sort;

pub use column::{market_columns, CellValue, ColumnDef, Field};
pub use debounce::DebouncedInput;
pub use export::ExportScope;
pub use filter::{rank_item, RankInfo, Ranking};
pub use sort::{SortDirection, SortSpec};

use crate::constants::{CSV_EXPORT_FILE_NAME, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::error::TableError;
use crate::favorites::FavoritesStore;
use crate::types::MarketRecord;
use std::path::{Path, PathBuf};

/// Feature switches and defaults for one table instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub title: String,
    pub show_search: bool,
    pub show_export: bool,
    pub show_favorites: bool,
    pub initial_page_size: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            title: "Market Overview".to_string(),
            show_search: true,
            show_export: true,
            show_favorites: false,
            initial_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
struct ColumnState {
    def: ColumnDef,
    visible: bool,
    width: u32,
}

/// Rows of the current page, or the explicit empty state
#[derive(Debug, Clone, PartialEq)]
pub enum TableBody<'a> {
    Rows(Vec<&'a MarketRecord>),
    NoResults,
}

/// Everything the view needs to draw the current page
#[derive(Debug, Clone)]
pub struct PageModel<'a> {
    pub columns: Vec<&'a ColumnDef>,
    pub body: TableBody<'a>,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// Rows passing the filter, across all pages
    pub total_rows: usize,
}

impl PageModel<'_> {
    /// Rows on this page; empty for the no-results state
    pub fn rows(&self) -> &[&MarketRecord] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            TableBody::NoResults => &[],
        }
    }
}

pub struct TableView {
    options: TableOptions,
    records: Vec<MarketRecord>,
    columns: Vec<ColumnState>,
    sorting: Vec<SortSpec>,
    global_filter: String,
    page_index: usize,
    page_size: usize,
}

impl TableView {
    /// Creates a table over `records` with the default market columns
    pub fn new(records: Vec<MarketRecord>, options: TableOptions) -> Result<Self, TableError> {
        let columns = market_columns(options.show_favorites);
        Self::with_columns(records, columns, options)
    }

    /// Creates a table with custom column descriptors
    pub fn with_columns(
        records: Vec<MarketRecord>,
        columns: Vec<ColumnDef>,
        options: TableOptions,
    ) -> Result<Self, TableError> {
        validate_page_size(options.initial_page_size)?;

        let columns = columns
            .into_iter()
            .map(|def| ColumnState {
                width: def.clamp_width(def.size),
                visible: true,
                def,
            })
            .collect();

        Ok(Self {
            page_size: options.initial_page_size,
            options,
            records,
            columns,
            sorting: Vec::new(),
            global_filter: String::new(),
            page_index: 0,
        })
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    /// Replaces the records after a refetch, keeping the view state
    pub fn set_records(&mut self, records: Vec<MarketRecord>) {
        self.records = records;
        self.clamp_page_index();
    }

    // ---- sorting ----

    pub fn sorting(&self) -> &[SortSpec] {
        &self.sorting
    }

    /// Current direction of `field`, if it is part of the sort
    pub fn sort_direction(&self, field: Field) -> Option<SortDirection> {
        self.sorting
            .iter()
            .find(|spec| spec.field == field)
            .map(|spec| spec.direction)
    }

    /// Header click: cycles `field` through unsorted → ascending → descending
    /// and drops any other sort key
    pub fn toggle_sort(&mut self, field: Field) -> Result<Option<SortDirection>, TableError> {
        let column = self.column(field)?;
        if !column.def.sortable {
            return Err(TableError::FeatureDisabled("sorting on this column"));
        }

        let next = sort::next_direction(self.sort_direction(field));
        self.sorting = next
            .map(|direction| vec![SortSpec { field, direction }])
            .unwrap_or_default();

        tracing::debug!(field = %field, direction = ?next, "Toggled sort");
        Ok(next)
    }

    /// Replaces the whole sort specification
    pub fn set_sorting(&mut self, specs: Vec<SortSpec>) -> Result<(), TableError> {
        for spec in &specs {
            if !self.column(spec.field)?.def.sortable {
                return Err(TableError::FeatureDisabled("sorting on this column"));
            }
        }
        self.sorting = specs;
        Ok(())
    }

    // ---- filtering ----

    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    /// Applies committed search text (see [`DebouncedInput`])
    pub fn set_global_filter(&mut self, query: impl Into<String>) -> Result<(), TableError> {
        if !self.options.show_search {
            return Err(TableError::FeatureDisabled("search"));
        }
        self.global_filter = query.into();
        self.clamp_page_index();
        Ok(())
    }

    /// Syncs the filter with the committed value of a debounced input
    pub fn apply_search(&mut self, input: &DebouncedInput) -> Result<(), TableError> {
        let committed = input.committed();
        if committed != self.global_filter {
            self.set_global_filter(committed)?;
        }
        Ok(())
    }

    /// A row passes when any searchable column ranks against the query,
    /// visible or not
    fn row_passes(&self, record: &MarketRecord) -> bool {
        let query = self.global_filter.trim();
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.columns
            .iter()
            .filter(|column| column.def.searchable)
            .any(|column| rank_item(&column.def.search_text(record), &query).passed)
    }

    /// Positions of the filtered rows, in sorted order
    fn processed_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.row_passes(record))
            .map(|(index, _)| index)
            .collect();
        sort::sort_indices(&self.records, &mut indices, &self.sorting);
        indices
    }

    /// Every row passing the filter, sorted, across all pages
    pub fn filtered_rows(&self) -> Vec<&MarketRecord> {
        self.processed_indices()
            .into_iter()
            .map(|index| &self.records[index])
            .collect()
    }

    pub fn filtered_row_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| self.row_passes(record))
            .count()
    }

    // ---- pagination ----

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages; an empty result still has one (empty) page
    pub fn page_count(&self) -> usize {
        self.filtered_row_count().div_ceil(self.page_size).max(1)
    }

    /// Changes the page size, keeping the first row of the current page visible
    pub fn set_page_size(&mut self, size: usize) -> Result<(), TableError> {
        validate_page_size(size)?;
        let top_row = self.page_index * self.page_size;
        self.page_size = size;
        self.page_index = top_row / size;
        self.clamp_page_index();
        Ok(())
    }

    /// Jumps to `index`, clamped to the last page
    pub fn set_page_index(&mut self, index: usize) {
        self.page_index = index;
        self.clamp_page_index();
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    pub fn next_page(&mut self) -> bool {
        if self.can_next_page() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.can_previous_page() {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    fn clamp_page_index(&mut self) {
        let last = self.page_count() - 1;
        if self.page_index > last {
            tracing::debug!(
                page_index = self.page_index,
                last_page = last,
                "Clamping page index after the row set shrank"
            );
            self.page_index = last;
        }
    }

    /// Rows of the current page
    pub fn page_rows(&self) -> Vec<&MarketRecord> {
        self.processed_indices()
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .map(|index| &self.records[index])
            .collect()
    }

    /// Renderable model of the current page
    pub fn page(&self) -> PageModel<'_> {
        let processed = self.processed_indices();
        let total_rows = processed.len();

        let rows: Vec<&MarketRecord> = processed
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .map(|index| &self.records[index])
            .collect();

        let body = if rows.is_empty() {
            TableBody::NoResults
        } else {
            TableBody::Rows(rows)
        };

        PageModel {
            columns: self.visible_columns(),
            body,
            page_index: self.page_index,
            page_count: total_rows.div_ceil(self.page_size).max(1),
            page_size: self.page_size,
            total_rows,
        }
    }

    // ---- columns ----

    fn column(&self, field: Field) -> Result<&ColumnState, TableError> {
        self.columns
            .iter()
            .find(|column| column.def.field == field)
            .ok_or_else(|| TableError::UnknownColumn(field.to_string()))
    }

    fn column_mut(&mut self, field: Field) -> Result<&mut ColumnState, TableError> {
        self.columns
            .iter_mut()
            .find(|column| column.def.field == field)
            .ok_or_else(|| TableError::UnknownColumn(field.to_string()))
    }

    /// Visible columns in declaration order
    pub fn visible_columns(&self) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|column| column.visible)
            .map(|column| &column.def)
            .collect()
    }

    pub fn is_column_visible(&self, field: Field) -> Result<bool, TableError> {
        Ok(self.column(field)?.visible)
    }

    pub fn set_column_visibility(&mut self, field: Field, visible: bool) -> Result<(), TableError> {
        self.column_mut(field)?.visible = visible;
        Ok(())
    }

    /// Flips a column's visibility and returns the new value
    pub fn toggle_column_visibility(&mut self, field: Field) -> Result<bool, TableError> {
        let column = self.column_mut(field)?;
        column.visible = !column.visible;
        Ok(column.visible)
    }

    pub fn column_width(&self, field: Field) -> Result<u32, TableError> {
        Ok(self.column(field)?.width)
    }

    /// Resizes a column within its bounds and returns the applied width
    pub fn resize_column(&mut self, field: Field, width: u32) -> Result<u32, TableError> {
        let column = self.column_mut(field)?;
        column.width = column.def.clamp_width(width);
        Ok(column.width)
    }

    // ---- export ----

    /// Rows covered by an export of `scope`
    pub fn export_rows(&self, scope: ExportScope) -> Vec<&MarketRecord> {
        match scope {
            ExportScope::Filtered => self.filtered_rows(),
            ExportScope::CurrentPage => self.page_rows(),
        }
    }

    /// CSV text of the visible columns for `scope`
    pub fn export_csv(&self, scope: ExportScope) -> Result<String, TableError> {
        if !self.options.show_export {
            return Err(TableError::FeatureDisabled("export"));
        }
        let rows = self.export_rows(scope);
        Ok(export::to_csv(&self.visible_columns(), &rows))
    }

    /// Writes `coins.csv` into `dir` and returns its path
    pub fn export_csv_to_dir(&self, dir: &Path, scope: ExportScope) -> Result<PathBuf, TableError> {
        let csv = self.export_csv(scope)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(CSV_EXPORT_FILE_NAME);
        std::fs::write(&path, csv)?;

        tracing::info!(path = %path.display(), scope = ?scope, "Exported table to CSV");
        Ok(path)
    }

    // ---- favorites ----

    /// Row bookmark toggle
    pub fn toggle_favorite(
        &self,
        favorites: &mut FavoritesStore,
        coin_id: &str,
    ) -> Result<bool, TableError> {
        if !self.options.show_favorites {
            return Err(TableError::FeatureDisabled("favorites"));
        }
        Ok(favorites.toggle(coin_id))
    }
}

fn validate_page_size(size: usize) -> Result<(), TableError> {
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(())
    } else {
        Err(TableError::invalid_page_size(size, PAGE_SIZE_OPTIONS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{record, sample_records};
    use crate::table::export::tests::parse_csv;
    use crate::storage::MemoryStorage;

    fn ids(rows: &[&MarketRecord]) -> Vec<String> {
        rows.iter().map(|r| r.id.clone()).collect()
    }

    fn many_records(n: u32) -> Vec<MarketRecord> {
        (1..=n)
            .map(|i| {
                record(
                    &format!("coin-{}", i),
                    &format!("Coin {}", i),
                    &format!("c{}", i),
                    i as f64,
                    0.0,
                    1000.0 * i as f64,
                    10.0,
                    i,
                )
            })
            .collect()
    }

    #[test]
    fn test_example_scenario() {
        let mut btc = MarketRecord::new("btc", "Bitcoin", "btc");
        btc.current_price = Some(67420.50);
        btc.market_cap_rank = Some(1);
        let mut eth = MarketRecord::new("eth", "Ethereum", "eth");
        eth.current_price = Some(3842.30);
        eth.market_cap_rank = Some(2);

        let mut table = TableView::new(vec![eth, btc], TableOptions::default()).unwrap();
        assert_eq!(table.toggle_sort(Field::Rank).unwrap(), Some(SortDirection::Ascending));
        assert_eq!(ids(&table.page_rows()), vec!["btc", "eth"]);

        table.set_global_filter("bitcon").unwrap();
        assert_eq!(ids(&table.page_rows()), vec!["btc"]);

        table.set_global_filter("zzz").unwrap();
        assert_eq!(table.page().body, TableBody::NoResults);
    }

    #[test]
    fn test_toggle_sort_cycles_and_reverses() {
        let mut table = TableView::new(sample_records(), TableOptions::default()).unwrap();

        table.toggle_sort(Field::MarketCap).unwrap();
        let ascending = ids(&table.filtered_rows());
        assert_eq!(
            table.toggle_sort(Field::MarketCap).unwrap(),
            Some(SortDirection::Descending)
        );
        let mut descending = ids(&table.filtered_rows());
        descending.reverse();
        assert_eq!(ascending, descending);

        assert_eq!(table.toggle_sort(Field::MarketCap).unwrap(), None);
        assert!(table.sorting().is_empty());
        assert_eq!(
            ids(&table.filtered_rows()),
            vec!["bitcoin", "ethereum", "tether", "solana", "binancecoin"]
        );
    }

    #[test]
    fn test_toggle_sort_replaces_other_column() {
        let mut table = TableView::new(sample_records(), TableOptions::default()).unwrap();
        table.toggle_sort(Field::Price).unwrap();
        table.toggle_sort(Field::Volume).unwrap();
        assert_eq!(table.sorting(), &[SortSpec::ascending(Field::Volume)]);
        assert_eq!(table.sort_direction(Field::Price), None);
    }

    #[test]
    fn test_unknown_column() {
        let mut table = TableView::new(sample_records(), TableOptions::default()).unwrap();
        assert!(matches!(
            table.toggle_sort(Field::Symbol),
            Err(TableError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let mut table = TableView::new(sample_records(), TableOptions::default()).unwrap();
        table.set_global_filter("").unwrap();
        assert_eq!(table.filtered_rows().len(), 5);
        table.set_global_filter("   ").unwrap();
        assert_eq!(
            ids(&table.filtered_rows()),
            ids(&sample_records().iter().collect::<Vec<_>>())
        );
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut table = TableView::new(sample_records(), TableOptions::default()).unwrap();
        table.set_global_filter("eth").unwrap();
        let once: Vec<MarketRecord> = table.filtered_rows().into_iter().cloned().collect();

        let mut again = TableView::new(once.clone(), TableOptions::default()).unwrap();
        again.set_global_filter("eth").unwrap();
        assert_eq!(
            ids(&again.filtered_rows()),
            ids(&once.iter().collect::<Vec<_>>())
        );
    }

    #[test]
    fn test_search_matches_symbol_and_id() {
        let mut table = TableView::new(sample_records(), TableOptions::default()).unwrap();
        table.set_global_filter("SOL").unwrap();
        assert_eq!(ids(&table.filtered_rows()), vec!["solana"]);
        table.set_global_filter("binancecoin").unwrap();
        assert_eq!(ids(&table.filtered_rows()), vec!["binancecoin"]);
    }

    #[test]
    fn test_filter_reads_only_searchable_columns() {
        let mut table = TableView::new(sample_records(), TableOptions::default()).unwrap();
        table.set_global_filter("67420").unwrap();
        assert_eq!(table.page().body, TableBody::NoResults);

        let mut columns = market_columns(false);
        columns[2].searchable = true;
        let mut table =
            TableView::with_columns(sample_records(), columns, TableOptions::default()).unwrap();
        table.set_global_filter("67420").unwrap();
        assert_eq!(ids(&table.filtered_rows()), vec!["bitcoin"]);

        // Hiding a searchable column keeps it in the filter
        table.set_column_visibility(Field::Name, false).unwrap();
        table.set_global_filter("solana").unwrap();
        assert_eq!(ids(&table.filtered_rows()), vec!["solana"]);

        let columns: Vec<ColumnDef> = market_columns(false)
            .into_iter()
            .map(|c| ColumnDef {
                searchable: false,
                ..c
            })
            .collect();
        let mut table =
            TableView::with_columns(sample_records(), columns, TableOptions::default()).unwrap();
        table.set_global_filter("bitcoin").unwrap();
        assert!(table.filtered_rows().is_empty());
        table.set_global_filter("").unwrap();
        assert_eq!(table.filtered_rows().len(), 5);
    }

    #[test]
    fn test_pages_reconstruct_the_filtered_set() {
        let mut table = TableView::new(many_records(47), TableOptions::default()).unwrap();
        table.toggle_sort(Field::Price).unwrap();
        table.toggle_sort(Field::Price).unwrap();

        for size in [10, 20, 50] {
            table.set_page_size(size).unwrap();
            table.set_page_index(0);
            let mut collected = Vec::new();
            loop {
                collected.extend(ids(&table.page_rows()));
                if !table.next_page() {
                    break;
                }
            }
            assert_eq!(collected, ids(&table.filtered_rows()));
            assert_eq!(table.page_count(), 47usize.div_ceil(size));
        }
    }

    #[test]
    fn test_page_index_clamps_when_rows_shrink() {
        let mut table = TableView::new(many_records(35), TableOptions::default()).unwrap();
        table.set_page_index(3);
        assert_eq!(table.page_index(), 3);
        assert!(!table.can_next_page());

        table.set_global_filter("coin 1").unwrap();
        // 1, 10..=19, plus 21 and 31 as in-order matches: 13 rows, 2 pages
        assert_eq!(table.page_index(), 1);
        assert_eq!(table.page_rows().len(), 3);

        table.set_records(many_records(5));
        assert_eq!(table.page_index(), 0);

        table.set_page_index(99);
        assert_eq!(table.page_index(), 0);
    }

    #[test]
    fn test_page_size_keeps_top_row() {
        let mut table = TableView::new(many_records(60), TableOptions::default()).unwrap();
        table.set_page_index(3); // rows 30..40
        table.set_page_size(20).unwrap();
        assert_eq!(table.page_index(), 1); // rows 20..40
        assert!(matches!(
            table.set_page_size(25),
            Err(TableError::InvalidPageSize { size: 25, .. })
        ));
        assert!(TableView::new(
            Vec::new(),
            TableOptions {
                initial_page_size: 7,
                ..Default::default()
            }
        )
        .is_err());
    }

    #[test]
    fn test_empty_dataset_has_one_page() {
        let table = TableView::new(Vec::new(), TableOptions::default()).unwrap();
        let page = table.page();
        assert_eq!(page.page_count, 1);
        assert_eq!(page.body, TableBody::NoResults);
        assert!(page.rows().is_empty());
        assert!(!table.can_next_page() && !table.can_previous_page());
    }

    #[test]
    fn test_column_visibility_and_resize() {
        let mut table = TableView::new(sample_records(), TableOptions::default()).unwrap();
        assert!(!table.toggle_column_visibility(Field::MarketCap).unwrap());
        assert!(!table.is_column_visible(Field::MarketCap).unwrap());

        let labels: Vec<&str> = table.page().columns.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Rank", "Coin", "Price", "24h Change", "Volume (24h)"]);

        assert_eq!(table.resize_column(Field::Price, 2000).unwrap(), 700);
        assert_eq!(table.resize_column(Field::Rank, 10).unwrap(), 50);
        assert_eq!(table.column_width(Field::Change24h).unwrap(), 300);

        // Hidden columns and widths do not change which rows come back
        assert_eq!(table.filtered_rows().len(), 5);
    }

    #[test]
    fn test_export_whole_filtered_set_by_default() {
        let mut table = TableView::new(many_records(25), TableOptions::default()).unwrap();
        table.toggle_sort(Field::Rank).unwrap();
        table.set_column_visibility(Field::Volume, false).unwrap();

        let csv = table.export_csv(ExportScope::default()).unwrap();
        let parsed = parse_csv(&csv);
        assert_eq!(parsed.len(), 26);
        assert_eq!(parsed[0].len(), 5);
        assert_eq!(parsed[1][1], "Coin 1");

        let page_csv = table.export_csv(ExportScope::CurrentPage).unwrap();
        assert_eq!(parse_csv(&page_csv).len(), 11);
    }

    #[test]
    fn test_export_round_trip_matches_rows() {
        let mut table = TableView::new(sample_records(), TableOptions::default()).unwrap();
        table.toggle_sort(Field::Change24h).unwrap();
        let csv = table.export_csv(ExportScope::Filtered).unwrap();
        let parsed = parse_csv(&csv);

        let columns = table.visible_columns();
        for (line, record) in parsed[1..].iter().zip(table.filtered_rows()) {
            let expected: Vec<String> = columns
                .iter()
                .map(|c| c.value(record).to_export_string())
                .collect();
            assert_eq!(line, &expected);
        }
    }

    #[test]
    fn test_export_writes_coins_csv() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let table = TableView::new(sample_records(), TableOptions::default()).unwrap();
        let path = table
            .export_csv_to_dir(temp_dir.path(), ExportScope::Filtered)
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "coins.csv");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("\"Rank\",\"Coin\""));
    }

    #[test]
    fn test_disabled_features() {
        let options = TableOptions {
            show_search: false,
            show_export: false,
            ..Default::default()
        };
        let mut table = TableView::new(sample_records(), options).unwrap();
        assert!(matches!(
            table.set_global_filter("btc"),
            Err(TableError::FeatureDisabled("search"))
        ));
        assert!(matches!(
            table.export_csv(ExportScope::Filtered),
            Err(TableError::FeatureDisabled("export"))
        ));

        let mut favorites = FavoritesStore::open(Box::new(MemoryStorage::default())).unwrap();
        assert!(table.toggle_favorite(&mut favorites, "bitcoin").is_err());
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle_favorite_from_row() {
        let options = TableOptions {
            show_favorites: true,
            ..Default::default()
        };
        let table = TableView::new(sample_records(), options).unwrap();
        assert_eq!(table.column_width(Field::Rank).unwrap(), 60);

        let mut favorites = FavoritesStore::open(Box::new(MemoryStorage::default())).unwrap();
        assert!(table.toggle_favorite(&mut favorites, "ethereum").unwrap());
        assert!(favorites.is_favorite("ethereum"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_drives_filter() {
        let mut table = TableView::new(sample_records(), TableOptions::default()).unwrap();
        let mut input = DebouncedInput::default();

        input.input("usdt");
        table.apply_search(&input).unwrap();
        assert_eq!(table.filtered_rows().len(), 5);

        let mut rx = input.subscribe();
        rx.changed().await.unwrap();
        table.apply_search(&input).unwrap();
        assert_eq!(ids(&table.filtered_rows()), vec!["tether"]);
    }
}
