use coin_dashboard::format::{format_currency, format_large_number, format_percent};
use coin_dashboard::pages::load_dashboard;
use coin_dashboard::table::Field;
use coin_dashboard::{
    DashboardConfig, ExportScope, FavoritesStore, FileStorage, QueryClient, TableOptions,
    TableView,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Coin Dashboard Example");
    println!("======================");

    let config = DashboardConfig::from_env();
    let client = QueryClient::from_config(&config)?;

    // 1. Load the dashboard sections concurrently
    let page = load_dashboard(&client).await;
    let sections = page.settled().await;

    match sections.profile.data() {
        Some(profile) => println!("Signed in as {} ({})", profile.full_name(), profile.initials()),
        None => println!("Profile unavailable"),
    }

    let records = match sections.markets.data() {
        Some(records) => records.clone(),
        None => {
            eprintln!(
                "Market data unavailable: {}",
                sections.markets.error_message().unwrap_or("unknown error")
            );
            return Ok(());
        }
    };

    if let Some(stats) = sections.market_stats() {
        println!(
            "Total market cap {} | 24h volume {} | {} up / {} down",
            format_large_number(stats.total_market_cap),
            format_large_number(stats.total_volume),
            stats.gainers,
            stats.losers
        );
    }

    // 2. Sort, filter and paginate the table
    let options = TableOptions {
        show_favorites: true,
        ..Default::default()
    };
    let mut table = TableView::new(records, options)?;
    table.toggle_sort(Field::Change24h)?;
    table.toggle_sort(Field::Change24h)?;

    println!("\nTop movers (page 1 of {})", table.page_count());
    println!("{:-<60}", "");
    for record in table.page_rows() {
        println!(
            "{:<4} {:<20} {:>14} {:>9}",
            record.market_cap_rank.map(|r| r.to_string()).unwrap_or_default(),
            record.name,
            record.current_price.map(format_currency).unwrap_or_default(),
            record
                .price_change_percentage_24h
                .map(format_percent)
                .unwrap_or_default()
        );
    }

    table.set_global_filter("bitcon")?;
    println!("\nSearch \"bitcon\": {} match(es)", table.filtered_row_count());

    // 3. Favorites persist across runs
    let mut favorites = FavoritesStore::open(Box::new(FileStorage::new(&config.state_dir)))?;
    if let Some(first) = table.page_rows().first() {
        let now_favorite = table.toggle_favorite(&mut favorites, &first.id)?;
        println!("{} favorite: {}", first.name, now_favorite);
    }
    println!("Favorites: {:?}", favorites.ids());

    // 4. Export everything that passes the filter
    table.set_global_filter("")?;
    let path = table.export_csv_to_dir(&config.state_dir, ExportScope::Filtered)?;
    println!("Exported {} rows to {}", table.filtered_row_count(), path.display());

    let metrics = page.markets.metrics().await;
    println!(
        "\n{}: p50 {:.0}ms, success rate {:.0}%",
        metrics.query,
        metrics.latency_p50_ms,
        metrics.success_rate * 100.0
    );

    Ok(())
}
