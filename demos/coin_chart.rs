use coin_dashboard::format::{format_currency, format_large_number, format_percent};
use coin_dashboard::pages::load_coin_page;
use coin_dashboard::{ChartPeriod, DashboardConfig, QueryClient};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let coin_id = std::env::args().nth(1).unwrap_or_else(|| "bitcoin".to_string());

    println!("Coin Chart Example ({})", coin_id);
    println!("==================================");

    let client = QueryClient::from_config(&DashboardConfig::from_env())?;
    let mut page = load_coin_page(&client, &coin_id, ChartPeriod::default()).await;

    let sections = page.settled().await;
    match sections.detail.data() {
        Some(detail) => {
            println!("{} ({})", detail.name, detail.symbol.to_uppercase());
            if let Some(price) = detail.market_data.current_price_usd() {
                println!("  Price:      {}", format_currency(price));
            }
            if let Some(cap) = detail.market_data.market_cap_usd() {
                println!("  Market cap: {}", format_large_number(cap));
            }
            if let Some(genesis) = detail.genesis_date() {
                println!("  Genesis:    {}", genesis);
            }
        }
        None => eprintln!(
            "Detail unavailable: {}",
            sections.detail.error_message().unwrap_or("pending")
        ),
    }

    // Walk through every chart range, pausing to stay under the public rate limit
    for period in ChartPeriod::all() {
        page.select_period(&client, *period).await;
        let chart = page.chart.settled().await;

        println!("\n{:-<50}", "");
        match chart.data() {
            Some(chart) => {
                println!(
                    "{:<5} points: {:<5} high: {:<14} low: {:<14} change: {}",
                    period.label(),
                    chart.prices.len(),
                    chart.high().map(format_currency).unwrap_or_default(),
                    chart.low().map(format_currency).unwrap_or_default(),
                    chart.change_percentage().map(format_percent).unwrap_or_default()
                );
            }
            None => println!(
                "{:<5} {}",
                period.label(),
                chart.error_message().unwrap_or("pending")
            ),
        }

        sleep(Duration::from_secs(2)).await;
    }

    Ok(())
}
