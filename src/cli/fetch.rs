use super::ui;
use crate::core::Workspace;
use crate::core::fetch::{self, TickerSymbol};
use crate::providers::yahoo_finance::YahooFinanceProvider;
use anyhow::Result;
use chrono::Local;
use tracing::info;

/// Fetches prices for every ticker in the holdings dataset and replaces the price file.
pub async fn run(workspace: &Workspace) -> Result<()> {
    let config = workspace.config();
    let holdings = workspace.holdings().await?;
    let plan = fetch::fetch_plan(&holdings, &config.fetch.exchange_suffix);

    if plan.is_empty() {
        println!("No tickers found in {}.", config.holdings_path.display());
        return Ok(());
    }

    let start = config.fetch_start_date(Local::now().date_naive());
    let provider = YahooFinanceProvider::new(config.providers.yahoo_base_url());

    println!("Fetching stock data... Please wait.");
    let pb = ui::new_progress_bar(plan.len() as u64);
    pb.set_message("Fetching prices...");

    let result = fetch::fetch_price_table(&plan, &provider, start, &|ticker: &TickerSymbol| {
        pb.set_message(ticker.symbol.clone());
        pb.inc(1);
    })
    .await;
    pb.finish_and_clear();

    let table = match result {
        Ok(table) => table,
        Err(e) => {
            eprintln!(
                "{}",
                ui::style_text(&format!("Error fetching data: {e:#}"), ui::StyleType::Error)
            );
            return Err(e);
        }
    };

    workspace.store_prices(&table).await?;
    info!(rows = table.records().len(), "Price table saved");
    println!(
        "{} {} rows written to {}",
        ui::style_text("Data is ready.", ui::StyleType::Success),
        table.records().len(),
        config.prices_path.display()
    );
    Ok(())
}
