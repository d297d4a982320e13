use super::ui;
use crate::core::analytics::{self, TickerCount};
use crate::core::{HoldingsTable, Workspace};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

pub fn render_counts(counts: &[TickerCount]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Ticker"), ui::header_cell("Count")]);
    for entry in counts {
        table.add_row(vec![
            Cell::new(&entry.ticker),
            Cell::new(entry.count).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

/// Most-held tickers overall and within `period`.
pub fn render_popular(holdings: &HoldingsTable, period: &str) -> String {
    let mut output = format!(
        "{}\n{}\n",
        ui::style_text("Most Chosen Stocks Over Funds", ui::StyleType::Subtitle),
        render_counts(&analytics::most_chosen(holdings))
    );
    output.push_str(&format!(
        "\n{}\n{}",
        ui::style_text(
            &format!("Most Chosen Stocks in Period ({period})"),
            ui::StyleType::Subtitle
        ),
        render_counts(&analytics::most_chosen_in_period(holdings, period))
    ));
    output
}

pub async fn run(workspace: &Workspace, period: Option<&str>) -> Result<()> {
    let holdings = workspace.holdings().await?;
    let period = match period {
        Some(p) => p.to_string(),
        None => match holdings.records().iter().map(|r| &r.period).max() {
            Some(latest) => latest.clone(),
            None => {
                println!("No holdings found.");
                return Ok(());
            }
        },
    };
    println!("{}", render_popular(&holdings, &period));
    Ok(())
}
