use super::ui;
use crate::core::Workspace;
use crate::core::analytics::{self, HoldingChange, HoldingStatus, HoldingsDiff};
use crate::core::price::{LatestPriceMode, PriceTable};
use anyhow::Result;
use comfy_table::Cell;

fn status_label(status: HoldingStatus) -> &'static str {
    match status {
        HoldingStatus::Added => "Added",
        HoldingStatus::Removed => "Removed",
        HoldingStatus::Kept => "Kept",
    }
}

/// Added and removed holdings with their prices and change since acquisition.
pub fn render_changes(diff: &HoldingsDiff, changes: &[HoldingChange]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Ticker"),
        ui::header_cell("Status"),
        ui::header_cell(&format!("{} (%)", diff.periods.previous)),
        ui::header_cell(&format!("{} (%)", diff.periods.current)),
        ui::header_cell("Acquired"),
        ui::header_cell("Acq. Price"),
        ui::header_cell("Latest Price"),
        ui::header_cell("Change"),
        ui::header_cell("Sector"),
        ui::header_cell("Industry"),
    ]);

    for change in changes {
        table.add_row(vec![
            Cell::new(&change.ticker),
            Cell::new(status_label(change.status)),
            ui::format_optional_cell(change.previous_percentage, |v| format!("{v:.2}")),
            ui::format_optional_cell(change.current_percentage, |v| format!("{v:.2}")),
            ui::format_optional_cell(change.acquisition_date, |d| d.to_string()),
            ui::format_optional_cell(change.acquisition_price, |p| format!("{p:.2}")),
            ui::format_optional_cell(change.latest_price, |p| format!("{p:.2}")),
            ui::change_cell(change.percentage_change),
            Cell::new(change.sector.as_deref().unwrap_or("N/A")),
            Cell::new(change.industry.as_deref().unwrap_or("N/A")),
        ]);
    }
    table.to_string()
}

/// Previous vs current weights of every ticker, larger side highlighted.
pub fn render_diff(diff: &HoldingsDiff) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Ticker"),
        ui::header_cell(&format!("{} (%)", diff.periods.previous)),
        ui::header_cell(&format!("{} (%)", diff.periods.current)),
    ]);

    for row in &diff.rows {
        let (prev, cur) = (row.previous_percentage, row.current_percentage);
        let row_max = match (prev, cur) {
            (Some(p), Some(c)) => Some(p.max(c)),
            (p, c) => p.or(c),
        };
        table.add_row(vec![
            Cell::new(&row.ticker),
            ui::weight_cell(prev, prev.is_some() && prev == row_max),
            ui::weight_cell(cur, cur.is_some() && cur == row_max),
        ]);
    }
    table.to_string()
}

/// Both comparison tables for `fund`, or the reason they cannot be built.
pub fn render_fund_changes(
    holdings: &crate::core::HoldingsTable,
    prices: Option<&PriceTable>,
    fund: &str,
    mode: LatestPriceMode,
) -> Result<String> {
    let diff = analytics::diff_holdings(holdings, fund)?;
    let empty = PriceTable::default();
    let changes = analytics::enrich_changes(&diff, prices.unwrap_or(&empty), mode);

    let mut output = format!(
        "{}\n",
        ui::style_text(
            &format!(
                "New Added vs Removed Stocks ({} → {})",
                diff.periods.previous, diff.periods.current
            ),
            ui::StyleType::Subtitle
        )
    );
    if prices.is_none() {
        output.push_str(&format!(
            "{}\n",
            ui::style_text(
                "No price data yet; run `fonlens fetch` to fill in prices.",
                ui::StyleType::Subtle
            )
        ));
    }
    if changes.is_empty() {
        output.push_str("No holdings were added or removed.\n");
    } else {
        output.push_str(&render_changes(&diff, &changes));
        output.push('\n');
    }

    output.push_str(&format!(
        "\n{}\n",
        ui::style_text("Prev vs Current Fund Stocks", ui::StyleType::Subtitle)
    ));
    output.push_str(&render_diff(&diff));
    Ok(output)
}

pub async fn run(workspace: &Workspace, fund: &str) -> Result<()> {
    let holdings = workspace.holdings().await?;
    let prices = workspace.prices().await?;
    let output = render_fund_changes(
        &holdings,
        prices.as_deref(),
        fund,
        workspace.config().analysis.latest_price,
    )?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HoldingsTable;
    use crate::core::holdings::tests::holding;
    use crate::core::price::tests::price;

    fn holdings() -> HoldingsTable {
        let mut added = holding("F", "2024-02", "CCOLA", 7.0);
        added.acquisition_date = chrono::NaiveDate::from_ymd_opt(2024, 2, 5);
        HoldingsTable::new(vec![
            holding("F", "2024-01", "AKBNK", 5.0),
            holding("F", "2024-01", "BIMAS", 3.0),
            holding("F", "2024-02", "BIMAS", 4.0),
            added,
        ])
    }

    #[test]
    fn test_render_fund_changes_with_prices() {
        let prices = PriceTable::new(vec![
            price("CCOLA", "2024-02-05", Some(50.0)),
            price("CCOLA", "2024-03-01", Some(60.0)),
        ]);
        let output = render_fund_changes(
            &holdings(),
            Some(&prices),
            "F",
            LatestPriceMode::GlobalLatestDate,
        )
        .unwrap();
        let output = console::strip_ansi_codes(&output).to_string();

        assert!(output.contains("2024-01 → 2024-02"));
        assert!(output.contains("CCOLA"));
        assert!(output.contains("Added"));
        assert!(output.contains("Removed"));
        assert!(output.contains("20.00%"));
        assert!(output.contains("Prev vs Current Fund Stocks"));
        assert!(!output.contains("No price data yet"));
    }

    #[test]
    fn test_render_fund_changes_without_prices() {
        let output =
            render_fund_changes(&holdings(), None, "F", LatestPriceMode::GlobalLatestDate)
                .unwrap();
        assert!(console::strip_ansi_codes(&output).contains("No price data yet"));
    }

    #[test]
    fn test_single_period_fund_reports_insufficient_history() {
        let table = HoldingsTable::new(vec![holding("F", "2024-01", "AKBNK", 5.0)]);
        let err = render_fund_changes(&table, None, "F", LatestPriceMode::GlobalLatestDate)
            .unwrap_err();
        assert!(err.to_string().contains("insufficient history for fund F"));
    }
}
