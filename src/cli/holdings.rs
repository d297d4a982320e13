use super::{select_fund_period, ui};
use crate::core::Workspace;
use crate::core::analytics::{self, HoldingsSnapshot};
use anyhow::Result;
use comfy_table::Cell;

/// Fund header, disclosure link and the holdings rows of one period.
pub fn render_snapshot(snapshot: &HoldingsSnapshot<'_>) -> String {
    let mut output = format!(
        "Fund: {} ({})\n",
        ui::style_text(&snapshot.fund, ui::StyleType::Title),
        snapshot.period
    );
    if let Some(company) = &snapshot.company_name {
        output.push_str(&format!("{company}\n"));
    }
    if let Some(url) = &snapshot.disclosure_url {
        output.push_str(&format!("{}\n", ui::style_text(url, ui::StyleType::Link)));
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Ticker"),
        ui::header_cell("Weight (%)"),
        ui::header_cell("Acquired"),
        ui::header_cell("Report"),
    ]);
    for row in &snapshot.rows {
        table.add_row(vec![
            Cell::new(&row.ticker),
            ui::format_optional_cell(row.holding_percentage, |v| format!("{v:.2}")),
            ui::format_optional_cell(row.acquisition_date, |d| d.to_string()),
            ui::format_optional_cell(row.report_index.as_deref(), str::to_string),
        ]);
    }

    output.push('\n');
    output.push_str(&table.to_string());
    output
}

pub async fn run(workspace: &Workspace, fund: Option<&str>, period: Option<&str>) -> Result<()> {
    let holdings = workspace.holdings().await?;
    let (fund, period) = select_fund_period(&holdings, fund, period)?;
    let snapshot = analytics::holdings_snapshot(&holdings, &fund, &period)?;
    println!("{}", render_snapshot(&snapshot));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HoldingsTable;
    use crate::core::holdings::tests::holding;

    #[test]
    fn test_render_snapshot_includes_link_and_rows() {
        let table = HoldingsTable::new(vec![
            holding("AAK", "2024-02", "THYAO", 4.5),
            holding("AAK", "2024-02", "AKBNK", 2.25),
        ]);
        let snapshot = analytics::holdings_snapshot(&table, "AAK", "2024-02").unwrap();

        let output = console::strip_ansi_codes(&render_snapshot(&snapshot)).to_string();
        assert!(output.contains("AAK Portfoy"));
        assert!(output.contains("https://www.kap.org.tr/tr/Bildirim/1000"));
        assert!(output.contains("THYAO"));
        assert!(output.contains("2.25"));
    }
}
