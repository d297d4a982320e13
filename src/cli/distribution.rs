use super::ui;
use crate::core::analytics::{self, DistributionMatrix, Scope};
use crate::core::{HoldingsTable, Workspace};
use anyhow::Result;
use comfy_table::Cell;

pub fn render_distribution(matrix: &DistributionMatrix) -> String {
    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Ticker")];
    header.extend(matrix.periods.iter().map(|p| ui::header_cell(p)));
    table.set_header(header);

    for row in &matrix.rows {
        let mut cells = vec![Cell::new(&row.ticker)];
        cells.extend(row.counts.iter().map(|&c| ui::count_cell(c)));
        table.add_row(cells);
    }
    table.to_string()
}

pub fn render_scoped(holdings: &HoldingsTable, scope: Scope<'_>) -> String {
    let title = match scope {
        Scope::AllFunds => "Stock Distribution Over Periods".to_string(),
        Scope::Fund(fund) => format!("Stock Distribution Over Periods ({fund})"),
    };
    let matrix = analytics::period_distribution(holdings, scope);
    format!(
        "{}\n{}",
        ui::style_text(&title, ui::StyleType::Subtitle),
        render_distribution(&matrix)
    )
}

pub async fn run(workspace: &Workspace, fund: Option<&str>) -> Result<()> {
    let holdings = workspace.holdings().await?;
    let scope = match fund {
        Some(fund) if !holdings.contains_fund(fund) => {
            return Err(crate::core::AnalysisError::UnknownFund {
                fund: fund.to_string(),
            }
            .into());
        }
        Some(fund) => Scope::Fund(fund),
        None => Scope::AllFunds,
    };
    println!("{}", render_scoped(&holdings, scope));
    Ok(())
}
