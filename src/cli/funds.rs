use super::ui;
use crate::core::Workspace;
use crate::core::analytics::{self, FundSummary};
use anyhow::{Result, anyhow};
use comfy_table::Cell;

pub fn render_funds(funds: &[FundSummary]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Fund"), ui::header_cell("Company")]);
    for fund in funds {
        table.add_row(vec![
            Cell::new(&fund.fund),
            Cell::new(fund.company_name.as_deref().unwrap_or("N/A")),
        ]);
    }
    table.to_string()
}

pub fn render_periods(fund: &str, periods: &[String]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell(&format!("Periods ({fund})"))]);
    for period in periods {
        table.add_row(vec![Cell::new(period)]);
    }
    table.to_string()
}

pub async fn run(workspace: &Workspace) -> Result<()> {
    let holdings = workspace.holdings().await?;
    let funds = analytics::fund_directory(&holdings);
    if funds.is_empty() {
        println!("No funds found in {}.", workspace.config().holdings_path.display());
        return Ok(());
    }
    println!("{}", render_funds(&funds));
    Ok(())
}

pub async fn run_periods(workspace: &Workspace, fund: &str) -> Result<()> {
    let holdings = workspace.holdings().await?;
    let periods = analytics::fund_periods(&holdings, fund);
    if periods.is_empty() {
        return Err(anyhow!(crate::core::AnalysisError::UnknownFund {
            fund: fund.to_string()
        }));
    }
    println!("{}", render_periods(fund, &periods));
    Ok(())
}
