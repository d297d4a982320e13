use super::{changes, distribution, holdings, popular, select_fund_period, ui};
use crate::core::analytics::{self, Scope};
use crate::core::{HoldingsTable, LatestPriceMode, PriceTable, Workspace};
use anyhow::Result;
use tracing::warn;

/// Every view for one fund and period, in display order. A fund without enough
/// history still renders, with the comparison sections replaced by the error.
pub fn render_dashboard(
    holdings: &HoldingsTable,
    prices: Option<&PriceTable>,
    fund: &str,
    period: &str,
    mode: LatestPriceMode,
) -> Result<Vec<String>> {
    let snapshot = analytics::holdings_snapshot(holdings, fund, period)?;

    let mut sections = vec![holdings::render_snapshot(&snapshot)];

    match changes::render_fund_changes(holdings, prices, fund, mode) {
        Ok(section) => sections.push(section),
        Err(e) => {
            warn!(error = %e, "Skipping holdings comparison");
            sections.push(ui::style_text(&e.to_string(), ui::StyleType::Error));
        }
    }

    sections.push(popular::render_popular(holdings, period));
    sections.push(distribution::render_scoped(holdings, Scope::Fund(fund)));
    sections.push(distribution::render_scoped(holdings, Scope::AllFunds));

    Ok(sections)
}

pub async fn run(workspace: &Workspace, fund: Option<&str>, period: Option<&str>) -> Result<()> {
    let holdings = workspace.holdings().await?;
    let prices = workspace.prices().await?;
    let (fund, period) = select_fund_period(&holdings, fund, period)?;

    let sections = render_dashboard(
        &holdings,
        prices.as_deref(),
        &fund,
        &period,
        workspace.config().analysis.latest_price,
    )?;

    println!(
        "{}\n",
        ui::style_text("Fund Analysis Dashboard", ui::StyleType::Title)
    );
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            ui::print_separator();
        }
        println!("{section}");
    }
    Ok(())
}
