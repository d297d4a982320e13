use super::ui;
use crate::core::Workspace;
use anyhow::{Context, Result, bail};
use std::path::Path;

/// Copies the fetched price file to `output`.
pub fn export_prices(prices_path: &Path, output: &Path) -> Result<u64> {
    if !prices_path.exists() {
        bail!("File not found. Please fetch data first.");
    }
    if output.exists() && output.canonicalize()? == prices_path.canonicalize()? {
        bail!("Output path is the price file itself: {}", output.display());
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::copy(prices_path, output).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            prices_path.display(),
            output.display()
        )
    })
}

pub fn run(workspace: &Workspace, output: &Path) -> Result<()> {
    let bytes = export_prices(&workspace.config().prices_path, output)?;
    println!(
        "{} {} ({bytes} bytes)",
        ui::style_text("Saved", ui::StyleType::Success),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_export_before_fetch_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = export_prices(&dir.path().join("prices.csv"), &dir.path().join("out.csv"))
            .unwrap_err();
        assert_eq!(err.to_string(), "File not found. Please fetch data first.");
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn test_export_copies_file() -> Result<()> {
        let dir = TempDir::new()?;
        let prices = dir.path().join("prices.csv");
        fs::write(&prices, "Date,Close,hisse_kodu,sector,industry\n")?;

        let output = dir.path().join("downloads").join("stock_close_data.csv");
        export_prices(&prices, &output)?;

        assert_eq!(fs::read_to_string(output)?, fs::read_to_string(prices)?);
        Ok(())
    }

    #[test]
    fn test_export_onto_itself_is_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let prices = dir.path().join("prices.csv");
        fs::write(&prices, "x")?;

        assert!(export_prices(&prices, &prices).is_err());
        assert_eq!(fs::read_to_string(prices)?, "x");
        Ok(())
    }
}
