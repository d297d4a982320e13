use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_utils {
    use super::*;

    pub async fn mount(server: &MockServer, url_path: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    /// Two sessions, 2025-05-02 and 2025-05-05, in Istanbul time.
    pub fn chart_response(first: f64, second: f64) -> String {
        format!(
            r#"{{
                "chart": {{
                    "result": [{{
                        "meta": {{"currency": "TRY", "gmtoffset": 10800}},
                        "timestamp": [1746169200, 1746428400],
                        "indicators": {{"quote": [{{"close": [{first}, {second}]}}]}}
                    }}]
                }}
            }}"#
        )
    }

    pub fn write_workspace(dir: &Path, base_url: &str) -> String {
        let holdings = r#"{
            "TUM_FONLAR": [
                {"fon_adi": "ABC Hisse Fonu", "company_name": "ABC Portfoy", "period": "2025-03", "hisse_kodu": "AKBNK.E", "yuzdelik_deger": 5.5, "rapor_index": 1400001},
                {"fon_adi": "ABC Hisse Fonu", "company_name": "ABC Portfoy", "period": "2025-03", "hisse_kodu": "THYAO.E", "yuzdelik_deger": 3.0, "rapor_index": 1400001},
                {"fon_adi": "ABC Hisse Fonu", "company_name": "ABC Portfoy", "period": "2025-04", "hisse_kodu": "AKBNK.E", "yuzdelik_deger": 6.0, "rapor_index": 1400500},
                {"fon_adi": "XYZ Degisken Fon", "company_name": "XYZ Portfoy", "period": "2025-04", "hisse_kodu": "THYAO.E", "yuzdelik_deger": 2.0, "rapor_index": 1400600}
            ]
        }"#;
        let holdings_path = dir.join("analysis_data.json");
        fs::write(&holdings_path, holdings).expect("Failed to write holdings file");

        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
            holdings_path: "{}"
            prices_path: "{}"
            providers:
              yahoo:
                base_url: "{}"
            fetch:
              start_date: "2025-05-01"
            "#,
            holdings_path.display(),
            dir.join("stock_close_data.csv").display(),
            base_url
        );
        fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path.to_string_lossy().into_owned()
    }
}

#[test_log::test(tokio::test)]
async fn test_fetch_then_analyze() {
    let mock_server = MockServer::start().await;
    test_utils::mount(
        &mock_server,
        "/v8/finance/chart/AKBNK.IS",
        200,
        &test_utils::chart_response(40.5, 41.25),
    )
    .await;
    test_utils::mount(
        &mock_server,
        "/v8/finance/chart/THYAO.IS",
        200,
        &test_utils::chart_response(301.25, 305.0),
    )
    .await;
    test_utils::mount(
        &mock_server,
        "/v10/finance/quoteSummary/AKBNK.IS",
        200,
        r#"{"quoteSummary": {"result": [{"assetProfile": {"sector": "Financial Services", "industry": "Banks"}}]}}"#,
    )
    .await;
    test_utils::mount(&mock_server, "/v10/finance/quoteSummary/THYAO.IS", 404, "").await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_workspace(dir.path(), &mock_server.uri());

    let result = fonlens::run_command(fonlens::AppCommand::Fetch, Some(&config_path)).await;
    assert!(result.is_ok(), "Fetch failed with: {:?}", result.err());

    let csv = fs::read_to_string(dir.path().join("stock_close_data.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,Close,hisse_kodu,sector,industry");
    assert_eq!(lines.len(), 5);
    assert!(lines.contains(&"2025-05-05,41.25,AKBNK,Financial Services,Banks"));
    assert!(lines.contains(&"2025-05-02,301.25,THYAO,Unknown,Unknown"));

    let result = fonlens::run_command(
        fonlens::AppCommand::Dashboard {
            fund: Some("ABC Hisse Fonu".to_string()),
            period: None,
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Dashboard failed with: {:?}", result.err());

    let output = dir.path().join("export").join("prices.csv");
    let result = fonlens::run_command(
        fonlens::AppCommand::Export {
            output: output.clone(),
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Export failed with: {:?}", result.err());
    assert_eq!(fs::read_to_string(output).unwrap(), csv);
}

#[test_log::test(tokio::test)]
async fn test_failed_fetch_keeps_previous_prices() {
    let mock_server = MockServer::start().await;
    test_utils::mount(&mock_server, "/v8/finance/chart/AKBNK.IS", 500, "").await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_workspace(dir.path(), &mock_server.uri());
    let prices_path = dir.path().join("stock_close_data.csv");
    let previous = "Date,Close,hisse_kodu,sector,industry\n2025-04-30,39.0,AKBNK,Unknown,Unknown\n";
    fs::write(&prices_path, previous).unwrap();

    let result = fonlens::run_command(fonlens::AppCommand::Fetch, Some(&config_path)).await;
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("Failed to fetch prices for AKBNK"));
    assert_eq!(fs::read_to_string(&prices_path).unwrap(), previous);
}

#[test_log::test(tokio::test)]
async fn test_commands_without_prices() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_workspace(dir.path(), "http://127.0.0.1:9");

    let result = fonlens::run_command(
        fonlens::AppCommand::Export {
            output: dir.path().join("out.csv"),
        },
        Some(&config_path),
    )
    .await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "File not found. Please fetch data first."
    );

    let result = fonlens::run_command(
        fonlens::AppCommand::Changes {
            fund: "XYZ Degisken Fon".to_string(),
        },
        Some(&config_path),
    )
    .await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "insufficient history for fund XYZ Degisken Fon: found 1 period(s), need at least 2"
    );

    let result = fonlens::run_command(
        fonlens::AppCommand::Changes {
            fund: "ABC Hisse Fonu".to_string(),
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Changes failed with: {:?}", result.err());

    for command in [
        fonlens::AppCommand::Funds,
        fonlens::AppCommand::Popular { period: None },
        fonlens::AppCommand::Distribution { fund: None },
        fonlens::AppCommand::Holdings {
            fund: None,
            period: Some("2025-03".to_string()),
        },
    ] {
        let result = fonlens::run_command(command, Some(&config_path)).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }
}
