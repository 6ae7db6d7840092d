use httpmock::prelude::*;
use rec_etl::config::Target;
use rec_etl::{run_scrape, CliConfig, TomlConfig};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

const HOURS_PAGE: &str = include_str!("fixtures/hours.html");
const CLASSES_PAGE: &str = include_str!("fixtures/classes.html");

fn cli_config(server: &MockServer, output_path: &str, formats: &[&str]) -> CliConfig {
    CliConfig {
        hours_url: server.url("/recreation/hours.php"),
        classes_url: server.url("/recreation/group-classes.php"),
        output_path: output_path.to_string(),
        hours_file: "schedule.json".to_string(),
        classes_file: "group_classes.json".to_string(),
        output_formats: formats.iter().map(|f| f.to_string()).collect(),
        target: Target::All,
        timeout_seconds: 5,
        retry_attempts: 0,
        retry_delay_seconds: 0,
        verbose: false,
        log_json: false,
        monitor: false,
    }
}

fn read_json(dir: &Path, name: &str) -> anyhow::Result<Value> {
    let bytes = std::fs::read(dir.join(name))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn test_end_to_end_scrape_writes_both_reports() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let hours_mock = server.mock(|when, then| {
        when.method(GET).path("/recreation/hours.php");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(HOURS_PAGE);
    });
    let classes_mock = server.mock(|when, then| {
        when.method(GET).path("/recreation/group-classes.php");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(CLASSES_PAGE);
    });

    let config = cli_config(&server, &output_path, &["json", "csv"]);
    let summary = run_scrape(&config, config.target, false).await?;

    hours_mock.assert();
    classes_mock.assert();
    assert!(summary.is_success());
    assert_eq!(summary.outputs.len(), 2);
    assert_eq!(summary.exit_code(), 0);

    let schedule = read_json(temp_dir.path(), "schedule.json")?;
    assert_eq!(schedule["Building Hours"]["Monday"], json!(["0600 - 2300"]));
    assert_eq!(
        schedule["Pool and Sauna Hours"]["Tuesday"],
        json!(["0600 - 1100", "1500 - 2100"])
    );
    assert_eq!(schedule["Pool and Sauna Hours"]["Thursday"], json!(["1500 - 2100"]));
    assert_eq!(schedule["Climbing Wall Hours"]["Friday"], "CLOSED");
    assert_eq!(schedule["Pool and Sauna Hours"]["Saturday"], json!([]));
    assert_eq!(schedule["Updated Time"], "Updated January 6, 2025");

    let classes = read_json(temp_dir.path(), "group_classes.json")?;
    let classes = classes["Classes"].as_array().unwrap();
    assert_eq!(classes.len(), 4);
    assert_eq!(classes[1]["Class Name"], "Pilates");
    assert_eq!(classes[1]["Location"], "Studio B");

    assert!(temp_dir.path().join("schedule.csv").exists());
    assert!(temp_dir.path().join("group_classes.csv").exists());

    Ok(())
}

#[tokio::test]
async fn test_failing_hours_page_does_not_stop_classes() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/recreation/hours.php");
        then.status(503);
    });
    server.mock(|when, then| {
        when.method(GET).path("/recreation/group-classes.php");
        then.status(200).body(CLASSES_PAGE);
    });

    let config = cli_config(&server, &output_path, &["json"]);
    let summary = run_scrape(&config, Target::All, false).await?;

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, "hours");
    assert_eq!(summary.exit_code(), 2);
    assert!(!temp_dir.path().join("schedule.json").exists());
    assert!(temp_dir.path().join("group_classes.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_changed_classes_layout_is_an_extraction_failure() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/recreation/group-classes.php");
        then.status(200).body("<html><body><p>Moved</p></body></html>");
    });

    let config = cli_config(&server, &output_path, &["json"]);
    let summary = run_scrape(&config, Target::Classes, false).await?;

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.exit_code(), 1);
    assert!(!temp_dir.path().join("group_classes.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_toml_config_scrapes_only_its_target() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let hours_mock = server.mock(|when, then| {
        when.method(GET).path("/hours");
        then.status(200).body(HOURS_PAGE);
    });
    let classes_mock = server.mock(|when, then| {
        when.method(GET).path("/classes");
        then.status(200).body(CLASSES_PAGE);
    });

    let toml_content = format!(
        r#"
[scraper]
name = "integration"
target = "hours"

[source]
hours_url = "{}"
classes_url = "{}"
timeout_seconds = 5

[load]
output_path = "{}"
hours_filename = "hours.json"
"#,
        server.url("/hours"),
        server.url("/classes"),
        output_path
    );
    let config = TomlConfig::from_toml_str(&toml_content)?;
    let summary = run_scrape(&config, config.target(), false).await?;

    assert!(summary.is_success());
    hours_mock.assert();
    classes_mock.assert_hits(0);

    let schedule = read_json(temp_dir.path(), "hours.json")?;
    assert_eq!(schedule["Climbing Wall Hours"]["Sunday"], "CLOSED");
    assert!(!temp_dir.path().join("group_classes.json").exists());

    Ok(())
}
