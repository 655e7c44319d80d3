use pbill_domain::config::LoggingConfig;
use pbill_logger::Logger;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn logging_config_with_directory_creates_json_log_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let config = LoggingConfig {
        name: "integration-file-logging".to_owned(),
        level: "debug".to_owned(),
        console: false,
        directory: Some(log_dir.clone()),
        json: true,
        ..LoggingConfig::default()
    };
    let logger = Logger::from_config(&config)?;
    assert!(logger.guard().is_some(), "file output should hold a worker guard");

    tracing::info!(sku = "premium_upgrade", "hello from integration test");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let line = contents
        .lines()
        .find(|line| line.contains("hello from integration test"))
        .expect("event should be written");
    assert!(line.trim_start().starts_with('{'), "file output should be JSON: {line}");
    assert!(line.contains("premium_upgrade"));

    Ok(())
}
