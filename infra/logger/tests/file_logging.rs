use osb_logger::{LevelFilter, Logger, Rotation};
use std::fs;
use tempfile::tempdir;

#[test]
fn file_sink_writes_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("nested").join("logs");

    let logger = Logger::builder()
        .name("broker-file")
        .console(false)
        .level(LevelFilter::INFO)
        .path(&log_dir)
        .rotation(Rotation::NEVER)
        .json()
        .init()?;

    tracing::info!(instance_id = "i1", "Provisioned service instance");
    tracing::debug!("below the level, never written");

    // Dropping the handle flushes the non-blocking worker.
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(log_file)?;
    let line = contents.lines().next().expect("one event should be written");
    let event: serde_json::Value = serde_json::from_str(line)?;
    assert_eq!(event["fields"]["instance_id"], "i1");
    assert_eq!(event["level"], "INFO");
    assert!(!contents.contains("below the level"));

    Ok(())
}
