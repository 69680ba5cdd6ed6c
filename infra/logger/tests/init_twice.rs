use osb_logger::{LevelFilter, Logger, LoggerError};
use serial_test::serial;

#[test]
#[serial]
fn init_twice_returns_subscriber_error() {
    let _logger = Logger::builder()
        .name("broker-first")
        .level(LevelFilter::INFO)
        .init()
        .expect("first init should succeed");

    let err = Logger::builder()
        .name("broker-second")
        .level(LevelFilter::INFO)
        .init()
        .expect_err("second init should fail");

    assert!(
        matches!(err, LoggerError::Subscriber { .. }),
        "expected subscriber error for second init"
    );
}

#[test]
#[serial]
fn console_disabled_without_file_is_invalid() {
    let err = Logger::builder()
        .name("broker-silent")
        .console(false)
        .init()
        .expect_err("no layers");

    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
}
