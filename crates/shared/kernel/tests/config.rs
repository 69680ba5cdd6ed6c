use config::Map;
use osb_kernel::config::{BrokerSettings, ConfigError, load_config_from};
use serde_json::json;
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr};

fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
    Some(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect())
}

fn settings(pairs: &[(&str, &str)]) -> BrokerSettings {
    load_config_from(None::<&str>, env(pairs)).expect("settings load")
}

#[test]
fn empty_environment_resolves_to_defaults() {
    let cfg = settings(&[]).resolve().expect("resolve");

    assert_eq!(cfg.broker.service_name, "some-service-name");
    assert_eq!(cfg.broker.plan_name, "shared");
    assert_eq!(cfg.broker.base_guid, "29140B3F-0E69-4C7E-8A35");
    assert_eq!(cfg.broker.credentials, json!({ "port": "4000" }));
    assert_eq!(cfg.broker.tags, vec!["shared", "worlds-simplest-service-broker"]);
    assert!(cfg.broker.image_url.is_empty());
    assert!(cfg.broker.syslog_drain_url.is_none());
    assert!(!cfg.broker.fake_async);
    assert!(!cfg.broker.fake_stateful);
    assert!(cfg.security.username.is_empty());
    assert_eq!(cfg.server.port, 3000);
    assert_eq!(cfg.server.address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
}

#[test]
fn environment_overrides_every_field() {
    let cfg = settings(&[
        ("SERVICE_NAME", "redis"),
        ("SERVICE_PLAN_NAME", "small"),
        ("BASE_GUID", "ABC"),
        ("CREDENTIALS", r#"{"uri":"redis://h:6379"}"#),
        ("TAGS", "cache, kv"),
        ("IMAGE_URL", "https://img/logo.png"),
        ("SYSLOG_DRAIN_URL", "syslog://logs:514"),
        ("FAKE_ASYNC", "True"),
        ("FAKE_STATEFUL", "true"),
        ("AUTH_USER", "admin"),
        ("AUTH_PASSWORD", "secret"),
        ("PORT", "8080"),
        ("ADDRESS", "127.0.0.1"),
    ])
    .resolve()
    .expect("resolve");

    assert_eq!(cfg.broker.service_id(), "ABC-service-redis");
    assert_eq!(cfg.broker.plan_id(), "ABC-plan-small");
    assert_eq!(cfg.broker.credentials, json!({ "uri": "redis://h:6379" }));
    assert_eq!(cfg.broker.tags, vec!["cache", "kv"]);
    assert_eq!(cfg.broker.image_url, "https://img/logo.png");
    assert_eq!(cfg.broker.syslog_drain_url.as_deref(), Some("syslog://logs:514"));
    assert!(cfg.broker.fake_async);
    assert!(cfg.broker.fake_stateful);
    assert_eq!(cfg.security.username, "admin");
    assert_eq!(cfg.security.password, "secret");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.server.address, IpAddr::V4(Ipv4Addr::LOCALHOST));
}

#[test]
fn empty_values_fall_back_to_defaults() {
    let cfg = settings(&[("SERVICE_NAME", ""), ("TAGS", ""), ("PORT", "")])
        .resolve()
        .expect("resolve");

    assert_eq!(cfg.broker.service_name, "some-service-name");
    assert_eq!(cfg.broker.tags.len(), 2);
    assert_eq!(cfg.server.port, 3000);
}

#[test]
fn flags_other_than_true_are_false() {
    let cfg = settings(&[("FAKE_ASYNC", "1"), ("FAKE_STATEFUL", "yes")]).resolve().expect("resolve");

    assert!(!cfg.broker.fake_async);
    assert!(!cfg.broker.fake_stateful);
}

#[test]
fn malformed_credentials_use_placeholder() {
    let cfg = settings(&[("CREDENTIALS", "{not json")]).resolve().expect("resolve");
    assert_eq!(cfg.broker.credentials, json!({ "port": "4000" }));
}

#[test]
fn port_accepts_leading_colon() {
    let cfg = settings(&[("PORT", ":8080")]).resolve().expect("resolve");
    assert_eq!(cfg.server.port, 8080);
}

#[test]
fn invalid_port_is_rejected() {
    let err = settings(&[("PORT", "eighty")]).resolve().expect_err("port must be numeric");
    assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
}

#[test]
fn invalid_address_is_rejected() {
    let err = settings(&[("ADDRESS", "localhost:3000")]).resolve().expect_err("not an IP");
    assert!(matches!(err, ConfigError::Invalid { key: "ADDRESS", .. }));
}

#[test]
fn file_values_are_overridden_by_environment() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
    writeln!(file, "service_name = \"from-file\"\nservice_plan_name = \"gold\"\nport = 9000")
        .expect("write config");

    let settings: BrokerSettings =
        load_config_from(Some(file.path()), env(&[("SERVICE_NAME", "from-env")]))
            .expect("settings load");
    let cfg = settings.resolve().expect("resolve");

    assert_eq!(cfg.broker.service_name, "from-env");
    assert_eq!(cfg.broker.plan_name, "gold");
    assert_eq!(cfg.server.port, 9000);
}

#[test]
fn missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent");

    let settings: BrokerSettings = load_config_from(Some(&path), env(&[])).expect("settings load");
    assert!(settings.service_name.is_none());
}
