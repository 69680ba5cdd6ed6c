#![cfg(feature = "server")]

use osb_broker::Broker;
use osb_domain::config::{ApiConfig, ApiConfigInner, BrokerConfig};
use osb_domain::protocol::ProvisionDetails;
use osb_kernel::server::{ApiState, ApiStateError};

fn config(service_name: &str) -> ApiConfig {
    ApiConfig::new(ApiConfigInner {
        broker: BrokerConfig { service_name: service_name.to_owned(), ..BrokerConfig::default() },
        ..ApiConfigInner::default()
    })
}

#[test]
fn build_requires_config() {
    let err = ApiState::builder().build().expect_err("config is mandatory");
    assert!(matches!(err, ApiStateError::Validation { .. }));
}

#[test]
fn build_creates_broker_from_config() {
    let state = ApiState::builder().config(config("redis")).build().expect("state");
    assert_eq!(state.broker.config().service_name, "redis");
    assert_eq!(state.config.broker.service_name, "redis");
}

#[test]
fn build_keeps_supplied_broker() {
    let broker = Broker::new(BrokerConfig::default());
    broker.provision("i1", ProvisionDetails::default(), false);

    let state =
        ApiState::builder().config(config("redis")).broker(broker).build().expect("state");
    assert!(state.broker.get_instance("i1").is_ok());
}
