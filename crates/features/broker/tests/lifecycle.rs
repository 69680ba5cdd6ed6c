use osb_broker::{Broker, BrokerError};
use osb_domain::config::BrokerConfig;
use osb_domain::protocol::{
    BindDetails, DeprovisionDetails, OperationState, PollDetails, ProvisionDetails,
    RawParameters, UnbindDetails, UpdateDetails,
};
use serde_json::{Value, json};
use std::thread;

fn broker(fake_async: bool, fake_stateful: bool) -> Broker {
    Broker::new(BrokerConfig {
        credentials: json!({ "uri": "redis://shared:6379" }),
        fake_async,
        fake_stateful,
        ..BrokerConfig::default()
    })
}

fn provision_details(parameters: &str) -> ProvisionDetails {
    ProvisionDetails {
        service_id: "s".to_owned(),
        plan_id: "p".to_owned(),
        raw_parameters: RawParameters::new(parameters),
        ..ProvisionDetails::default()
    }
}

fn bind_details(parameters: &str) -> BindDetails {
    BindDetails {
        service_id: "s".to_owned(),
        plan_id: "p".to_owned(),
        raw_parameters: RawParameters::new(parameters),
        ..BindDetails::default()
    }
}

#[test]
fn provision_then_get_instance_round_trips() {
    let broker = broker(false, true);

    let result = broker.provision("i1", provision_details(r#"{"x":1}"#), false);
    assert!(!result.is_async);
    assert!(!result.already_exists);
    assert!(result.operation_data.is_none());

    let instance = broker.get_instance("i1").expect("instance should exist");
    assert_eq!(instance.service_id, "s");
    assert_eq!(instance.plan_id, "p");
    assert_eq!(instance.parameters, json!({ "x": 1 }));
}

#[test]
fn unknown_instance_is_not_found() {
    let broker = broker(false, true);

    let err = broker.get_instance("unknown").expect_err("lookup should fail");
    assert!(matches!(err, BrokerError::NotFound { operation: "get-instance", .. }));
    assert_eq!(err.operation(), Some("get-instance"));
    assert!(err.to_string().contains("unknown"));
}

#[test]
fn malformed_parameters_still_provision() {
    let broker = broker(false, false);

    broker.provision("i1", provision_details("{not json"), false);
    let instance = broker.get_instance("i1").expect("instance should exist");
    assert_eq!(instance.parameters, Value::Null);
}

#[test]
fn reprovision_overwrites_and_flags_identical_repeats() {
    let broker = broker(false, false);

    broker.provision("i1", provision_details(r#"{"x":1}"#), false);
    let repeat = broker.provision("i1", provision_details(r#"{"x":1}"#), false);
    assert!(repeat.already_exists);

    let changed = broker.provision("i1", provision_details(r#"{"x":2}"#), false);
    assert!(!changed.already_exists);
    assert_eq!(broker.get_instance("i1").unwrap().parameters, json!({ "x": 2 }));
    assert_eq!(broker.instances().len(), 1);
}

#[test]
fn is_async_follows_fake_async() {
    for fake_async in [false, true] {
        let broker = broker(fake_async, false);

        let provision = broker.provision("i1", provision_details("{}"), true);
        assert_eq!(provision.is_async, fake_async);
        assert_eq!(provision.operation_data.is_some(), fake_async);

        let update = broker.update("i1", UpdateDetails::default(), true);
        assert_eq!(update.is_async, fake_async);

        let deprovision = broker.deprovision("i1", DeprovisionDetails::default(), true);
        assert_eq!(deprovision.is_async, fake_async);

        let poll = broker.last_operation("i1", PollDetails::default());
        assert_eq!(poll.state, OperationState::Succeeded);
    }
}

#[test]
fn update_does_not_touch_the_record() {
    let broker = broker(false, true);
    broker.provision("i1", provision_details(r#"{"x":1}"#), false);

    let details = UpdateDetails {
        service_id: "s".to_owned(),
        plan_id: Some("other".to_owned()),
        raw_parameters: RawParameters::new(r#"{"x":99}"#),
        ..UpdateDetails::default()
    };
    broker.update("i1", details, false);

    let instance = broker.get_instance("i1").unwrap();
    assert_eq!(instance.plan_id, "p");
    assert_eq!(instance.parameters, json!({ "x": 1 }));
}

#[test]
fn deprovision_always_succeeds_and_removes_the_record() {
    let broker = broker(false, true);

    broker.deprovision("never-provisioned", DeprovisionDetails::default(), false);

    broker.provision("i1", provision_details("{}"), false);
    broker.deprovision("i1", DeprovisionDetails::default(), false);
    assert!(broker.get_instance("i1").is_err());
}

#[test]
fn bind_returns_configured_credentials_for_any_instance() {
    let broker = broker(false, true);

    let result = broker.bind("not-provisioned", "b1", bind_details("{}"), false);
    assert_eq!(result.credentials, json!({ "uri": "redis://shared:6379" }));
    assert!(result.syslog_drain_url.is_none());

    let binding = broker.get_binding("i1", "b1").expect("binding should exist");
    assert_eq!(binding.credentials, json!({ "uri": "redis://shared:6379" }));
    assert_eq!(binding.parameters, json!({}));
}

#[test]
fn bind_carries_syslog_drain_when_configured() {
    let broker = Broker::new(BrokerConfig {
        syslog_drain_url: Some("syslog://logs:514".to_owned()),
        ..BrokerConfig::default()
    });

    let result = broker.bind("i1", "b1", bind_details("{}"), false);
    assert_eq!(result.syslog_drain_url.as_deref(), Some("syslog://logs:514"));
}

#[test]
fn unknown_binding_is_not_found() {
    let broker = broker(false, true);

    let err = broker.get_binding("i1", "missing").expect_err("lookup should fail");
    assert_eq!(err.operation(), Some("get-binding"));
}

#[test]
fn unbind_always_succeeds_and_removes_the_binding() {
    let broker = broker(true, true);

    let result = broker.unbind("i1", "never-bound", UnbindDetails::default(), false);
    assert!(!result.is_async);

    broker.bind("i1", "b1", bind_details("{}"), false);
    broker.unbind("i1", "b1", UnbindDetails::default(), false);
    assert!(broker.get_binding("i1", "b1").is_err());
}

#[test]
fn binding_poll_is_unsupported() {
    let broker = broker(true, true);

    let err = broker
        .last_binding_operation("i1", "b1", PollDetails::default())
        .expect_err("binding polls are unsupported");
    assert!(matches!(err, BrokerError::Unsupported { operation: "last-binding-operation", .. }));
}

#[test]
fn brokers_do_not_share_state() {
    let first = broker(false, true);
    let second = broker(false, true);

    first.provision("i1", provision_details("{}"), false);
    assert!(second.get_instance("i1").is_err());
}

#[test]
fn concurrent_lifecycle_calls_keep_the_registry_consistent() {
    let broker = broker(false, true);

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let broker = broker.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    let instance_id = format!("i-{worker}-{i}");
                    let binding_id = format!("b-{worker}-{i}");
                    broker.provision(&instance_id, provision_details("{}"), false);
                    broker.provision("contended", provision_details(&format!("{{\"w\":{worker}}}")), false);
                    broker.bind(&instance_id, &binding_id, bind_details("{}"), false);
                    assert!(broker.get_instance(&instance_id).is_ok());
                    assert!(broker.get_binding(&instance_id, &binding_id).is_ok());
                    broker.unbind(&instance_id, &binding_id, UnbindDetails::default(), false);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker panicked");
    }

    assert_eq!(broker.instances().len(), 8 * 100 + 1);
    assert!(broker.bindings().is_empty());
    assert!(broker.get_instance("contended").is_ok());
}
