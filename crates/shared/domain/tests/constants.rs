use osb_domain::constants::{
    API_MAJOR_VERSION, API_VERSION_HEADER, DEPROVISION_OPERATION, MIN_RETRIEVAL_MINOR_VERSION,
    PROVISION_OPERATION, UPDATE_OPERATION,
};

#[test]
fn version_gate_matches_protocol() {
    assert_eq!(API_VERSION_HEADER, "X-Broker-API-Version");
    assert_eq!(API_MAJOR_VERSION, 2);
    assert_eq!(MIN_RETRIEVAL_MINOR_VERSION, 14);
}

#[test]
fn operation_tokens_match_wire_strings() {
    assert_eq!(PROVISION_OPERATION, "provision");
    assert_eq!(DEPROVISION_OPERATION, "deprovision");
    assert_eq!(UPDATE_OPERATION, "update");
}
