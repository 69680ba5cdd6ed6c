//! Protocol-level constants shared by the core and the HTTP adapter.

/// Header every `/v2` request must carry.
pub const API_VERSION_HEADER: &str = "X-Broker-API-Version";

/// Major protocol version every `/v2` request must declare.
pub const API_MAJOR_VERSION: u32 = 2;

/// Oldest minor version for fetching instances and bindings and for polling bindings.
pub const MIN_RETRIEVAL_MINOR_VERSION: u32 = 14;

// Operation tags attached to failures for diagnostics.
pub const GET_INSTANCE: &str = "get-instance";
pub const GET_BINDING: &str = "get-binding";
pub const LAST_BINDING_OPERATION: &str = "last-binding-operation";

// Operation tokens returned with async responses and echoed back on polls.
pub const PROVISION_OPERATION: &str = "provision";
pub const DEPROVISION_OPERATION: &str = "deprovision";
pub const UPDATE_OPERATION: &str = "update";

// OpenAPI tags.
pub const SYSTEM_TAG: &str = "System";
pub const CATALOG_TAG: &str = "Catalog";
pub const INSTANCES_TAG: &str = "Service Instances";
pub const BINDINGS_TAG: &str = "Service Bindings";
