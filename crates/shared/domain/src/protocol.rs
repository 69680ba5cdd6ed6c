//! Open Service Broker v2 wire types.
//!
//! Three families live here:
//! * **Details**: what the platform sends (request bodies and query strings).
//! * **Results**: what the lifecycle engine returns to the adapter.
//! * **Responses**: what goes back over the wire.
//!
//! Parameter and credential documents are arbitrary JSON and stay `serde_json::Value`.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

// ============ Catalog ============

/// Body of `GET /v2/catalog`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CatalogResponse {
    pub services: Vec<Service>,
}

/// A service offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub bindable: bool,
    pub instances_retrievable: bool,
    pub bindings_retrievable: bool,
    pub plan_updateable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ServiceMetadata>,
    pub plans: Vec<ServicePlan>,
}

/// Display hints for marketplace UIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceMetadata {
    #[serde(rename = "displayName", default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "String::is_empty")]
    pub image_url: String,
}

/// A plan of a service offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServicePlan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub free: bool,
}

// ============ Parameters ============

/// The `parameters` document of a request, kept verbatim until the engine parses it.
///
/// Absent and `null` parameters are both represented as "no document".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters(Option<String>);

impl RawParameters {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Some(raw.into()))
    }

    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        if value.is_null() { Self(None) } else { Self(Some(value.to_string())) }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Decodes the document. An absent document decodes to `Value::Null`.
    pub fn parse(&self) -> Result<Value, serde_json::Error> {
        self.0.as_deref().map_or(Ok(Value::Null), serde_json::from_str)
    }
}

impl<'de> Deserialize<'de> for RawParameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Box<RawValue>>::deserialize(deserializer)?;
        Ok(Self(raw.map(|r| r.get().to_owned())))
    }
}

impl Serialize for RawParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_deref().map(serde_json::from_str::<&RawValue>) {
            Some(Ok(raw)) => raw.serialize(serializer),
            // Unparseable documents only come from in-process callers; emit them as text.
            Some(Err(_)) => serializer.serialize_str(self.0.as_deref().unwrap_or_default()),
            None => serializer.serialize_none(),
        }
    }
}

// ============ Details (requests) ============

/// Body of `PUT /v2/service_instances/{instance_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct ProvisionDetails {
    pub service_id: String,
    pub plan_id: String,
    pub organization_guid: String,
    pub space_guid: String,
    #[serde(rename = "parameters", skip_serializing_if = "RawParameters::is_empty")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub raw_parameters: RawParameters,
    #[serde(skip_serializing_if = "Value::is_null")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub context: Value,
}

/// Body of `PATCH /v2/service_instances/{instance_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct UpdateDetails {
    pub service_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(rename = "parameters", skip_serializing_if = "RawParameters::is_empty")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub raw_parameters: RawParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_values: Option<PreviousValues>,
    #[serde(skip_serializing_if = "Value::is_null")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub context: Value,
}

/// What the instance looked like before an update, as the platform remembers it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct PreviousValues {
    pub service_id: Option<String>,
    pub plan_id: Option<String>,
    pub organization_id: Option<String>,
    pub space_id: Option<String>,
}

/// Query of `DELETE /v2/service_instances/{instance_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeprovisionDetails {
    pub service_id: String,
    pub plan_id: String,
}

/// Body of `PUT .../service_bindings/{binding_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct BindDetails {
    pub service_id: String,
    pub plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,
    #[serde(skip_serializing_if = "Value::is_null")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub bind_resource: Value,
    #[serde(rename = "parameters", skip_serializing_if = "RawParameters::is_empty")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub raw_parameters: RawParameters,
    #[serde(skip_serializing_if = "Value::is_null")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub context: Value,
}

/// Query of `DELETE .../service_bindings/{binding_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnbindDetails {
    pub service_id: String,
    pub plan_id: String,
}

/// Query of the `last_operation` endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollDetails {
    pub service_id: Option<String>,
    pub plan_id: Option<String>,
    #[serde(rename = "operation")]
    pub operation_data: Option<String>,
}

// ============ Results (engine → adapter) ============

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionResult {
    pub is_async: bool,
    /// An identical record was already stored under the same instance ID.
    pub already_exists: bool,
    pub dashboard_url: Option<String>,
    pub operation_data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeprovisionResult {
    pub is_async: bool,
    pub operation_data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub is_async: bool,
    pub dashboard_url: Option<String>,
    pub operation_data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnbindResult {
    pub is_async: bool,
    pub operation_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingResult {
    pub credentials: Value,
    pub syslog_drain_url: Option<String>,
    /// An identical binding was already stored under the same binding ID.
    pub already_exists: bool,
}

/// A stored service instance, also the body of `GET /v2/service_instances/{instance_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InstanceDetails {
    pub service_id: String,
    pub plan_id: String,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub parameters: Value,
}

/// A stored binding, also the body of `GET .../service_bindings/{binding_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BindingDetails {
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub credentials: Value,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub parameters: Value,
}

/// State of the last asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum OperationState {
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "succeeded")]
    Succeeded,
    #[serde(rename = "failed")]
    Failed,
}

/// Body of the `last_operation` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LastOperation {
    pub state: OperationState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ============ Responses ============

/// Body of provision/update/deprovision/unbind responses. Serializes to `{}` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OperationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    #[serde(rename = "operation", default, skip_serializing_if = "Option::is_none")]
    pub operation_data: Option<String>,
}

/// Body of a bind response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BindingResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub credentials: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syslog_drain_url: Option<String>,
}

/// Failure body. `error` is a machine-readable code where the protocol defines one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub description: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self { error: None, description: description.into() }
    }

    #[must_use]
    pub fn with_code(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self { error: Some(code.into()), description: description.into() }
    }
}

impl From<ProvisionResult> for OperationResponse {
    fn from(result: ProvisionResult) -> Self {
        Self { dashboard_url: result.dashboard_url, operation_data: result.operation_data }
    }
}

impl From<UpdateResult> for OperationResponse {
    fn from(result: UpdateResult) -> Self {
        Self { dashboard_url: result.dashboard_url, operation_data: result.operation_data }
    }
}

impl From<DeprovisionResult> for OperationResponse {
    fn from(result: DeprovisionResult) -> Self {
        Self { dashboard_url: None, operation_data: result.operation_data }
    }
}

impl From<UnbindResult> for OperationResponse {
    fn from(result: UnbindResult) -> Self {
        Self { dashboard_url: None, operation_data: result.operation_data }
    }
}

impl From<BindingResult> for BindingResponse {
    fn from(result: BindingResult) -> Self {
        Self { credentials: result.credentials, syslog_drain_url: result.syslog_drain_url }
    }
}
