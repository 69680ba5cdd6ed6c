//! `/v2` handlers. Each one decodes the wire shape, calls the [`Broker`](osb_broker::Broker)
//! and encodes the result; protocol semantics live in the broker.

mod bindings;
mod catalog;
mod instances;

use crate::error::{ApiError, ApiResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

// Operation tags for request-shape failures.
const PROVISION: &str = "provision";
const UPDATE: &str = "update";
const BIND: &str = "bind";

/// `?accepts_incomplete=` on mutating calls.
///
/// Only the exact value `true` opts in; anything else, empty included, reads as `false`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub(crate) struct AsyncQuery {
    /// The platform can poll for completion.
    #[param(value_type = Option<bool>)]
    accepts_incomplete: Option<String>,
}

impl AsyncQuery {
    pub(crate) fn accepts_incomplete(&self) -> bool {
        self.accepts_incomplete.as_deref().is_some_and(|value| value == "true")
    }
}

pub(crate) fn router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
    osb_broker::Broker: axum::extract::FromRef<S>,
{
    OpenApiRouter::new()
        .routes(routes!(catalog::catalog))
        .routes(routes!(
            instances::provision,
            instances::get_instance,
            instances::update,
            instances::deprovision
        ))
        .routes(routes!(instances::last_operation))
        .routes(routes!(bindings::bind, bindings::get_binding, bindings::unbind))
        .routes(routes!(bindings::last_binding_operation))
}

fn parse_body<T: DeserializeOwned>(body: &[u8], operation: &'static str) -> ApiResult<T> {
    serde_json::from_slice(body)
        .map_err(|err| ApiError::bad_request(format!("Invalid JSON body: {err}"), operation))
}

fn require_ids(service_id: &str, plan_id: &str, operation: &'static str) -> ApiResult<()> {
    match (service_id.is_empty(), plan_id.is_empty()) {
        (false, false) => Ok(()),
        (true, _) => Err(ApiError::bad_request("service_id is required", operation)),
        (false, true) => Err(ApiError::bad_request("plan_id is required", operation)),
    }
}
