use super::{AsyncQuery, BIND, parse_body, require_ids};
use crate::error::ApiResult;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use osb_broker::Broker;
use osb_domain::constants::BINDINGS_TAG;
use osb_domain::protocol::{
    BindDetails, BindingDetails, BindingResponse, ErrorResponse, LastOperation,
    OperationResponse, PollDetails, UnbindDetails,
};

#[allow(clippy::unused_async)]
#[utoipa::path(
    put,
    path = "/v2/service_instances/{instance_id}/service_bindings/{binding_id}",
    params(
        ("instance_id" = String, Path, description = "Platform-assigned instance ID"),
        ("binding_id" = String, Path, description = "Platform-assigned binding ID"),
        AsyncQuery,
    ),
    request_body = BindDetails,
    responses(
        (status = CREATED, description = "Binding created", body = BindingResponse),
        (status = OK, description = "Identical binding already exists", body = BindingResponse),
        (status = BAD_REQUEST, description = "Malformed body or missing IDs", body = ErrorResponse),
    ),
    tag = BINDINGS_TAG,
    security(("basic_auth" = [])),
)]
pub(super) async fn bind(
    State(broker): State<Broker>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    Query(query): Query<AsyncQuery>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<BindingResponse>)> {
    let details: BindDetails = parse_body(&body, BIND)?;
    require_ids(&details.service_id, &details.plan_id, BIND)?;

    let result = broker.bind(&instance_id, &binding_id, details, query.accepts_incomplete());
    let status = if result.already_exists { StatusCode::OK } else { StatusCode::CREATED };
    Ok((status, Json(result.into())))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    path = "/v2/service_instances/{instance_id}/service_bindings/{binding_id}",
    params(
        ("instance_id" = String, Path, description = "Platform-assigned instance ID"),
        ("binding_id" = String, Path, description = "Platform-assigned binding ID"),
    ),
    responses(
        (status = OK, description = "The stored binding", body = BindingDetails),
        (status = NOT_FOUND, description = "Unknown binding ID", body = ErrorResponse),
    ),
    tag = BINDINGS_TAG,
    security(("basic_auth" = [])),
)]
pub(super) async fn get_binding(
    State(broker): State<Broker>,
    Path((instance_id, binding_id)): Path<(String, String)>,
) -> ApiResult<Json<BindingDetails>> {
    Ok(Json(broker.get_binding(&instance_id, &binding_id)?))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    delete,
    path = "/v2/service_instances/{instance_id}/service_bindings/{binding_id}",
    params(
        ("instance_id" = String, Path, description = "Platform-assigned instance ID"),
        ("binding_id" = String, Path, description = "Platform-assigned binding ID"),
        ("service_id" = String, Query, description = "Service of the instance"),
        ("plan_id" = String, Query, description = "Plan of the instance"),
        AsyncQuery,
    ),
    responses((status = OK, description = "Binding removed (or never existed)", body = OperationResponse)),
    tag = BINDINGS_TAG,
    security(("basic_auth" = [])),
)]
pub(super) async fn unbind(
    State(broker): State<Broker>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    Query(query): Query<AsyncQuery>,
    Query(details): Query<UnbindDetails>,
) -> (StatusCode, Json<OperationResponse>) {
    let result = broker.unbind(&instance_id, &binding_id, details, query.accepts_incomplete());
    let status = if result.is_async { StatusCode::ACCEPTED } else { StatusCode::OK };
    (status, Json(result.into()))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    path = "/v2/service_instances/{instance_id}/service_bindings/{binding_id}/last_operation",
    params(
        ("instance_id" = String, Path, description = "Platform-assigned instance ID"),
        ("binding_id" = String, Path, description = "Platform-assigned binding ID"),
        ("operation" = Option<String>, Query, description = "Token from the async response"),
    ),
    responses(
        (status = NOT_IMPLEMENTED, description = "Bindings never complete asynchronously", body = ErrorResponse),
    ),
    tag = BINDINGS_TAG,
    security(("basic_auth" = [])),
)]
pub(super) async fn last_binding_operation(
    State(broker): State<Broker>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    Query(details): Query<PollDetails>,
) -> ApiResult<Json<LastOperation>> {
    Ok(Json(broker.last_binding_operation(&instance_id, &binding_id, details)?))
}
