use super::{AsyncQuery, PROVISION, UPDATE, parse_body, require_ids};
use crate::error::ApiResult;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use osb_broker::Broker;
use osb_domain::constants::INSTANCES_TAG;
use osb_domain::protocol::{
    DeprovisionDetails, ErrorResponse, InstanceDetails, LastOperation, OperationResponse,
    PollDetails, ProvisionDetails, UpdateDetails,
};
use tracing::warn;

#[allow(clippy::unused_async)]
#[utoipa::path(
    put,
    path = "/v2/service_instances/{instance_id}",
    params(("instance_id" = String, Path, description = "Platform-assigned instance ID"), AsyncQuery),
    request_body = ProvisionDetails,
    responses(
        (status = CREATED, description = "Instance provisioned", body = OperationResponse),
        (status = OK, description = "Identical instance already provisioned", body = OperationResponse),
        (status = ACCEPTED, description = "Provisioning accepted, poll last_operation", body = OperationResponse),
        (status = BAD_REQUEST, description = "Malformed body or missing IDs", body = ErrorResponse),
    ),
    tag = INSTANCES_TAG,
    security(("basic_auth" = [])),
)]
pub(super) async fn provision(
    State(broker): State<Broker>,
    Path(instance_id): Path<String>,
    Query(query): Query<AsyncQuery>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<OperationResponse>)> {
    let details: ProvisionDetails = parse_body(&body, PROVISION)?;
    require_ids(&details.service_id, &details.plan_id, PROVISION)?;

    if !broker.catalog().contains_plan(&details.service_id, &details.plan_id) {
        warn!(
            instance_id,
            service_id = %details.service_id,
            plan_id = %details.plan_id,
            "Provisioning a plan the catalog does not offer"
        );
    }

    let result = broker.provision(&instance_id, details, query.accepts_incomplete());
    let status = if result.is_async {
        StatusCode::ACCEPTED
    } else if result.already_exists {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(result.into())))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    path = "/v2/service_instances/{instance_id}",
    params(("instance_id" = String, Path, description = "Platform-assigned instance ID")),
    responses(
        (status = OK, description = "The stored instance", body = InstanceDetails),
        (status = NOT_FOUND, description = "Unknown instance ID", body = ErrorResponse),
    ),
    tag = INSTANCES_TAG,
    security(("basic_auth" = [])),
)]
pub(super) async fn get_instance(
    State(broker): State<Broker>,
    Path(instance_id): Path<String>,
) -> ApiResult<Json<InstanceDetails>> {
    Ok(Json(broker.get_instance(&instance_id)?))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    patch,
    path = "/v2/service_instances/{instance_id}",
    params(("instance_id" = String, Path, description = "Platform-assigned instance ID"), AsyncQuery),
    request_body = UpdateDetails,
    responses(
        (status = OK, description = "Update accepted", body = OperationResponse),
        (status = ACCEPTED, description = "Update accepted, poll last_operation", body = OperationResponse),
        (status = BAD_REQUEST, description = "Malformed body", body = ErrorResponse),
    ),
    tag = INSTANCES_TAG,
    security(("basic_auth" = [])),
)]
pub(super) async fn update(
    State(broker): State<Broker>,
    Path(instance_id): Path<String>,
    Query(query): Query<AsyncQuery>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<OperationResponse>)> {
    let details: UpdateDetails = parse_body(&body, UPDATE)?;

    let result = broker.update(&instance_id, details, query.accepts_incomplete());
    let status = if result.is_async { StatusCode::ACCEPTED } else { StatusCode::OK };
    Ok((status, Json(result.into())))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    delete,
    path = "/v2/service_instances/{instance_id}",
    params(
        ("instance_id" = String, Path, description = "Platform-assigned instance ID"),
        ("service_id" = String, Query, description = "Service of the instance"),
        ("plan_id" = String, Query, description = "Plan of the instance"),
        AsyncQuery,
    ),
    responses(
        (status = OK, description = "Instance removed (or never existed)", body = OperationResponse),
        (status = ACCEPTED, description = "Removal accepted, poll last_operation", body = OperationResponse),
    ),
    tag = INSTANCES_TAG,
    security(("basic_auth" = [])),
)]
pub(super) async fn deprovision(
    State(broker): State<Broker>,
    Path(instance_id): Path<String>,
    Query(query): Query<AsyncQuery>,
    Query(details): Query<DeprovisionDetails>,
) -> (StatusCode, Json<OperationResponse>) {
    let result = broker.deprovision(&instance_id, details, query.accepts_incomplete());
    let status = if result.is_async { StatusCode::ACCEPTED } else { StatusCode::OK };
    (status, Json(result.into()))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    path = "/v2/service_instances/{instance_id}/last_operation",
    params(
        ("instance_id" = String, Path, description = "Platform-assigned instance ID"),
        ("service_id" = Option<String>, Query, description = "Service of the instance"),
        ("plan_id" = Option<String>, Query, description = "Plan of the instance"),
        ("operation" = Option<String>, Query, description = "Token from the async response"),
    ),
    responses((status = OK, description = "State of the last operation", body = LastOperation)),
    tag = INSTANCES_TAG,
    security(("basic_auth" = [])),
)]
pub(super) async fn last_operation(
    State(broker): State<Broker>,
    Path(instance_id): Path<String>,
    Query(details): Query<PollDetails>,
) -> Json<LastOperation> {
    Json(broker.last_operation(&instance_id, details))
}
