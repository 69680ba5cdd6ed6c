use axum::Json;
use axum::extract::State;
use osb_broker::Broker;
use osb_domain::constants::CATALOG_TAG;
use osb_domain::protocol::CatalogResponse;

#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    path = "/v2/catalog",
    responses((status = OK, description = "The service offering and its plan", body = CatalogResponse)),
    tag = CATALOG_TAG,
    security(("basic_auth" = [])),
)]
pub(super) async fn catalog(State(broker): State<Broker>) -> Json<CatalogResponse> {
    Json(broker.catalog().to_response())
}
