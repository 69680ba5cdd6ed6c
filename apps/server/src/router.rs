use crate::api;
use crate::middleware::{require_api_version, require_basic_auth};
use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use osb_kernel::server::{ApiState, system_router};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(title = "Open Service Broker", description = "Reference broker for the OSB v2 protocol"),
    modifiers(&BasicAuthScheme)
)]
struct ApiDoc;

struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let scheme = HttpBuilder::new().scheme(HttpAuthScheme::Basic).build();
        openapi
            .components
            .get_or_insert_with(Default::default)
            .add_security_scheme("basic_auth", SecurityScheme::Http(scheme));
    }
}

/// Builds the full application: `/health`, the authenticated `/v2` surface and `/docs`.
pub fn init(state: ApiState) -> Router {
    // Auth is the outer layer, so a bad credential wins over a bad version header.
    let v2 = api::router()
        .layer(from_fn(require_api_version))
        .layer(from_fn_with_state(state.clone(), require_basic_auth));

    let (routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(system_router())
        .merge(v2)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    Router::new().merge(routes).merge(Scalar::with_url("/docs", api_doc))
}
