use crate::error::{ApiError, ApiResult};
use axum::extract::{MatchedPath, Request, State};
use axum::http::{HeaderMap, Method};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use osb_domain::config::ApiConfig;
use osb_domain::constants::{API_MAJOR_VERSION, API_VERSION_HEADER, MIN_RETRIEVAL_MINOR_VERSION};
use sha2::{Digest, Sha256};

/// Rejects `/v2` requests without the configured HTTP Basic credentials.
pub(crate) async fn require_basic_auth(
    State(config): State<ApiConfig>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let (username, password) =
        basic_credentials(request.headers()).ok_or_else(ApiError::unauthorized)?;

    let security = &config.security;
    if !(digest_eq(&username, &security.username) & digest_eq(&password, &security.password)) {
        return Err(ApiError::unauthorized());
    }

    Ok(next.run(request).await)
}

/// Rejects `/v2` requests that do not declare a supported `X-Broker-API-Version`.
pub(crate) async fn require_api_version(request: Request, next: Next) -> ApiResult<Response> {
    let raw = request
        .headers()
        .get(API_VERSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .ok_or_else(|| {
            ApiError::precondition_failed(format!("{API_VERSION_HEADER} header is missing"))
        })?;

    let route = request.extensions().get::<MatchedPath>().map(MatchedPath::as_str);
    let min_minor =
        if is_retrieval(request.method(), route) { MIN_RETRIEVAL_MINOR_VERSION } else { 0 };

    match parse_version(&raw) {
        Some((major, minor)) if major == API_MAJOR_VERSION && minor >= min_minor => {
            Ok(next.run(request).await)
        }
        _ => Err(ApiError::precondition_failed(format!(
            "{API_VERSION_HEADER} must be {API_MAJOR_VERSION}.x with x >= {min_minor}, got '{raw}'"
        ))),
    }
}

/// Fetching an instance or binding and polling a binding arrived with 2.14.
fn is_retrieval(method: &Method, route: Option<&str>) -> bool {
    *method == Method::GET
        && route.is_some_and(|route| {
            route.starts_with("/v2/service_instances/")
                && !route.ends_with("/{instance_id}/last_operation")
        })
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_owned(), password.to_owned()))
}

/// Fixed-length comparison of two secrets.
fn digest_eq(given: &str, expected: &str) -> bool {
    Sha256::digest(given.as_bytes()) == Sha256::digest(expected.as_bytes())
}

fn parse_version(raw: &str) -> Option<(u32, u32)> {
    let (major, minor) = raw.trim().split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}
