use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use osb_broker::BrokerError;
use osb_domain::protocol::ErrorResponse;
use std::borrow::Cow;
use tracing::{error, warn};

/// Failures of the HTTP adapter, each mapped to a protocol status and body.
#[osb_derive::osb_error]
pub enum ApiError {
    #[error("{source}{}", format_context(.context))]
    Broker { source: BrokerError, context: Option<Cow<'static, str>> },

    /// The request body or query does not have the shape the operation needs.
    #[error("Malformed request{}: {message}", format_context(.context))]
    BadRequest {
        message: Cow<'static, str>,
        operation: &'static str,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unauthorized{}", format_context(.context))]
    Unauthorized { context: Option<Cow<'static, str>> },

    /// Missing or unsupported `X-Broker-API-Version`.
    #[error("{message}{}", format_context(.context))]
    PreconditionFailed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    pub(crate) fn bad_request(message: impl Into<Cow<'static, str>>, operation: &'static str) -> Self {
        Self::BadRequest { message: message.into(), operation, context: None }
    }

    pub(crate) const fn unauthorized() -> Self {
        Self::Unauthorized { context: None }
    }

    pub(crate) fn precondition_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::PreconditionFailed { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Broker { source: BrokerError::NotFound { .. }, .. } => StatusCode::NOT_FOUND,
            Self::Broker { source: BrokerError::Unsupported { .. }, .. } => {
                StatusCode::NOT_IMPLEMENTED
            },
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::PreconditionFailed { .. } => StatusCode::PRECONDITION_FAILED,
            Self::Broker { source: BrokerError::Internal { .. }, .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Operation tag for diagnostics, when one applies.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Broker { source, .. } => source.operation(),
            Self::BadRequest { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            Self::Broker { source: BrokerError::NotFound { message, .. }, .. } => {
                ErrorResponse::new(message.as_ref())
            },
            Self::Broker { source: err @ BrokerError::Unsupported { .. }, .. } => {
                ErrorResponse::with_code("NotImplemented", err.to_string())
            },
            Self::Unauthorized { .. } => ErrorResponse::new("Unauthorized"),
            Self::PreconditionFailed { message, .. } => ErrorResponse::new(message.as_ref()),
            Self::BadRequest { message, .. } => ErrorResponse::new(message.as_ref()),
            Self::Broker { .. } | Self::Internal { .. } => ErrorResponse::new("Internal server error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let operation = self.operation().unwrap_or_default();

        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            error!(status = status.as_u16(), operation, error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), operation, error = %self, "Request rejected");
        }

        let mut response = (status, Json(self.body())).into_response();
        if matches!(self, Self::Unauthorized { .. }) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
        }
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
