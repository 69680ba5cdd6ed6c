use std::borrow::Cow;

/// A specialized [`BrokerError`] enum of this crate.
#[osb_derive::osb_error]
pub enum BrokerError {
    /// The instance or binding is not in the registry. Maps to a 404.
    #[error("{message}{}", format_context(.context))]
    NotFound {
        message: Cow<'static, str>,
        operation: &'static str,
        context: Option<Cow<'static, str>>,
    },
    /// The broker declines to implement this protocol operation.
    #[error("Operation '{operation}' is not supported by this broker{}", format_context(.context))]
    Unsupported { operation: &'static str, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal broker error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl BrokerError {
    pub(crate) fn not_found(message: impl Into<Cow<'static, str>>, operation: &'static str) -> Self {
        Self::NotFound { message: message.into(), operation, context: None }
    }

    pub(crate) const fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation, context: None }
    }

    /// The diagnostic operation tag, when the failure carries one.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { operation, .. } | Self::Unsupported { operation, .. } => {
                Some(*operation)
            },
            Self::Internal { .. } => None,
        }
    }
}

pub type BrokerResult<T> = Result<T, BrokerError>;
