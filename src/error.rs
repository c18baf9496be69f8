//! Module defining the errors which are exposed to the users of the crate

use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// User-provided search parameters violating the request invariants, e.g., an end date before the start date
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A failed provider call
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A provider response lacking a field without which no row can be built
    #[error("malformed offering: {message}")]
    MalformedOffering { message: String },

    /// Failure while rendering a result table
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub(crate) fn validation_error(message: impl Into<String>) -> Error {
    Error::Validation {
        message: message.into(),
    }
}

pub(crate) fn malformed_offering(message: impl Into<String>) -> Error {
    Error::MalformedOffering {
        message: message.into(),
    }
}

/// Error codes with which a provider signals that a feature is not offered in a region.
const UNSUPPORTED_FEATURE_SIGNALS: [&str; 2] = ["InvalidAction", "AuthFailure"];

/// Classification of a failed provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The provider answered with an error (permissions, throttling, unsupported action, ...)
    Service,
    /// The call never got an answer (connection, DNS, timeout)
    Transport,
    /// The request was rejected before it was sent
    Validation,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::Service => write!(f, "service"),
            ProviderErrorKind::Transport => write!(f, "transport"),
            ProviderErrorKind::Validation => write!(f, "validation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    kind: ProviderErrorKind,
    code: Option<String>,
    message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    /// Error answered by the provider, carrying its machine-readable code.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Service,
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Validation, message)
    }

    pub fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the provider refused the call because the feature is not available for the caller in this
    /// region. Checks the error code and, for providers that only report text, the message.
    pub fn is_unsupported_feature(&self) -> bool {
        UNSUPPORTED_FEATURE_SIGNALS.iter().any(|signal| {
            self.code.as_deref().is_some_and(|code| code.contains(signal))
                || self.message.contains(signal)
        })
    }
}
