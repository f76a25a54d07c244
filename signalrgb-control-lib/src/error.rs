use thiserror::Error;

use crate::model::ErrorDetail;

/// Errors reported by the SignalRGB client.
///
/// `Unexpected` is the catch-all for failures not otherwise classified; the
/// remaining kinds narrow it: `Connection` for network-level failures,
/// `Api` for reachable-but-unhappy servers, and `NotFound` for lookups that
/// matched nothing (an `Api` error whose code is `not_found`, remapped at
/// the operation boundary).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalRgbError {
    /// Network-level connect failure or timeout.
    #[error("{message}")]
    Connection {
        message: String,
        error: Option<ErrorDetail>,
    },

    /// The server was reachable but returned a non-success HTTP status or an
    /// envelope whose status was not `ok`.
    #[error("{message}")]
    Api {
        message: String,
        error: Option<ErrorDetail>,
    },

    /// An effect, preset, or layout lookup matched nothing.
    #[error("{message}")]
    NotFound {
        message: String,
        error: Option<ErrorDetail>,
    },

    /// Any failure not otherwise classified.
    #[error("{message}")]
    Unexpected { message: String },
}

pub type Result<T> = std::result::Result<T, SignalRgbError>;

impl SignalRgbError {
    pub(crate) fn connection(message: impl Into<String>, error: Option<ErrorDetail>) -> Self {
        SignalRgbError::Connection {
            message: message.into(),
            error,
        }
    }

    pub(crate) fn api(message: impl Into<String>, error: Option<ErrorDetail>) -> Self {
        SignalRgbError::Api {
            message: message.into(),
            error,
        }
    }

    pub(crate) fn not_found(message: impl Into<String>, error: Option<ErrorDetail>) -> Self {
        SignalRgbError::NotFound {
            message: message.into(),
            error,
        }
    }

    pub(crate) fn unexpected(message: impl Into<String>) -> Self {
        SignalRgbError::Unexpected {
            message: message.into(),
        }
    }

    /// The structured error reported by the API, if one was attached.
    pub fn error_detail(&self) -> Option<&ErrorDetail> {
        match self {
            SignalRgbError::Connection { error, .. }
            | SignalRgbError::Api { error, .. }
            | SignalRgbError::NotFound { error, .. } => error.as_ref(),
            SignalRgbError::Unexpected { .. } => None,
        }
    }

    /// The error code, if available.
    pub fn code(&self) -> Option<&str> {
        self.error_detail().and_then(|e| e.code.as_deref())
    }

    /// The error title, if available.
    pub fn title(&self) -> Option<&str> {
        self.error_detail().map(|e| e.title.as_str())
    }

    /// The detailed error message, if available.
    pub fn detail(&self) -> Option<&str> {
        self.error_detail().and_then(|e| e.detail.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_expose_attached_detail() {
        let err = SignalRgbError::api(
            "API returned non-OK status: error",
            Some(ErrorDetail {
                title: "Not Found".to_string(),
                code: Some("not_found".to_string()),
                detail: Some("no such effect".to_string()),
            }),
        );
        assert_eq!(err.code(), Some("not_found"));
        assert_eq!(err.title(), Some("Not Found"));
        assert_eq!(err.detail(), Some("no such effect"));
    }

    #[test]
    fn test_accessors_without_detail() {
        let err = SignalRgbError::unexpected("An unexpected error occurred: boom");
        assert!(err.error_detail().is_none());
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "An unexpected error occurred: boom");
    }

    #[test]
    fn test_display_uses_message() {
        let err = SignalRgbError::connection(
            "Request timed out",
            Some(ErrorDetail::from_title("Request Timeout")),
        );
        assert_eq!(err.to_string(), "Request timed out");
    }
}
