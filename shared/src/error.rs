//! Error kinds surfaced by the remote client and the dashboard.

use thiserror::Error;

use crate::models::ReportId;

/// Failure of a single remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request did not complete within its time budget.
    #[error("request timed out after {seconds}s")]
    Timeout {
        /// Budget that was exceeded.
        seconds: u64,
    },
    /// The server answered with a non-success status.
    #[error("HTTP error {status}{}", http_suffix(.message))]
    Http {
        /// Response status code.
        status: u16,
        /// Message from the structured error payload, when there was one.
        message: Option<String>,
    },
    /// The server could not be reached at all (DNS, refused connection,
    /// cross-origin rejection, aborted fetch).
    #[error("server unreachable: {0}")]
    NetworkUnreachable(String),
    /// The body was not the JSON shape the caller needed.
    #[error("invalid response: {0}")]
    InvalidResponseShape(String),
    /// Credentials were valid but the account lacks moderator privilege.
    #[error("access denied: admin privileges required")]
    AccessDenied,
    /// The addressed message or report does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Timeouts and transport failures: the backend never answered.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Timeout { .. } | ApiError::NetworkUnreachable(_))
    }

    /// 401/403 from the backend.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, ApiError::Http { status: 401 | 403, .. })
    }

    /// Text for inline error messages. Unreachable servers, rejected
    /// credentials and missing privileges read differently.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout {
                ..
            } => "Request timed out. Please try again later.".to_string(),
            ApiError::NetworkUnreachable(_) => {
                "Unable to reach the server. Check that the backend is running and allows this \
                 origin."
                    .to_string()
            },
            ApiError::Http {
                status: 401 | 403,
                message,
            } => message
                .clone()
                .unwrap_or_else(|| "Invalid email or password".to_string()),
            ApiError::Http {
                status,
                message,
            } => message
                .clone()
                .unwrap_or_else(|| format!("HTTP error! Status: {status}")),
            ApiError::InvalidResponseShape(_) => {
                "Unexpected response from the server.".to_string()
            },
            ApiError::AccessDenied => "Access denied: Admin privileges required".to_string(),
            ApiError::NotFound(what) => format!("{what} not found"),
            ApiError::Validation(message) => message.clone(),
        }
    }
}

fn http_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Failure of a dashboard moderation action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The single remote call behind the action failed.
    #[error(transparent)]
    Remote(#[from] ApiError),
    /// Every per-report update of a bulk action failed.
    #[error("failed to update {} report(s)", .failures.len())]
    BulkFailed {
        /// Each report id with the error its update returned.
        failures: Vec<(ReportId, ApiError)>,
    },
    /// The action needs data the controller does not hold.
    #[error("{0}")]
    Unavailable(String),
}

impl ActionError {
    /// Text for the inline message next to the action buttons.
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Remote(err) => err.user_message(),
            ActionError::BulkFailed {
                failures,
            } => {
                let detail = failures
                    .first()
                    .map(|(_, err)| err.user_message())
                    .unwrap_or_default();
                format!("Failed to update reports: {detail}")
            },
            ActionError::Unavailable(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn unreachable_and_rejected_messages_differ() {
        let unreachable = ApiError::NetworkUnreachable("connection refused".to_string());
        let rejected = ApiError::Http {
            status: 401,
            message: None,
        };

        assert!(unreachable.is_unreachable());
        assert!(!rejected.is_unreachable());
        assert!(rejected.is_auth_rejected());
        assert_ne!(unreachable.user_message(), rejected.user_message());
        assert_eq!(rejected.user_message(), "Invalid email or password");
    }

    #[test]
    fn http_display_includes_payload_message() {
        let err = ApiError::Http {
            status: 500,
            message: Some("database down".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP error 500: database down");
        let bare = ApiError::Http {
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "HTTP error 502");
    }

    #[test]
    fn timeout_counts_as_unreachable() {
        assert!(ApiError::Timeout {
            seconds: 15
        }
        .is_unreachable());
        assert!(!ApiError::AccessDenied.is_unreachable());
    }
}
