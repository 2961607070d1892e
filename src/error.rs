//! Error types for the Mailosaur client.

use thiserror::Error;

/// Errors returned by [`Client`](crate::Client) operations.
///
/// [`Error::Request`] and [`Error::Api`] are transport failures and are never
/// retried. [`Error::PollTimeout`] means a search ran out of time without a
/// match; use [`Error::is_timeout`] and [`Error::is_transport`] to tell them
/// apart.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human readable description of the failure.
        message: String,
    },

    /// A response body did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// No message matched the search criteria within the timeout.
    #[error(
        "No matching messages found in time. By default, only messages received in the last hour are checked \
         (use receivedAfter to override this). The search criteria used for this query was \
         [{criteria}] which timed out after {timeout_ms}ms"
    )]
    PollTimeout {
        /// The search criteria as sent, in JSON.
        criteria: String,
        /// The configured timeout.
        timeout_ms: u64,
    },

    /// A search resolved without any match where one was required.
    #[error("no message matched the search criteria")]
    NoMatch,

    /// The email preview was still being generated when the budget ran out.
    #[error(
        "An email preview was not generated in time. The email client may not be available, \
         or the preview ID [{preview_id}] may be incorrect."
    )]
    PreviewTimeout {
        /// Identifier of the preview that was requested.
        preview_id: String,
    },

    /// The preview download returned a status that is neither ready nor pending.
    #[error("Failed to download preview. Status code: {0}")]
    PreviewStatus(u16),

    /// The outer ceiling around a poll sequence fired.
    #[error("operation did not complete within {after_ms}ms")]
    Deadline {
        /// The ceiling that was exceeded.
        after_ms: u64,
    },

    /// The client is missing required configuration.
    #[error("{0}")]
    Configuration(String),
}

impl Error {
    pub(crate) fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// `true` for failures of the HTTP exchange itself (network errors and
    /// non-success statuses).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Api { .. })
    }

    /// `true` when a polling operation gave up because its time budget ran out.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::PollTimeout { .. } | Self::PreviewTimeout { .. } | Self::Deadline { .. }
        )
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            Self::PreviewStatus(status) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_timeout_names_criteria_and_timeout() {
        let err = Error::PollTimeout {
            criteria: r#"{"subject":"X"}"#.to_string(),
            timeout_ms: 5000,
        };
        let message = err.to_string();
        assert!(message.contains(r#"[{"subject":"X"}]"#));
        assert!(message.contains("timed out after 5000ms"));
        assert!(err.is_timeout());
        assert!(!err.is_transport());
    }

    #[test]
    fn api_errors_are_transport_errors() {
        let err = Error::api(401, "Authentication failed, check your API key.");
        assert!(err.is_transport());
        assert!(!err.is_timeout());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Authentication failed, check your API key.");
    }

    #[test]
    fn configuration_error_is_neither() {
        let err = Error::Configuration("missing key".into());
        assert!(!err.is_transport());
        assert!(!err.is_timeout());
        assert_eq!(err.status(), None);
    }
}
