// Error types for content store access

use thiserror::Error;

/// Errors returned by an [`EatStore`](crate::traits::EatStore)
///
/// Non-2xx responses keep the status code and raw body for diagnostics.
/// Nothing here is retried; callers decide whether a failure is fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Credentials were rejected
    #[error("content store login failed ({status}): {body}")]
    Auth { status: u16, body: String },

    /// Any other non-2xx response
    #[error("content store error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The request never produced a response (connect, timeout, body read)
    #[error("content store request failed: {0}")]
    Transport(String),

    /// The response body was not the expected JSON
    #[error("failed to decode content store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        StoreError::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        StoreError::Decode(msg.into())
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Auth { status, .. } | StoreError::Api { status, .. } => Some(*status),
            StoreError::Transport(_) | StoreError::Decode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_keeps_body() {
        let err = StoreError::Api {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "content store error (500): boom");
        assert_eq!(err.status(), Some(500));
        assert_eq!(StoreError::transport("refused").status(), None);
    }
}
