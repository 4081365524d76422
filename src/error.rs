//! Error types for tola-reveal.
//!
//! The reveal core absorbs almost every failure (degenerate geometry, unknown
//! subtypes, unreachable comment sources). What remains are the engine's own
//! refusals and configuration problems.

use thiserror::Error;

use crate::node::NodeId;

/// Errors surfaced by the reveal engine.
#[derive(Debug, Error)]
pub enum RevealError {
    /// The engine is single-shot; `run` was called a second time.
    #[error("reveal engine already ran; create a new engine to reveal again")]
    AlreadyRun,

    /// The requested node does not exist in the tree.
    #[error("node {0} is not in the tree")]
    MissingNode(NodeId),

    /// Timing configuration could not be parsed.
    #[error("invalid timing configuration: {0}")]
    Config(String),
}

/// Result type alias for reveal operations.
pub type RevealResult<T> = Result<T, RevealError>;

impl RevealError {
    /// Create a configuration error from any error type.
    pub fn config(err: impl std::error::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RevealError {
    fn from(err: serde_json::Error) -> Self {
        Self::config(err)
    }
}

/// Errors raised inside the comment board collaborator.
///
/// These never reach the engine: the board logs them and falls back to
/// local storage.
#[derive(Debug, Error)]
pub enum CommentError {
    /// The remote source could not be reached or refused the request.
    #[error("comment source unavailable: {0}")]
    Unavailable(String),

    /// The remote answered with a non-success status.
    #[error("comment source returned status {status}")]
    Status {
        /// HTTP-like status code
        status: u16,
    },

    /// Stored or fetched data was not a valid comment list.
    #[error("malformed comment data: {0}")]
    Decode(String),
}

impl CommentError {
    /// Create an unavailability error with a message.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

impl From<serde_json::Error> for CommentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RevealError::MissingNode(NodeId::from_raw(7));
        assert_eq!(err.to_string(), "node #7 is not in the tree");

        let err = CommentError::Status { status: 502 };
        assert_eq!(err.to_string(), "comment source returned status 502");
    }

    #[test]
    fn test_config_error_from_json() {
        let err: RevealError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, RevealError::Config(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RevealError>();
        assert_send_sync::<CommentError>();
    }
}
