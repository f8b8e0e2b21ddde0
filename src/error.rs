//! Error types for the memovox client core
//!
//! One crate-wide taxonomy; every variant is recovered locally and surfaced
//! as a human-readable string on a session- or flow-scoped error field.

use thiserror::Error;

/// Memovox client errors
#[derive(Error, Debug, Clone)]
pub enum MemovoxError {
    /// Operation requires a held credential and none exists
    #[error("not authenticated")]
    NotAuthenticated,

    /// Transport-level failure (DNS, connect, timeout, aborted body)
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// Non-success response with a parseable `error` field in the body
    #[error("server rejected request: {0}")]
    ServerRejected(String),

    /// Non-success response without a parseable error body
    #[error("server rejected request (status {0})")]
    ServerRejectedOpaque(u16),

    /// Audio payload could not be decoded; callers fall back to estimation
    #[error("audio decode failed: {0}")]
    DecodeFailure(String),

    /// Audio output device initialization or playback error
    #[error("audio device error: {0}")]
    AudioDevice(String),

    /// Credential persistence error
    #[error("credential storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for MemovoxError {
    fn from(e: std::io::Error) -> Self {
        MemovoxError::Storage(e.to_string())
    }
}

impl From<reqwest::Error> for MemovoxError {
    fn from(e: reqwest::Error) -> Self {
        MemovoxError::NetworkFailure(e.to_string())
    }
}

impl MemovoxError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors allow the flow to continue (possibly degraded),
    /// while non-recoverable errors require user intervention.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The user has to log in again
            MemovoxError::NotAuthenticated => false,
            // Transient; the next request may succeed
            MemovoxError::NetworkFailure(_) => true,
            MemovoxError::ServerRejected(_) => true,
            MemovoxError::ServerRejectedOpaque(_) => true,
            // Duration estimation takes over
            MemovoxError::DecodeFailure(_) => true,
            // Playback degrades to clock-only progress
            MemovoxError::AudioDevice(_) => true,
            // The credential file is unusable
            MemovoxError::Storage(_) => false,
        }
    }

    /// Get a user-friendly description of the error
    ///
    /// Returns a message suitable for display in the UI.
    pub fn user_message(&self) -> String {
        match self {
            MemovoxError::NotAuthenticated => "Please log in to continue.".to_string(),
            MemovoxError::NetworkFailure(_) => {
                "Could not reach the server. Please check your connection.".to_string()
            }
            MemovoxError::ServerRejected(message) => message.clone(),
            MemovoxError::ServerRejectedOpaque(_) => {
                "The server rejected the request. Please try again.".to_string()
            }
            MemovoxError::DecodeFailure(_) => {
                "The recording could not be decoded.".to_string()
            }
            MemovoxError::AudioDevice(_) => {
                "Audio device error. Please check your speakers.".to_string()
            }
            MemovoxError::Storage(_) => {
                "Could not access stored credentials.".to_string()
            }
        }
    }
}

/// Result type alias for memovox operations
pub type Result<T> = std::result::Result<T, MemovoxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_failure_is_recoverable() {
        assert!(MemovoxError::NetworkFailure("timed out".into()).is_recoverable());
        assert!(!MemovoxError::NotAuthenticated.is_recoverable());
    }

    #[test]
    fn test_server_rejected_surfaces_message() {
        let err = MemovoxError::ServerRejected("bad credentials".into());
        assert_eq!(err.user_message(), "bad credentials");
        assert!(err.to_string().contains("bad credentials"));
    }
}
