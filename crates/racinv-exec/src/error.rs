//! Error types for racinv-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during remote execution
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Failed to connect to remote host
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Could not open a session channel or start the command on it
    #[error("failed to start remote command: {0}")]
    SessionFailed(String),

    /// Command execution failed
    #[error("command execution failed: {status} - {stderr}")]
    CommandFailed {
        /// Exit status code
        status: i32,
        /// Stderr output
        stderr: String,
    },

    /// Command timed out
    #[error("command timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// Connection not established
    #[error("not connected")]
    NotConnected,

    /// Closing the session failed
    #[error("disconnect failed: {0}")]
    Disconnect(String),
}

impl ExecError {
    /// Whether the error happened before a session was available
    /// (dial or authentication)
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ExecError::ConnectionFailed(_) | ExecError::AuthenticationFailed(_)
        )
    }
}
