//! Error types for racinv-inventory

use racinv_exec::ExecError;
use thiserror::Error;

/// Malformed `racadm hwinventory` output
///
/// Line numbers are 1-based and `line` is the raw text of the offending line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Section marker without an id token after `InstanceID:`
    #[error("line {line_no}: section marker has no instance tag: {line:?}")]
    MalformedSection { line_no: usize, line: String },

    /// Property line without `=` or with an empty key
    #[error("line {line_no}: expected `key = value`: {line:?}")]
    MalformedProperty { line_no: usize, line: String },

    /// Property line seen before any section marker
    #[error("line {line_no}: property outside of any [InstanceID: ...] section: {line:?}")]
    OrphanProperty { line_no: usize, line: String },

    /// Record id generator failed
    #[error("failed to generate record id: {0}")]
    IdGeneration(String),

    /// Record id generator returned an id already in use
    #[error("duplicate record id: {0}")]
    DuplicateId(String),
}

/// Errors that can occur while collecting the inventory
#[derive(Error, Debug, Clone)]
pub enum InventoryError {
    /// Connecting to, authenticating with, or running the command on the controller failed
    #[error("execution error: {0}")]
    Execution(#[from] ExecError),

    /// Output could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Output parsed but contained no records
    #[error("no inventory records found in output: {raw:?}")]
    Empty {
        /// Raw command output
        raw: String,
    },
}

impl InventoryError {
    /// Check if the controller could not be reached or refused the login
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, InventoryError::Execution(e) if e.is_connection_error())
    }
}
