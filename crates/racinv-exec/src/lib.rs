//! racinv-exec: Remote execution for iDRAC controllers
//!
//! Provides the executor trait and an SSH implementation that authenticates
//! with a password or keyboard-interactive prompts.

pub mod auth;
pub mod error;
pub mod result;
pub mod ssh;
pub mod traits;

pub use auth::{Credentials, PasswordResponder};
pub use error::ExecError;
pub use result::{CommandResult, ConnectionInfo};
pub use ssh::{SshExecutor, SshExecutorBuilder};
pub use traits::RemoteExecutor;
