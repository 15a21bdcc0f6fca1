//! Remote executor trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandResult;

/// Runs commands on a remote controller
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Run a command and capture its complete output
    async fn run(&self, cmd: &str) -> Result<CommandResult, ExecError>;

    /// Run a command, failing with `ExecError::Timeout` if it does not finish in time
    async fn run_with_timeout(
        &self,
        cmd: &str,
        timeout: Duration,
    ) -> Result<CommandResult, ExecError>;

    /// Release the remote session. Calling it without an open session is a no-op.
    async fn close(&self) -> Result<(), ExecError> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn executor_type(&self) -> &'static str;
}
