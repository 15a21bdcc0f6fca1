//! Fetch and parse the controller inventory

use std::sync::Arc;
use std::time::Duration;

use racinv_exec::{ExecError, RemoteExecutor};
use tracing::{info, instrument, warn};

use crate::error::InventoryError;
use crate::parser::InventoryParser;
use crate::types::InventorySet;

/// Command that lists the hardware inventory on an iDRAC
pub const HWINVENTORY_COMMAND: &str = "racadm hwinventory";

/// Default time allowed for the inventory command
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Inventory collector
///
/// Runs the inventory command once and parses its output.
pub struct InventoryCollector {
    executor: Arc<dyn RemoteExecutor>,
    timeout: Duration,
}

impl InventoryCollector {
    /// Create a new inventory collector
    pub fn new(executor: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            executor,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set command timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run `racadm hwinventory` and parse its output
    ///
    /// The executor is closed before returning, whatever the outcome.
    ///
    /// # Errors
    /// Returns `InventoryError::Execution` if the command cannot be run or
    /// exits non-zero, `InventoryError::Parse` on malformed output, and
    /// `InventoryError::Empty` if the output holds no records.
    #[instrument(skip(self), fields(executor = self.executor.executor_type()))]
    pub async fn collect(&self) -> Result<InventorySet, InventoryError> {
        info!(command = HWINVENTORY_COMMAND, "collecting hardware inventory");

        let result = self
            .executor
            .run_with_timeout(HWINVENTORY_COMMAND, self.timeout)
            .await;

        if let Err(e) = self.executor.close().await {
            warn!(error = %e, "failed to close remote session");
        }

        let result = result?;
        if !result.success() {
            return Err(ExecError::CommandFailed {
                status: result.status,
                stderr: result.stderr,
            }
            .into());
        }

        let inventory = InventoryParser::new().parse(&result.stdout)?;
        if inventory.is_empty() {
            return Err(InventoryError::Empty { raw: result.stdout });
        }

        info!(records = inventory.len(), "collected hardware inventory");

        Ok(inventory)
    }
}
