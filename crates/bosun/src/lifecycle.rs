//! Lifecycle sequencing: create, name, start, wait, reload check.

use bosun_common::BosunResult;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::policy::Detach;
use crate::service::LifecycleService;

/// Successful result of bringing a service up.
#[must_use = "a restart request must be forwarded to the deployment"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// The service is up.
    Ready,
    /// The service is up and the whole deployment must now restart.
    RestartRequested,
}

impl Activation {
    /// Returns true if the deployment has to restart.
    #[must_use]
    pub const fn restart_requested(self) -> bool {
        matches!(self, Self::RestartRequested)
    }
}

impl LifecycleService {
    /// Create the service's container and give it the service name.
    ///
    /// # Errors
    ///
    /// Returns the base create error or a reconciliation error unchanged.
    pub async fn create(&self) -> BosunResult<()> {
        self.base().create().await?;
        self.reconcile().await?;
        Ok(())
    }

    /// Bring the service up.
    ///
    /// Creates and names the container, then (unless create-only) starts it
    /// and, for foreground services, waits for it to exit successfully.
    /// `cancel` only interrupts that wait.
    ///
    /// # Errors
    ///
    /// The first failing step aborts the sequence; nothing is rolled back.
    pub async fn up(&self, cancel: &CancellationToken) -> BosunResult<Activation> {
        let policy = *self.policy();

        self.create().await?;

        if policy.create_only {
            tracing::info!(service = %self.name(), "Created without starting (create-only)");
            return Ok(self.activation());
        }

        self.base().up().await?;
        tracing::info!(service = %self.name(), "Service started");

        if policy.detach == Detach::Foreground {
            self.wait(cancel).await?;
        }

        Ok(self.activation())
    }

    fn activation(&self) -> Activation {
        if self.policy().reload_config {
            tracing::info!(service = %self.name(), "Service requests a deployment restart");
            Activation::RestartRequested
        } else {
            Activation::Ready
        }
    }
}
