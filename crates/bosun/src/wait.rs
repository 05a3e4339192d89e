//! Waiting for a foreground container to run to completion.

use std::time::Duration;

use bosun_common::{BosunError, BosunResult};
use tokio_util::sync::CancellationToken;

use crate::identity::CurrentContainer;
use crate::runtime::ExitReceiver;
use crate::service::LifecycleService;

impl LifecycleService {
    /// Block until the service's container exits.
    ///
    /// Succeeds immediately if the service has no container. Exit code zero is
    /// success; any other code is a [`BosunError::NonZeroExit`].
    ///
    /// # Errors
    ///
    /// Returns runtime errors unchanged, the error carried by the exit
    /// notification, or a cancellation, timeout or closed-channel error.
    pub async fn wait(&self, cancel: &CancellationToken) -> BosunResult<()> {
        let Some(CurrentContainer { client, info }) = self.current_container().await? else {
            return Ok(());
        };

        tracing::debug!(service = %self.name(), container = %info.id, "Waiting for container to exit");
        let exit = client.wait(&info.id);

        let code = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(BosunError::WaitCancelled { container: info.id.clone() });
            }
            code = self.exit_code(exit, &info.id) => code?,
        };

        if code != 0 {
            return Err(BosunError::NonZeroExit {
                service: self.name().to_string(),
                container: info.id,
                code,
            });
        }

        tracing::info!(service = %self.name(), container = %info.id, "Container completed");
        Ok(())
    }

    async fn exit_code(&self, exit: ExitReceiver, container: &str) -> BosunResult<i64> {
        let closed = || BosunError::WaitClosed {
            container: container.to_string(),
        };

        match self.options().wait_timeout_ms {
            Some(timeout_ms) => tokio::time::timeout(Duration::from_millis(timeout_ms), exit)
                .await
                .map_err(|_| BosunError::WaitTimeout {
                    container: container.to_string(),
                    timeout_ms,
                })?
                .map_err(|_| closed())?,
            None => exit.await.map_err(|_| closed())?,
        }
    }
}
