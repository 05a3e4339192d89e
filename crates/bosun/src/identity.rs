//! Container identity reconciliation.

use std::sync::Arc;

use bosun_common::{BosunResult, ContainerName};

use crate::runtime::{ContainerInfo, Lookup, RuntimeClient};
use crate::service::LifecycleService;

/// What a reconciliation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The service has no container.
    NoContainer,
    /// The container already carries the service name (or has no name).
    InSync,
    /// The container was renamed from the given name.
    Renamed {
        /// Name the container had before the rename.
        from: ContainerName,
    },
}

/// The service's container and the client it was inspected with.
pub(crate) struct CurrentContainer {
    pub(crate) client: Arc<dyn RuntimeClient>,
    pub(crate) info: ContainerInfo,
}

impl LifecycleService {
    /// Make the service's container carry the service name.
    ///
    /// Only the first container the base service enumerates is considered.
    ///
    /// # Errors
    ///
    /// Returns runtime errors from listing, inspecting or renaming unchanged.
    pub async fn reconcile(&self) -> BosunResult<Reconciliation> {
        let Some(CurrentContainer { client, info }) = self.current_container().await? else {
            return Ok(Reconciliation::NoContainer);
        };

        if info.name.is_empty() || info.name.matches(self.name()) {
            return Ok(Reconciliation::InSync);
        }

        tracing::debug!(
            service = %self.name(),
            container = %info.id,
            "Renaming container {} => {}",
            info.name,
            self.name()
        );
        client
            .rename_container(info.name.display(), self.name().as_str())
            .await?;

        Ok(Reconciliation::Renamed { from: info.name })
    }

    /// Fetch the first container of the service, freshly inspected.
    ///
    /// A container that disappeared between listing and inspection counts as
    /// no container.
    pub(crate) async fn current_container(&self) -> BosunResult<Option<CurrentContainer>> {
        let containers = self.base().containers().await?;
        let Some(first) = containers.first() else {
            return Ok(None);
        };

        let client = self.client();
        match client.inspect_container(&first.id).await? {
            Lookup::Present(info) => Ok(Some(CurrentContainer { client, info })),
            Lookup::Absent => {
                tracing::debug!(service = %self.name(), container = %first.id, "Container vanished before inspection");
                Ok(None)
            }
        }
    }
}
