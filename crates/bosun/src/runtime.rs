//! Container runtime client interface.

use std::sync::Arc;

use async_trait::async_trait;
use bosun_common::{BosunResult, ContainerName, ServiceName};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Result of a runtime lookup that completed without error.
///
/// A failed inspection is reported through the surrounding `Result`, so a
/// confirmed absence and a failure are never the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The object exists.
    Present(T),
    /// The runtime confirmed the object does not exist.
    Absent,
}

/// Image metadata returned by an inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Image ID.
    pub id: String,
}

/// Container metadata returned by an inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// Container ID.
    pub id: String,
    /// Name as reported by the runtime, usually with a leading `/`.
    pub name: ContainerName,
}

/// Receives the exit code of a container exactly once.
///
/// An `Err` payload means the runtime failed to observe the exit.
pub type ExitReceiver = oneshot::Receiver<BosunResult<i64>>;

/// Container runtime operations used by the lifecycle layer.
///
/// Clients must be safe to use from several services concurrently.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Look up an image in the local image store.
    async fn inspect_image(&self, reference: &str) -> BosunResult<Lookup<ImageInfo>>;

    /// Look up a container by ID.
    async fn inspect_container(&self, id: &str) -> BosunResult<Lookup<ContainerInfo>>;

    /// Rename a container.
    async fn rename_container(&self, old_name: &str, new_name: &str) -> BosunResult<()>;

    /// Subscribe to the exit of a container.
    fn wait(&self, id: &str) -> ExitReceiver;
}

/// Produces runtime clients for services.
pub trait ClientFactory: Send + Sync {
    /// Create (or hand out a shared) client for the given service.
    fn create(&self, service: &ServiceName) -> Arc<dyn RuntimeClient>;
}

/// A factory that hands every service the same client.
impl ClientFactory for Arc<dyn RuntimeClient> {
    fn create(&self, _service: &ServiceName) -> Arc<dyn RuntimeClient> {
        Arc::clone(self)
    }
}
