//! The base service abstraction the lifecycle layer wraps.

use std::collections::HashMap;

use async_trait::async_trait;
use bosun_common::{BosunResult, ServiceName};
use serde::{Deserialize, Serialize};

use crate::relationship::Relationship;

/// Resolved configuration of a single service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Image reference, if the service runs an image.
    pub image: Option<String>,
    /// Log driver selection.
    pub log_driver: Option<String>,
    /// Service labels.
    pub labels: HashMap<String, String>,
}

impl ServiceConfig {
    /// Create an empty configuration for the given image.
    #[must_use]
    pub fn with_image(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            ..Self::default()
        }
    }

    /// Set the log driver.
    #[must_use]
    pub fn log_driver(mut self, driver: impl Into<String>) -> Self {
        self.log_driver = Some(driver.into());
        self
    }

    /// Add a label.
    #[must_use]
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// A container belonging to a service, as enumerated by the base service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRef {
    /// Runtime container ID.
    pub id: String,
}

impl ContainerRef {
    /// Create a container reference.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Operations the lifecycle layer requires of the underlying service.
///
/// Implementations translate configuration into containers; the lifecycle
/// layer only sequences these calls and adds the behaviour around them.
#[async_trait]
pub trait BaseService: Send + Sync {
    /// Logical service name.
    fn name(&self) -> &ServiceName;

    /// Resolved service configuration.
    fn config(&self) -> &ServiceConfig;

    /// Relationships the base service derives on its own (links, depends_on).
    fn dependent_services(&self) -> Vec<Relationship>;

    /// Containers currently associated with the service, in runtime order.
    async fn containers(&self) -> BosunResult<Vec<ContainerRef>>;

    /// Create the service's container without running it.
    async fn create(&self) -> BosunResult<()>;

    /// Start the service's container.
    async fn up(&self) -> BosunResult<()>;
}
