//! Deployment-wide configuration consumed by the lifecycle layer.

use std::collections::HashMap;
use std::time::Duration;

use bosun_common::{BosunError, BosunResult, ServiceName};
use serde::{Deserialize, Serialize};

/// Explicitly declared dependencies, keyed by service name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyIndex(HashMap<ServiceName, Vec<ServiceName>>);

impl DependencyIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an index from a JSON object of `name -> [dependency, ...]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or contains invalid names.
    pub fn from_json(json: &str) -> BosunResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Declare the dependencies of a service, replacing any previous entry.
    pub fn insert(&mut self, service: ServiceName, dependencies: Vec<ServiceName>) {
        self.0.insert(service, dependencies);
    }

    /// Dependencies declared for a service, in declaration order.
    #[must_use]
    pub fn dependencies_of(&self, service: &ServiceName) -> &[ServiceName] {
        self.0.get(service).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of services with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no service has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ServiceName, Vec<ServiceName>)> for DependencyIndex {
    fn from_iter<I: IntoIterator<Item = (ServiceName, Vec<ServiceName>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Options applied to every service built by a factory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleOptions {
    /// Give up waiting for a foreground container after this many milliseconds.
    ///
    /// Unset means wait until the container exits or the caller cancels.
    pub wait_timeout_ms: Option<u64>,
}

impl LifecycleOptions {
    /// Set the foreground wait deadline.
    ///
    /// # Errors
    ///
    /// Returns [`BosunError::Config`] if the deadline rounds down to zero
    /// milliseconds or does not fit in a `u64` of milliseconds.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> BosunResult<Self> {
        let millis = u64::try_from(timeout.as_millis()).map_err(|_| BosunError::Config {
            message: format!("wait timeout {timeout:?} is too large"),
        })?;
        self.wait_timeout_ms = Some(millis);
        self.validate()?;
        Ok(self)
    }

    /// Check the options before they are handed to services.
    ///
    /// # Errors
    ///
    /// Returns [`BosunError::Config`] for a zero wait deadline.
    pub fn validate(&self) -> BosunResult<()> {
        if self.wait_timeout_ms == Some(0) {
            return Err(BosunError::Config {
                message: "wait timeout must be at least 1ms".to_string(),
            });
        }
        Ok(())
    }
}
