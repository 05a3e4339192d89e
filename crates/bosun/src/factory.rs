//! Building lifecycle services for a deployment.

use std::sync::Arc;

use bosun_common::BosunResult;

use crate::base::BaseService;
use crate::config::{DependencyIndex, LifecycleOptions};
use crate::runtime::ClientFactory;
use crate::service::LifecycleService;

/// Wraps base services with the deployment's dependency index and runtime.
#[derive(Clone)]
pub struct ServiceFactory {
    deps: Arc<DependencyIndex>,
    clients: Arc<dyn ClientFactory>,
    options: LifecycleOptions,
}

impl ServiceFactory {
    /// Create a factory.
    pub fn new(deps: DependencyIndex, clients: Arc<dyn ClientFactory>) -> Self {
        Self {
            deps: Arc::new(deps),
            clients,
            options: LifecycleOptions::default(),
        }
    }

    /// Use the given options for every service.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BosunError::Config`] if the options fail validation.
    pub fn with_options(mut self, options: LifecycleOptions) -> BosunResult<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Wrap a base service.
    #[must_use]
    pub fn create(&self, base: Box<dyn BaseService>) -> LifecycleService {
        LifecycleService::new(
            base,
            Arc::clone(&self.clients),
            Arc::clone(&self.deps),
            self.options.clone(),
        )
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("deps", &self.deps)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
