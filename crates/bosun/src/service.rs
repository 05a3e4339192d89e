//! The lifecycle-managed service.

use std::fmt;
use std::sync::Arc;

use bosun_common::ServiceName;

use crate::base::{BaseService, ServiceConfig};
use crate::config::{DependencyIndex, LifecycleOptions};
use crate::policy::ServicePolicy;
use crate::runtime::{ClientFactory, RuntimeClient};

/// A base service wrapped with dependency inference and lifecycle sequencing.
///
/// The operations live next to the component they belong to:
/// [`dependent_services`](Self::dependent_services) in `relationship`,
/// [`reconcile`](Self::reconcile) in `identity`,
/// [`create`](Self::create) and [`up`](Self::up) in `lifecycle`,
/// and [`wait`](Self::wait) in `wait`.
pub struct LifecycleService {
    base: Box<dyn BaseService>,
    clients: Arc<dyn ClientFactory>,
    deps: Arc<DependencyIndex>,
    policy: ServicePolicy,
    options: LifecycleOptions,
}

impl LifecycleService {
    /// Wrap a base service.
    ///
    /// The policy is read from the base configuration once, here.
    #[must_use]
    pub fn new(
        base: Box<dyn BaseService>,
        clients: Arc<dyn ClientFactory>,
        deps: Arc<DependencyIndex>,
        options: LifecycleOptions,
    ) -> Self {
        let policy = ServicePolicy::from_config(base.config());
        Self {
            base,
            clients,
            deps,
            policy,
            options,
        }
    }

    /// Logical service name.
    #[must_use]
    pub fn name(&self) -> &ServiceName {
        self.base.name()
    }

    /// Resolved configuration of the base service.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        self.base.config()
    }

    /// Lifecycle policy.
    #[must_use]
    pub const fn policy(&self) -> &ServicePolicy {
        &self.policy
    }

    /// Lifecycle options.
    #[must_use]
    pub const fn options(&self) -> &LifecycleOptions {
        &self.options
    }

    /// Explicit dependencies declared for this service.
    #[must_use]
    pub fn dependencies(&self) -> &[ServiceName] {
        self.deps.dependencies_of(self.name())
    }

    pub(crate) fn base(&self) -> &dyn BaseService {
        self.base.as_ref()
    }

    pub(crate) fn client(&self) -> Arc<dyn RuntimeClient> {
        self.clients.create(self.name())
    }
}

impl fmt::Debug for LifecycleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleService")
            .field("name", self.name())
            .field("policy", &self.policy)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
