//! Bringing a set of services up in dependency order.

use std::collections::{BTreeMap, BTreeSet};

use bosun_common::{BosunError, BosunResult, ServiceName};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::lifecycle::Activation;
use crate::policy::Detach;
use crate::service::LifecycleService;

/// Progress of a service within a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Not acted on yet.
    Pending,
    /// Container created, not started.
    Created,
    /// Container started.
    Running,
    /// Foreground container exited successfully.
    Completed,
    /// A lifecycle step failed.
    Failed,
}

/// Result of bringing a deployment up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentOutcome {
    /// Every service is up.
    Ready,
    /// Every service is up, and these services asked for a restart.
    RestartRequested {
        /// Services whose activation requested the restart, in start order.
        services: Vec<ServiceName>,
    },
}

/// A set of lifecycle services started together.
#[derive(Debug, Default)]
pub struct Deployment {
    services: BTreeMap<ServiceName, LifecycleService>,
    statuses: DashMap<ServiceName, ServiceStatus>,
}

impl Deployment {
    /// Create an empty deployment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service, replacing any service with the same name.
    pub fn add(&mut self, service: LifecycleService) {
        let name = service.name().clone();
        self.statuses.insert(name.clone(), ServiceStatus::Pending);
        self.services.insert(name, service);
    }

    /// Number of services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if the deployment has no services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Status of every service, sorted by name.
    #[must_use]
    pub fn statuses(&self) -> Vec<(ServiceName, ServiceStatus)> {
        let mut statuses: Vec<_> = self
            .statuses
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        statuses.sort_by(|a, b| a.0.cmp(&b.0));
        statuses
    }

    /// Status of one service.
    #[must_use]
    pub fn status(&self, name: &ServiceName) -> Option<ServiceStatus> {
        self.statuses.get(name).map(|s| *s)
    }

    /// Create every service's container in dependency order.
    ///
    /// # Errors
    ///
    /// Fails on ordering errors or the first failing service.
    pub async fn create(&self) -> BosunResult<()> {
        for name in self.start_order().await? {
            let service = &self.services[&name];
            if let Err(e) = service.create().await {
                self.set_status(&name, ServiceStatus::Failed);
                return Err(e);
            }
            self.set_status(&name, ServiceStatus::Created);
        }
        Ok(())
    }

    /// Bring every service up in dependency order.
    ///
    /// Restart requests are collected and reported once every service is up.
    ///
    /// # Errors
    ///
    /// Fails on ordering errors or the first failing service.
    pub async fn up(&self, cancel: &CancellationToken) -> BosunResult<DeploymentOutcome> {
        tracing::info!(services = self.services.len(), "Starting deployment");

        let order = self.start_order().await?;
        tracing::debug!(?order, "Resolved start order");

        let mut restart = Vec::new();
        for name in order {
            let service = &self.services[&name];
            let activation = match service.up(cancel).await {
                Ok(activation) => activation,
                Err(e) => {
                    tracing::error!(service = %name, error = %e, "Service failed");
                    self.set_status(&name, ServiceStatus::Failed);
                    return Err(e);
                }
            };

            let policy = service.policy();
            let status = if policy.create_only {
                ServiceStatus::Created
            } else if policy.detach == Detach::Foreground {
                ServiceStatus::Completed
            } else {
                ServiceStatus::Running
            };
            self.set_status(&name, status);

            if activation == Activation::RestartRequested {
                restart.push(name);
            }
        }

        if restart.is_empty() {
            Ok(DeploymentOutcome::Ready)
        } else {
            tracing::info!(?restart, "Deployment restart requested");
            Ok(DeploymentOutcome::RestartRequested { services: restart })
        }
    }

    /// Resolve the service start order (topological sort).
    ///
    /// Ties are broken alphabetically. Optional links to services outside the
    /// deployment are ignored; required ones are an error.
    ///
    /// # Errors
    ///
    /// [`BosunError::UnknownDependency`] or [`BosunError::DependencyCycle`].
    pub async fn start_order(&self) -> BosunResult<Vec<ServiceName>> {
        let mut dependents: BTreeMap<&ServiceName, BTreeSet<&ServiceName>> = BTreeMap::new();
        let mut in_degree: BTreeMap<&ServiceName, usize> = BTreeMap::new();

        for name in self.services.keys() {
            dependents.insert(name, BTreeSet::new());
            in_degree.insert(name, 0);
        }

        for (name, service) in &self.services {
            let mut targets = BTreeSet::new();
            for rel in service.dependent_services().await {
                match self.services.get_key_value(&rel.target) {
                    Some((target, _)) => {
                        targets.insert(target);
                    }
                    None if rel.optional => {
                        tracing::debug!(service = %name, dependency = %rel.target, "Skipping optional link to absent service");
                    }
                    None => {
                        return Err(BosunError::UnknownDependency {
                            service: name.to_string(),
                            dependency: rel.target.to_string(),
                        });
                    }
                }
            }

            for target in targets {
                if let Some(set) = dependents.get_mut(target) {
                    set.insert(name);
                }
                if let Some(degree) = in_degree.get_mut(name) {
                    *degree += 1;
                }
            }
        }

        // Kahn's algorithm
        let mut ready: BTreeSet<&ServiceName> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut order = Vec::with_capacity(self.services.len());
        while let Some(name) = ready.pop_first() {
            order.push(name.clone());

            for &dependent in &dependents[name] {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() != self.services.len() {
            let stuck: Vec<&str> = in_degree
                .iter()
                .filter(|&(_, &degree)| degree > 0)
                .map(|(name, _)| name.as_str())
                .collect();
            return Err(BosunError::DependencyCycle {
                services: stuck.join(", "),
            });
        }

        Ok(order)
    }

    fn set_status(&self, name: &ServiceName, status: ServiceStatus) {
        self.statuses.insert(name.clone(), status);
    }
}
