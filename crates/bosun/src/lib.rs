//! # bosun
//!
//! Lifecycle orchestration for container services.
//!
//! bosun wraps a base service (which already knows how to turn declarative
//! configuration into containers) and adds:
//! - Dependency inference: explicit dependencies plus implicit links to
//!   `syslog`, `cloud-init` and `network` derived from configuration
//! - Container naming: stale containers are renamed to their service name
//! - Lifecycle sequencing: create, start, optional wait for completion
//! - A restart signal for services whose activation reloads the deployment

#![warn(missing_docs)]

pub mod base;
pub mod config;
pub mod deployment;
pub mod factory;
pub mod identity;
pub mod lifecycle;
pub mod policy;
pub mod relationship;
pub mod runtime;
pub mod service;
pub mod wait;

pub use base::{BaseService, ContainerRef, ServiceConfig};
pub use config::{DependencyIndex, LifecycleOptions};
pub use deployment::{Deployment, DeploymentOutcome, ServiceStatus};
pub use factory::ServiceFactory;
pub use identity::Reconciliation;
pub use lifecycle::Activation;
pub use policy::{Detach, Scope, ServicePolicy};
pub use relationship::{Relationship, RelationshipKind};
pub use runtime::{ClientFactory, ContainerInfo, ExitReceiver, ImageInfo, Lookup, RuntimeClient};
pub use service::LifecycleService;

pub use bosun_common::{BosunError, BosunResult, ContainerName, ServiceName};
pub use tokio_util::sync::CancellationToken;
