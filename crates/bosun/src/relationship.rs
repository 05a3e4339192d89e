//! Service relationships and dependency inference.

use bosun_common::ServiceName;
use serde::{Deserialize, Serialize};

use crate::runtime::Lookup;
use crate::service::LifecycleService;

/// Service every `syslog`-logging service links to.
pub const SYSLOG: &str = "syslog";
/// Service every user-scoped service links to.
pub const CLOUD_INIT: &str = "cloud-init";
/// Service that must be up before a missing image can be pulled.
pub const NETWORK: &str = "network";

/// Kind of a relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    /// Link: the target must be up before the source starts.
    Link,
}

/// A dependency edge from a service to the service it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    /// The service depended upon.
    pub target: ServiceName,
    /// Edge kind.
    pub kind: RelationshipKind,
    /// Optional edges are dropped when the target is not part of the deployment.
    pub optional: bool,
}

impl Relationship {
    /// A required link.
    #[must_use]
    pub const fn link(target: ServiceName) -> Self {
        Self {
            target,
            kind: RelationshipKind::Link,
            optional: false,
        }
    }

    /// An optional link.
    #[must_use]
    pub const fn optional_link(target: ServiceName) -> Self {
        Self {
            target,
            kind: RelationshipKind::Link,
            optional: true,
        }
    }
}

impl LifecycleService {
    /// Every relationship that must be honoured before this service starts.
    ///
    /// Base relationships come first, then the explicit dependencies from the
    /// deployment index (required), then the implicit optional links:
    /// `syslog` for syslog logging, and either `cloud-init` for user services
    /// or `network` for system services whose image is not available locally.
    pub async fn dependent_services(&self) -> Vec<Relationship> {
        let mut rels = self.base().dependent_services();

        rels.extend(
            self.dependencies()
                .iter()
                .cloned()
                .map(Relationship::link),
        );

        if self.policy().log_to_syslog {
            rels.push(Relationship::optional_link(ServiceName::new_unchecked(SYSLOG)));
        }

        if self.policy().is_user() {
            // Linking to cloud-init re-runs user services whenever it reconfigures.
            rels.push(Relationship::optional_link(ServiceName::new_unchecked(
                CLOUD_INIT,
            )));
        } else if self.missing_image().await {
            rels.push(Relationship::optional_link(ServiceName::new_unchecked(
                NETWORK,
            )));
        }

        tracing::debug!(service = %self.name(), relationships = ?rels, "Resolved relationships");
        rels
    }

    /// Whether the configured image has to be fetched before the service can run.
    ///
    /// An inspection failure counts as missing; the resulting link is optional
    /// so the worst case is an unnecessary ordering constraint.
    async fn missing_image(&self) -> bool {
        let Some(image) = self.config().image.as_deref().filter(|i| !i.is_empty()) else {
            return false;
        };

        match self.client().inspect_image(image).await {
            Ok(Lookup::Present(_)) => false,
            Ok(Lookup::Absent) => {
                tracing::debug!(service = %self.name(), image, "Image not present locally");
                true
            }
            Err(e) => {
                tracing::warn!(service = %self.name(), image, error = %e, "Image inspection failed, treating image as missing");
                true
            }
        }
    }
}
