//! Typed service policy derived from configuration labels.
//!
//! Labels are plain strings; this module is the only place they are compared
//! against their literal values. Everything downstream reads [`ServicePolicy`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::base::ServiceConfig;

/// Recognized label keys and values.
pub mod labels {
    /// Service scope. Anything other than [`SYSTEM`] is a user service.
    pub const SCOPE: &str = "bosun.scope";
    /// Scope value for system services.
    pub const SYSTEM: &str = "system";
    /// `"true"` creates the container but never starts it.
    pub const CREATE_ONLY: &str = "bosun.create-only";
    /// `"false"` waits for the container to exit after starting it.
    pub const DETACH: &str = "bosun.detach";
    /// `"true"` requests a deployment restart once the service is up.
    pub const RELOAD_CONFIG: &str = "bosun.reload-config";
}

/// Log driver that routes container output to the syslog service.
pub const SYSLOG_DRIVER: &str = "syslog";

/// Service scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Part of the base system.
    System,
    /// Started on behalf of the user; re-run whenever cloud-init reconfigures.
    User,
}

/// Whether `up` returns once the container starts or once it exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detach {
    /// Return as soon as the container is started.
    Background,
    /// Block until the container exits and check its exit code.
    Foreground,
}

/// Lifecycle policy of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePolicy {
    /// Service scope.
    pub scope: Scope,
    /// Create the container without starting it.
    pub create_only: bool,
    /// Detach mode after start.
    pub detach: Detach,
    /// Signal a deployment restart after a successful activation.
    pub reload_config: bool,
    /// Container output goes to the syslog service.
    pub log_to_syslog: bool,
}

impl Default for ServicePolicy {
    fn default() -> Self {
        Self {
            scope: Scope::User,
            create_only: false,
            detach: Detach::Background,
            reload_config: false,
            log_to_syslog: false,
        }
    }
}

impl ServicePolicy {
    /// Derive the policy from a service configuration.
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            log_to_syslog: config.log_driver.as_deref() == Some(SYSLOG_DRIVER),
            ..Self::from_labels(&config.labels)
        }
    }

    /// Derive the label-driven part of the policy.
    ///
    /// Keys and values are matched case-sensitively; unrecognized values fall
    /// back to the default for that flag.
    fn from_labels(labels: &HashMap<String, String>) -> Self {
        let value = |key: &str| labels.get(key).map(String::as_str);

        let scope = if value(labels::SCOPE) == Some(labels::SYSTEM) {
            Scope::System
        } else {
            Scope::User
        };

        let detach = if value(labels::DETACH) == Some("false") {
            Detach::Foreground
        } else {
            Detach::Background
        };

        Self {
            scope,
            create_only: value(labels::CREATE_ONLY) == Some("true"),
            detach,
            reload_config: value(labels::RELOAD_CONFIG) == Some("true"),
            log_to_syslog: false,
        }
    }

    /// Returns true for user-scoped services.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.scope == Scope::User
    }
}
