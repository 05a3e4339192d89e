//! Common error types for the Bosun lifecycle layer.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`BosunError`].
pub type BosunResult<T> = Result<T, BosunError>;

/// Errors surfaced by the service lifecycle layer and its collaborators.
#[derive(Error, Diagnostic, Debug)]
pub enum BosunError {
    /// Container not found.
    #[error("Container not found: {id}")]
    #[diagnostic(code(bosun::container::not_found))]
    ContainerNotFound {
        /// The container ID that was not found.
        id: String,
    },

    /// Invalid service name.
    #[error("Invalid service name: {name}")]
    #[diagnostic(
        code(bosun::service::invalid_name),
        help("Service names must start with an alphanumeric character and contain only alphanumerics, '-', '_' and '.', 1-128 characters")
    )]
    InvalidServiceName {
        /// The rejected name.
        name: String,
    },

    /// A base service operation failed.
    #[error("Service {service}: {operation} failed: {message}")]
    #[diagnostic(code(bosun::service::operation))]
    Service {
        /// The service the operation ran for.
        service: String,
        /// The operation that failed (create, start, ...).
        operation: String,
        /// The failure reported by the base service.
        message: String,
    },

    /// A container runtime call failed.
    #[error("Runtime {operation} failed: {message}")]
    #[diagnostic(
        code(bosun::runtime),
        help("Check that the container runtime daemon is reachable")
    )]
    Runtime {
        /// The runtime call that failed (inspect_image, rename_container, ...).
        operation: String,
        /// The failure reported by the runtime.
        message: String,
    },

    /// A container ran to completion with a non-zero exit code.
    #[error("Service {service}: container {container} exited with code {code}")]
    #[diagnostic(code(bosun::container::exit_code))]
    NonZeroExit {
        /// The service the container belongs to.
        service: String,
        /// The container ID.
        container: String,
        /// The exit code reported by the runtime.
        code: i64,
    },

    /// The caller cancelled a wait for container completion.
    #[error("Wait for container {container} was cancelled")]
    #[diagnostic(code(bosun::wait::cancelled))]
    WaitCancelled {
        /// The container that was being waited on.
        container: String,
    },

    /// The wait deadline elapsed before the container exited.
    #[error("Timed out after {timeout_ms}ms waiting for container {container}")]
    #[diagnostic(
        code(bosun::wait::timeout),
        help("Raise wait_timeout_ms or run the service detached")
    )]
    WaitTimeout {
        /// The container that was being waited on.
        container: String,
        /// The deadline that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The runtime dropped the exit notification without sending a status.
    #[error("Exit notification for container {container} closed without a status")]
    #[diagnostic(code(bosun::wait::closed))]
    WaitClosed {
        /// The container that was being waited on.
        container: String,
    },

    /// A required dependency names a service that is not part of the deployment.
    #[error("Service '{service}' depends on unknown service '{dependency}'")]
    #[diagnostic(code(bosun::deployment::unknown_dependency))]
    UnknownDependency {
        /// The depending service.
        service: String,
        /// The missing dependency.
        dependency: String,
    },

    /// The deployment's relationships form a cycle.
    #[error("Circular dependency detected between services: {services}")]
    #[diagnostic(code(bosun::deployment::cycle))]
    DependencyCycle {
        /// The services left unordered, comma separated.
        services: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(bosun::config))]
    Config {
        /// The error message.
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    #[diagnostic(code(bosun::serialization))]
    Serialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(bosun::io))]
    Io(#[from] std::io::Error),
}

impl BosunError {
    /// Build a [`BosunError::Runtime`] from any displayable runtime failure.
    pub fn runtime(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    /// Exit code carried by the error, if the container ran and failed.
    #[must_use]
    pub fn exit_code(&self) -> Option<i64> {
        match self {
            Self::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BosunError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
