//! # Orchestration
//!
//! Core orchestration logic for a set of declaratively-described docker
//! services on a single host: dependency-graph resolution, the idempotent
//! service lifecycle state machine, configuration-mount resolution, and the
//! [`ServiceManager`] that sequences topology mutations.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use command_runner::LocalRunner;
//! use service_orchestration::{Registry, ServiceManager};
//!
//! # fn example() -> service_orchestration::Result<()> {
//! let registry = Registry::open("/etc/docker-services")?;
//! let mut manager =
//!     ServiceManager::open(registry, "/etc/systemd/system", Arc::new(LocalRunner::new()))?;
//!
//! manager.rebuild()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]

mod configs;
mod graph;
mod manager;
mod registry;
mod service;

pub use configs::resolve_configs;
pub use graph::DependencyGraph;
pub use manager::{ServiceManager, ServiceStatus};
pub use registry::Registry;
pub use service::ServiceEntity;

/// Error types for orchestration operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Declaration store errors
    #[error(transparent)]
    Declaration(#[from] service_config::DeclarationError),

    /// Command runner errors (spawn-level failures)
    #[error(transparent)]
    Runner(#[from] command_runner::Error),

    /// A service by this name is already installed
    #[error("service '{0}' already exists")]
    DuplicateService(String),

    /// No installed service has this name
    #[error("no service named '{0}'")]
    UnknownService(String),

    /// A required dependency or dependent names a service that is not installed
    #[error("missing dependency '{name}' for '{wanted_by}'")]
    MissingDependency {
        /// The name that could not be resolved
        name: String,
        /// The service whose declaration names it
        wanted_by: String,
    },

    /// The dependency graph has no linearization
    #[error("dependency cycle detected")]
    DependencyCycle,

    /// A declared config folder is absent on disk
    #[error("config folder '{path}' for service '{service}' does not exist")]
    ConfigNotFound {
        /// The service whose declaration names the folder
        service: String,
        /// The missing folder, relative to the service's config directory
        path: String,
    },

    /// `docker build`/`docker pull` exited non-zero
    #[error("failed to build image for '{service}':\n{stderr}")]
    BuildFailed {
        /// The service being built
        service: String,
        /// Captured stderr of the failed command
        stderr: String,
    },

    /// `docker create` exited non-zero
    #[error("failed to create container for '{service}':\n{stderr}")]
    CreateFailed {
        /// The service being created
        service: String,
        /// Captured stderr of the failed command
        stderr: String,
    },

    /// Any other runtime command exited non-zero
    #[error("docker {action} failed for '{service}':\n{stderr}")]
    RuntimeCommand {
        /// The service the command acted on
        service: String,
        /// The docker action that failed
        action: String,
        /// Captured stderr of the failed command
        stderr: String,
    },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for orchestration operations
pub type Result<T> = std::result::Result<T, Error>;
