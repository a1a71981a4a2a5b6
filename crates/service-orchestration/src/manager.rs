//! Service manager: the orchestration engine
//!
//! The [`ServiceManager`] owns the name→entity map for the process lifetime
//! and drives every topology mutation as a full teardown/recreate cycle.
//! Container links are fixed at creation time, so any dependency-graph change
//! can invalidate existing links transitively; stopping everything in reverse
//! order and recreating in forward order is the only sequencing that
//! guarantees a consistently-linked topology.

use crate::{
    DependencyGraph, Error, Registry, Result,
    service::ServiceEntity,
};
use command_runner::ProcessRunner;
use indexmap::IndexMap;
use service_config::unit;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Central orchestrator over the installed service set
pub struct ServiceManager {
    registry: Registry,
    unit_dir: PathBuf,
    runner: Arc<dyn ProcessRunner>,
    services: IndexMap<String, ServiceEntity>,
}

/// A point-in-time summary of one service, probed from the runtime
#[derive(Debug, Clone)]
pub struct ServiceStatus {
    /// Service name
    pub name: String,
    /// Image reference
    pub tag: String,
    /// Published ports
    pub ports: Vec<u16>,
    /// Names this service depends on, per the current graph
    pub dependencies: Vec<String>,
    /// Whether the image is present
    pub image_built: bool,
    /// Whether the container exists (running or stopped)
    pub container_created: bool,
    /// Whether the container is running
    pub running: bool,
}

impl ServiceManager {
    /// Open a manager over the given registry, rebuilding the in-memory
    /// service set from the registry's entries.
    pub fn open(
        registry: Registry,
        unit_dir: impl Into<PathBuf>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Result<Self> {
        let mut services = IndexMap::new();
        for (link_name, directory) in registry.entries()? {
            let declaration = service_config::load(&directory)?;
            let entity = ServiceEntity::new(directory, declaration, runner.clone());
            if entity.name() != link_name {
                warn!(
                    link = %link_name,
                    declared = %entity.name(),
                    "registry link name differs from declared service name"
                );
            }
            services.insert(entity.name().to_string(), entity);
        }

        info!(count = services.len(), root = %registry.root().display(), "loaded service set");

        Ok(Self {
            registry,
            unit_dir: unit_dir.into(),
            runner,
            services,
        })
    }

    /// The registry this manager records installs in
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Installed service names, sorted
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.services.keys().cloned().collect();
        names.sort();
        names
    }

    /// Look up an installed service
    pub fn get(&self, name: &str) -> Result<&ServiceEntity> {
        self.services
            .get(name)
            .ok_or_else(|| Error::UnknownService(name.to_string()))
    }

    /// Install the service declared at `path` and converge the fleet.
    ///
    /// Validates the new graph before touching anything durable; on
    /// validation failure the registry and running containers are untouched.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let directory = std::fs::canonicalize(path.into())?;
        let declaration = service_config::load(&directory)?;
        let entity = ServiceEntity::new(directory.clone(), declaration, self.runner.clone());
        let name = entity.name().to_string();

        if self.services.contains_key(&name) {
            return Err(Error::DuplicateService(name));
        }

        info!(service = %name, "adding service");

        let deps_before = DependencyGraph::compute(&self.services)?;

        self.services.insert(name.clone(), entity);
        let deps_after = match DependencyGraph::compute(&self.services) {
            Ok(graph) => graph,
            Err(e) => {
                // Discard the insertion; nothing durable has happened yet.
                self.services.shift_remove(&name);
                return Err(e);
            }
        };

        self.registry.add(&name, &directory)?;
        self.services[&name].build()?;

        self.teardown_in_reverse(&deps_before.order)?;
        self.recreate_in_order(&deps_after)
    }

    /// Uninstall the named service and converge the survivors.
    ///
    /// Fails with [`Error::MissingDependency`] when some other service still
    /// requires it, leaving the registry and containers untouched.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if !self.services.contains_key(name) {
            return Err(Error::UnknownService(name.to_string()));
        }

        info!(service = %name, "removing service");

        let deps_before = DependencyGraph::compute(&self.services)?;

        // Validate the remaining graph on a copy first, so a rejected
        // removal leaves the in-memory set (and its order) intact.
        let mut remaining = self.services.clone();
        let entity = remaining.shift_remove(name).expect("presence checked");
        let deps_after = DependencyGraph::compute(&remaining)?;
        self.services = remaining;

        for stopping in deps_before.order.iter().rev() {
            if stopping == name {
                entity.teardown()?;
            } else {
                self.services[stopping].teardown()?;
            }
        }

        self.registry.remove(name)?;
        entity.remove_image()?;

        self.recreate_in_order(&deps_after)?;

        let unit_path = self.unit_dir.join(unit::unit_file_name(name));
        if let Err(e) = std::fs::remove_file(&unit_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Tear down and recreate every service, picking up declaration edits
    /// without changing the topology.
    pub fn rebuild(&mut self) -> Result<()> {
        info!("rebuilding all services");

        let deps = DependencyGraph::compute(&self.services)?;
        self.teardown_in_reverse(&deps.order)?;
        self.recreate_in_order(&deps)
    }

    /// Start a service (and, transitively, whatever its own state machine
    /// needs: build and create when image or container are missing)
    pub fn start(&self, name: &str, no_daemon: bool) -> Result<()> {
        let deps = DependencyGraph::compute(&self.services)?;
        let dependencies = dependencies_of(&deps, name);
        self.get(name)?.start(&dependencies, no_daemon)
    }

    /// Stop a service; a no-op when already stopped
    pub fn stop(&self, name: &str) -> Result<()> {
        self.get(name)?.stop()
    }

    /// Stop, then start a service detached
    pub fn restart(&self, name: &str) -> Result<()> {
        let deps = DependencyGraph::compute(&self.services)?;
        let dependencies = dependencies_of(&deps, name);
        self.get(name)?.restart(&dependencies)
    }

    /// Every installed service with its probed running state, sorted by name
    pub fn list(&self) -> Result<Vec<(String, bool)>> {
        let mut listed = Vec::with_capacity(self.services.len());
        for name in self.service_names() {
            listed.push((name.clone(), self.services[&name].is_running()?));
        }
        Ok(listed)
    }

    /// Probe one service's declaration and runtime state
    pub fn status(&self, name: &str) -> Result<ServiceStatus> {
        let entity = self.get(name)?;
        let deps = DependencyGraph::compute(&self.services)?;

        Ok(ServiceStatus {
            name: entity.name().to_string(),
            tag: entity.tag().to_string(),
            ports: entity.declaration().ports.clone(),
            dependencies: dependencies_of(&deps, name),
            image_built: entity.image_exists()?,
            container_created: entity.container_exists()?,
            running: entity.is_running()?,
        })
    }

    /// Stop and delete containers, dependents before dependencies
    fn teardown_in_reverse(&self, order: &[String]) -> Result<()> {
        for name in order.iter().rev() {
            self.services[name].teardown()?;
        }
        Ok(())
    }

    /// Create containers and rewrite units, dependencies before dependents
    fn recreate_in_order(&self, deps: &DependencyGraph) -> Result<()> {
        for name in &deps.order {
            let dependencies = dependencies_of(deps, name);
            self.services[name].create(&dependencies)?;
            self.write_unit(name, &dependencies)?;
        }
        Ok(())
    }

    /// Render and persist the systemd unit for one service
    fn write_unit(&self, name: &str, dependencies: &[String]) -> Result<()> {
        let path = self.unit_dir.join(unit::unit_file_name(name));
        info!(service = %name, unit = %path.display(), "writing unit file");
        std::fs::write(path, unit::render_unit(name, dependencies))?;
        Ok(())
    }
}

/// The resolved dependency names of one service, per the computed graph
fn dependencies_of(deps: &DependencyGraph, name: &str) -> Vec<String> {
    deps.edges.get(name).cloned().unwrap_or_default()
}
