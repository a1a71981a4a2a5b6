//! Service entity and its lifecycle state machine
//!
//! A service walks `NoImage → ImageBuilt → ContainerCreated → Running` via
//! `build`/`create`/`start`, and back down via `stop`/`remove`. State is
//! never stored: every transition re-derives the current state by querying
//! docker, so the runtime stays the single source of truth.

use crate::{Error, Result, configs::resolve_configs};
use command_runner::{Command, ExitResult, OutputMode, ProcessRunner};
use service_config::ServiceDeclaration;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// One declared service: its directory, declaration, and lifecycle operations
#[derive(Clone)]
pub struct ServiceEntity {
    directory: PathBuf,
    declaration: ServiceDeclaration,
    name: String,
    runner: Arc<dyn ProcessRunner>,
}

impl std::fmt::Debug for ServiceEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEntity")
            .field("name", &self.name)
            .field("tag", &self.declaration.tag)
            .field("directory", &self.directory)
            .finish()
    }
}

impl ServiceEntity {
    /// Create an entity from a loaded declaration
    pub fn new(
        directory: PathBuf,
        declaration: ServiceDeclaration,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        let name = declaration.service_name().to_string();
        Self {
            directory,
            declaration,
            name,
            runner,
        }
    }

    /// The service's unique name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The container image reference
    pub fn tag(&self) -> &str {
        &self.declaration.tag
    }

    /// The service's declaration directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The parsed declaration
    pub fn declaration(&self) -> &ServiceDeclaration {
        &self.declaration
    }

    // --- state probes ---------------------------------------------------

    /// True if an image matching `tag` is present
    pub fn image_exists(&self) -> Result<bool> {
        let mut cmd = Command::new("docker");
        cmd.args(["images", "-q", self.tag()]);
        let result = self.run_checked(&cmd, OutputMode::Capture, "images")?;
        Ok(!result.stdout.trim().is_empty())
    }

    /// True if a container (running or stopped) named after this service exists
    pub fn container_exists(&self) -> Result<bool> {
        self.named_container_listed(true)
    }

    /// True if a container named after this service is currently running
    pub fn is_running(&self) -> Result<bool> {
        self.named_container_listed(false)
    }

    fn named_container_listed(&self, include_stopped: bool) -> Result<bool> {
        let mut cmd = Command::new("docker");
        cmd.arg("ps");
        if include_stopped {
            cmd.arg("-a");
        }
        cmd.args(["--filter", &format!("name={}", self.name)]);
        cmd.args(["--format", "{{.Names}}"]);

        let result = self.run_checked(&cmd, OutputMode::Capture, "ps")?;
        // The name filter matches substrings; compare lines exactly.
        Ok(result.stdout.lines().any(|line| line.trim() == self.name))
    }

    // --- mutating operations --------------------------------------------

    /// Build the image from the service's Dockerfile, or pull `tag` when
    /// there is no build recipe.
    ///
    /// Builds never reuse the cache, so declaration edits are reliably
    /// picked up.
    pub fn build(&self) -> Result<()> {
        let mut cmd = Command::new("docker");
        if self.directory.join("Dockerfile").is_file() {
            info!(service = %self.name, tag = %self.tag(), "building image");
            cmd.args(["build", "--no-cache", "-t", self.tag()]);
            cmd.arg(&self.directory);
        } else {
            info!(service = %self.name, tag = %self.tag(), "pulling image");
            cmd.args(["pull", self.tag()]);
        }

        let result = self.runner.run(&cmd, OutputMode::Stream)?;
        if !result.success() {
            return Err(Error::BuildFailed {
                service: self.name.clone(),
                stderr: result.stderr,
            });
        }
        Ok(())
    }

    /// Create the container, wiring up mounts, resolved config paths, links
    /// to the given dependencies, and published ports.
    pub fn create(&self, dependencies: &[String]) -> Result<()> {
        info!(service = %self.name, "creating container");

        let mut cmd = Command::new("docker");
        cmd.args(["create", "--name", &self.name]);

        for (local, container) in &self.declaration.mounts {
            let host = self.directory.join("mounts").join(local);
            cmd.args(["-v", &format!("{}:{}", host.display(), container)]);
        }

        // The container's clock and timezone follow the host.
        cmd.args(["-v", "/etc/localtime:/etc/localtime:ro"]);
        cmd.args(["-v", "/etc/timezone:/etc/timezone:ro"]);

        for config in resolve_configs(&self.name, &self.directory, &self.declaration.configs)? {
            let host = format!("{}/config{}", self.directory.display(), config);
            cmd.args(["-v", &format!("{}:{}", host, config)]);
        }

        for dep in dependencies {
            cmd.args(["--link", &format!("{}:{}", dep, dep)]);
        }

        for port in &self.declaration.ports {
            cmd.args(["-p", &format!("{}:{}", port, port)]);
        }

        cmd.arg(self.tag());

        let result = self.runner.run(&cmd, OutputMode::Stream)?;
        if !result.success() {
            return Err(Error::CreateFailed {
                service: self.name.clone(),
                stderr: result.stderr,
            });
        }
        Ok(())
    }

    /// Start the service, driving it all the way from whatever state it is
    /// in: builds and creates first when image or container are missing.
    ///
    /// No-op when already running. `no_daemon` attaches to the container
    /// instead of starting it detached.
    pub fn start(&self, dependencies: &[String], no_daemon: bool) -> Result<()> {
        if self.is_running()? {
            debug!(service = %self.name, "already running");
            return Ok(());
        }

        if !self.container_exists()? {
            if !self.image_exists()? {
                self.build()?;
            }
            self.create(dependencies)?;
        }

        info!(service = %self.name, attached = no_daemon, "starting container");
        let mut cmd = Command::new("docker");
        cmd.arg("start");
        if no_daemon {
            cmd.arg("-a");
        }
        cmd.arg(&self.name);

        let mode = if no_daemon {
            OutputMode::Stream
        } else {
            OutputMode::Capture
        };
        self.run_checked(&cmd, mode, "start")?;
        Ok(())
    }

    /// Stop the container; a no-op (not an error) when already stopped
    pub fn stop(&self) -> Result<()> {
        if !self.is_running()? {
            debug!(service = %self.name, "already stopped");
            return Ok(());
        }

        info!(service = %self.name, "stopping container");
        let mut cmd = Command::new("docker");
        cmd.args(["stop", &self.name]);
        self.run_checked(&cmd, OutputMode::Capture, "stop")?;
        Ok(())
    }

    /// Stop, then start detached
    pub fn restart(&self, dependencies: &[String]) -> Result<()> {
        self.stop()?;
        self.start(dependencies, false)
    }

    /// Stop the container and delete it, leaving the image in place
    pub fn teardown(&self) -> Result<()> {
        self.stop()?;
        self.remove_container()
    }

    /// Delete the container when one exists
    pub fn remove_container(&self) -> Result<()> {
        if !self.container_exists()? {
            return Ok(());
        }

        debug!(service = %self.name, "removing container");
        let mut cmd = Command::new("docker");
        cmd.args(["rm", &self.name]);
        self.run_checked(&cmd, OutputMode::Capture, "rm")?;
        Ok(())
    }

    /// Delete the image when one exists
    pub fn remove_image(&self) -> Result<()> {
        if !self.image_exists()? {
            return Ok(());
        }

        debug!(service = %self.name, tag = %self.tag(), "removing image");
        let mut cmd = Command::new("docker");
        cmd.args(["rmi", self.tag()]);
        self.run_checked(&cmd, OutputMode::Capture, "rmi")?;
        Ok(())
    }

    /// Fully decommission: stop, delete the container, delete the image
    pub fn remove(&self) -> Result<()> {
        self.teardown()?;
        self.remove_image()
    }

    fn run_checked(&self, cmd: &Command, mode: OutputMode, action: &str) -> Result<ExitResult> {
        let result = self.runner.run(cmd, mode)?;
        if !result.success() {
            return Err(Error::RuntimeCommand {
                service: self.name.clone(),
                action: action.to_string(),
                stderr: result.stderr,
            });
        }
        Ok(result)
    }
}
