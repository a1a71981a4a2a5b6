//! CLI command implementations

pub mod add;
pub mod list;
pub mod rebuild;
pub mod remove;
pub mod restart;
pub mod start;
pub mod status;
pub mod stop;

use anyhow::{Context, Result};
use command_runner::LocalRunner;
use service_orchestration::{Registry, ServiceManager};
use std::path::Path;
use std::sync::Arc;

/// Open the service manager over the configured registry
pub(crate) fn open_manager(root: &Path, unit_dir: &Path) -> Result<ServiceManager> {
    let registry = Registry::open(root)
        .with_context(|| format!("failed to open registry at {}", root.display()))?;
    ServiceManager::open(registry, unit_dir, Arc::new(LocalRunner::new()))
        .context("failed to load installed services")
}
