use anyhow::{Context, Result};
use std::path::Path;

pub fn run(root: &Path, unit_dir: &Path, service: &str, no_daemon: bool) -> Result<()> {
    let manager = super::open_manager(root, unit_dir)?;

    manager
        .start(service, no_daemon)
        .with_context(|| format!("failed to start service '{}'", service))?;

    if !no_daemon {
        println!("Started service '{}'", service);
    }
    Ok(())
}
