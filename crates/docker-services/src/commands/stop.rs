use anyhow::{Context, Result};
use std::path::Path;

pub fn run(root: &Path, unit_dir: &Path, service: &str) -> Result<()> {
    let manager = super::open_manager(root, unit_dir)?;

    manager
        .stop(service)
        .with_context(|| format!("failed to stop service '{}'", service))?;

    println!("Stopped service '{}'", service);
    Ok(())
}
