use anyhow::{Context, Result};
use std::path::Path;

pub fn run(root: &Path, unit_dir: &Path, service: &str) -> Result<()> {
    let manager = super::open_manager(root, unit_dir)?;

    manager
        .restart(service)
        .with_context(|| format!("failed to restart service '{}'", service))?;

    println!("Restarted service '{}'", service);
    Ok(())
}
