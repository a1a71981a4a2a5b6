use anyhow::{Context, Result};
use std::path::Path;

pub fn run(root: &Path, unit_dir: &Path, service: &str) -> Result<()> {
    let mut manager = super::open_manager(root, unit_dir)?;

    manager
        .remove(service)
        .with_context(|| format!("failed to remove service '{}'", service))?;

    println!("Removed service '{}'", service);
    Ok(())
}
