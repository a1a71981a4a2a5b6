use anyhow::{Context, Result};
use std::path::Path;

pub fn run(root: &Path, unit_dir: &Path, path: &Path) -> Result<()> {
    let mut manager = super::open_manager(root, unit_dir)?;

    manager
        .add(path)
        .with_context(|| format!("failed to add service from {}", path.display()))?;

    println!("Added service from {}", path.display());
    Ok(())
}
