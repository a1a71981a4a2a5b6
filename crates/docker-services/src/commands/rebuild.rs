use anyhow::{Context, Result};
use std::path::Path;

pub fn run(root: &Path, unit_dir: &Path) -> Result<()> {
    let mut manager = super::open_manager(root, unit_dir)?;

    let names = manager.service_names();
    println!("Rebuilding {} services...", names.len());

    manager.rebuild().context("rebuild failed")?;

    println!("Recreated: {}", names.join(", "));
    Ok(())
}
