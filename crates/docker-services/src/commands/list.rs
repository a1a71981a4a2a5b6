use anyhow::Result;
use comfy_table::Table;
use std::path::Path;

pub fn run(root: &Path, unit_dir: &Path) -> Result<()> {
    let manager = super::open_manager(root, unit_dir)?;

    let listed = manager.list()?;
    if listed.is_empty() {
        println!("No services installed.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Service", "State"]);
    for (name, running) in listed {
        table.add_row(vec![
            name,
            if running { "running" } else { "stopped" }.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
