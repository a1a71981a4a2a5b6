use anyhow::Result;
use comfy_table::Table;
use std::path::Path;

pub fn run(root: &Path, unit_dir: &Path, service: &str) -> Result<()> {
    let manager = super::open_manager(root, unit_dir)?;
    let status = manager.status(service)?;

    let state = if status.running {
        "running"
    } else if status.container_created {
        "created (stopped)"
    } else if status.image_built {
        "image built"
    } else {
        "not built"
    };

    let ports = status
        .ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let mut table = Table::new();
    table.add_row(vec!["Service", status.name.as_str()]);
    table.add_row(vec!["Image", status.tag.as_str()]);
    table.add_row(vec!["State", state]);
    table.add_row(vec!["Ports", ports.as_str()]);
    let dependencies = status.dependencies.join(", ");
    table.add_row(vec!["Dependencies", dependencies.as_str()]);
    println!("{table}");
    Ok(())
}
