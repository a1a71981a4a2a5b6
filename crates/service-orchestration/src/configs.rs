//! Configuration-mount resolution
//!
//! Turns a service's declared config-folder tree, or the files discovered
//! under its `config/` directory, into the final list of bind-mount paths.
//! Every resolved path is a `/`-prefixed container-absolute path; the host
//! side is always `<service_dir>/config<path>`.

use crate::{Error, Result};
use service_config::ConfigTree;
use std::path::{Path, PathBuf};

/// Resolve the config paths to bind-mount for a service.
///
/// Declared folders are returned in declaration order, and each must exist on
/// disk ([`Error::ConfigNotFound`] otherwise; a missing mount would silently
/// become an empty directory inside the container). Declaring any folder
/// suppresses the file walk entirely, so the two sources never mix: only when
/// nothing is declared is every file under `config/` discovered, in name
/// order.
pub fn resolve_configs(service: &str, service_dir: &Path, tree: &ConfigTree) -> Result<Vec<String>> {
    let config_root = service_dir.join("config");

    let declared = tree.flatten();
    for folder in &declared {
        if !host_path(&config_root, folder).is_dir() {
            return Err(Error::ConfigNotFound {
                service: service.to_string(),
                path: folder.clone(),
            });
        }
    }

    if !declared.is_empty() || !config_root.is_dir() {
        return Ok(declared);
    }

    let mut discovered = Vec::new();
    walk_files(&config_root, "", &mut discovered)?;
    Ok(discovered)
}

/// The on-disk location of a resolved `/`-prefixed config path
fn host_path(config_root: &Path, config: &str) -> PathBuf {
    config_root.join(config.trim_start_matches('/'))
}

/// Collect every plain file below `dir`, visiting entries in name order.
/// Symlinks are followed, so a linked file counts as a file and a linked
/// directory is walked.
fn walk_files(dir: &Path, prefix: &str, out: &mut Vec<String>) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = format!("{}/{}", prefix, name);
        let metadata = std::fs::metadata(entry.path())?;

        if metadata.is_dir() {
            walk_files(&entry.path(), &path, out)?;
        } else if metadata.is_file() {
            out.push(path);
        }
    }

    Ok(())
}
