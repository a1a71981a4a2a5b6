//! The durable record of installed services
//!
//! A registry is a directory holding one symlink per installed service,
//! pointing at that service's declaration directory. It is the only durable
//! state: containers and images are derived and re-creatable. The in-memory
//! service set is rebuilt from the registry at process start.

use crate::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A symlink-directory registry of installed services
#[derive(Debug, Clone)]
pub struct Registry {
    root: PathBuf,
}

impl Registry {
    /// Open a registry rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The registry's root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate installed services as `(name, declaration directory)`
    /// pairs, sorted by name
    pub fn entries(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let target = std::fs::canonicalize(entry.path())?;
            entries.push((name, target));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    /// True when a service by this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.root.join(name).symlink_metadata().is_ok()
    }

    /// Register a service by symlinking its declaration directory
    pub fn add(&self, name: &str, target: &Path) -> Result<()> {
        debug!(name, target = %target.display(), "registering service");
        std::os::unix::fs::symlink(target, self.root.join(name))?;
        Ok(())
    }

    /// Unregister a service by deleting its symlink
    pub fn remove(&self, name: &str) -> Result<()> {
        debug!(name, "unregistering service");
        std::fs::remove_file(self.root.join(name))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("registry");
        let registry = Registry::open(&root).unwrap();
        assert!(root.is_dir());
        assert!(registry.entries().unwrap().is_empty());
    }

    #[test]
    fn test_add_list_remove() {
        let dir = tempfile::tempdir().unwrap();
        let service_dir = dir.path().join("redis");
        std::fs::create_dir(&service_dir).unwrap();

        let registry = Registry::open(dir.path().join("registry")).unwrap();
        registry.add("redis", &service_dir).unwrap();

        assert!(registry.contains("redis"));
        let entries = registry.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "redis");
        assert_eq!(entries[0].1, std::fs::canonicalize(&service_dir).unwrap());

        registry.remove("redis").unwrap();
        assert!(!registry.contains("redis"));
        assert!(registry.entries().unwrap().is_empty());
    }

    #[test]
    fn test_entries_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }

        let registry = Registry::open(dir.path().join("registry")).unwrap();
        registry.add("zeta", &dir.path().join("zeta")).unwrap();
        registry.add("alpha", &dir.path().join("alpha")).unwrap();

        let names: Vec<_> = registry
            .entries()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
