//! # Service Configuration
//!
//! Declaration parser for docker-services.
//!
//! Every service is declared by a `service.json` file inside its directory.
//! This crate parses that file into a [`ServiceDeclaration`], models the
//! nested configuration-folder tree as a [`ConfigTree`], and renders the
//! systemd unit text for an installed service.

#![warn(missing_docs)]

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub mod parser;
pub mod unit;

pub use parser::load;

/// Declaration error types
#[derive(Debug, Error)]
pub enum DeclarationError {
    /// Failed to read a declaration file
    #[error("failed to read declaration: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse the declaration JSON
    #[error("failed to parse declaration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Structurally valid JSON that does not describe a usable service
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),
}

/// Result type for declaration operations
pub type Result<T> = std::result::Result<T, DeclarationError>;

/// A parsed `service.json` declaration
///
/// Field names follow the on-disk JSON format. All list- and map-typed fields
/// default to empty; only `tag` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDeclaration {
    /// Container image reference
    pub tag: String,

    /// Explicit service name; derived from `tag` when absent
    #[serde(default)]
    pub name: Option<String>,

    /// Services that must be running before this one starts
    #[serde(default)]
    pub deps: Vec<String>,

    /// Services that must be treated as depending on this one (reverse edges)
    #[serde(default)]
    pub dept: Vec<String>,

    /// Like `deps`, but silently ignored when the named service is not installed
    #[serde(default, rename = "optDeps")]
    pub opt_deps: Vec<String>,

    /// Like `dept`, but silently ignored when the named service is not installed
    #[serde(default, rename = "optDept")]
    pub opt_dept: Vec<String>,

    /// Ports published identically on host and container
    #[serde(default)]
    pub ports: Vec<u16>,

    /// Local mount subdirectory name → absolute container path
    #[serde(default)]
    pub mounts: IndexMap<String, String>,

    /// Nested configuration-folder tree
    #[serde(default)]
    pub configs: ConfigTree,
}

impl ServiceDeclaration {
    /// The service's name: the explicit `name` field, or the last `/` segment
    /// of `tag`.
    pub fn service_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.tag.rsplit('/').next().unwrap_or(&self.tag),
        }
    }
}

/// A node in the nested configuration-folder tree
///
/// On disk the tree is a JSON object whose keys are path segments; an empty
/// object marks a leaf directory to mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigTree {
    /// A directory to mount (no child segments)
    Leaf,
    /// Nested path segments
    Branch(IndexMap<String, ConfigTree>),
}

impl Default for ConfigTree {
    fn default() -> Self {
        ConfigTree::Leaf
    }
}

impl<'de> Deserialize<'de> for ConfigTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let children = IndexMap::<String, ConfigTree>::deserialize(deserializer)?;
        if children.is_empty() {
            Ok(ConfigTree::Leaf)
        } else {
            Ok(ConfigTree::Branch(children))
        }
    }
}

impl ConfigTree {
    /// Flatten the tree into its leaf paths, in declaration order, each
    /// rendered as a `/`-prefixed path.
    ///
    /// An empty tree (a root-level leaf) has no declared folders.
    pub fn flatten(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect("", &mut paths);
        paths
    }

    fn collect(&self, prefix: &str, paths: &mut Vec<String>) {
        match self {
            ConfigTree::Leaf => {
                if !prefix.is_empty() {
                    paths.push(prefix.to_string());
                }
            }
            ConfigTree::Branch(children) => {
                for (segment, child) in children {
                    child.collect(&format!("{}/{}", prefix, segment), paths);
                }
            }
        }
    }
}
