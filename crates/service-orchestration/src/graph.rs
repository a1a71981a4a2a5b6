//! Dependency graph resolution
//!
//! Builds a directed graph over the installed service set from the
//! required/optional dependency and dependent declarations, and produces a
//! deterministic topological order. The graph is recomputed from scratch on
//! every call: adding or removing a single service can change which optional
//! edges exist, so incremental maintenance would go stale.

use crate::{Error, Result, service::ServiceEntity};
use indexmap::IndexMap;
use std::collections::VecDeque;

/// The result of resolving the dependency graph over a service set
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Service names in topological order (dependencies before dependents)
    pub order: Vec<String>,
    /// Service name → the deduplicated names it depends on
    ///
    /// Only services with at least one dependency appear as keys. The order
    /// is used forward for create/start and reversed for stop/teardown.
    pub edges: IndexMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Resolve the graph over the given service set.
    ///
    /// Fails with [`Error::MissingDependency`] when a required dependency or
    /// dependent names a service that is not installed (optional ones are
    /// silently dropped), and with [`Error::DependencyCycle`] when no
    /// linearization exists. Partial orders are never returned.
    pub fn compute(services: &IndexMap<String, ServiceEntity>) -> Result<Self> {
        let mut edges: IndexMap<String, Vec<String>> = IndexMap::new();

        let require = |wanted_by: &str, name: &str| -> Result<()> {
            if services.contains_key(name) {
                Ok(())
            } else {
                Err(Error::MissingDependency {
                    name: name.to_string(),
                    wanted_by: wanted_by.to_string(),
                })
            }
        };

        for (name, entity) in services {
            let declaration = entity.declaration();

            for dep in &declaration.deps {
                require(name, dep)?;
                edges.entry(name.clone()).or_default().push(dep.clone());
            }

            // Reverse edges: the named service must be treated as depending
            // on this one.
            for dependent in &declaration.dept {
                require(name, dependent)?;
                edges
                    .entry(dependent.clone())
                    .or_default()
                    .push(name.clone());
            }

            for dep in &declaration.opt_deps {
                if services.contains_key(dep) {
                    edges.entry(name.clone()).or_default().push(dep.clone());
                }
            }

            for dependent in &declaration.opt_dept {
                if services.contains_key(dependent) {
                    edges
                        .entry(dependent.clone())
                        .or_default()
                        .push(name.clone());
                }
            }
        }

        // A dependency named through multiple paths must appear once.
        for deps in edges.values_mut() {
            let mut seen = indexmap::IndexSet::new();
            deps.retain(|dep| seen.insert(dep.clone()));
        }

        let order = topological_sort(services, &edges)?;

        Ok(Self { order, edges })
    }
}

/// Kahn's algorithm over the full node set, with ties broken by the insertion
/// order of the service map so the result is deterministic.
fn topological_sort(
    services: &IndexMap<String, ServiceEntity>,
    edges: &IndexMap<String, Vec<String>>,
) -> Result<Vec<String>> {
    let mut in_degree: IndexMap<&str, usize> = IndexMap::new();
    let mut dependents: IndexMap<&str, Vec<&str>> = IndexMap::new();

    for name in services.keys() {
        in_degree.insert(name.as_str(), 0);
    }
    for (name, deps) in edges {
        *in_degree.get_mut(name.as_str()).expect("node exists") = deps.len();
        for dep in deps {
            dependents.entry(dep.as_str()).or_default().push(name.as_str());
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(&name, _)| name)
        .collect();
    let mut order = Vec::with_capacity(services.len());

    while let Some(name) = queue.pop_front() {
        order.push(name.to_string());

        for &dependent in dependents.get(name).map(Vec::as_slice).unwrap_or(&[]) {
            let degree = in_degree.get_mut(dependent).expect("node exists");
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != services.len() {
        return Err(Error::DependencyCycle);
    }

    Ok(order)
}
