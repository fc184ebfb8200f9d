//! Names a container may not hand out.

use rustc_hash::FxHashSet;

use super::container::{ContainerGraph, ContainerId};
use super::registry::Registry;

/// Forbidden names for one container: a local set built for the container
/// plus the unit-wide free names, which are shared rather than copied.
#[derive(Debug)]
pub(crate) struct Exclusions<'a> {
    local: FxHashSet<String>,
    global: &'a FxHashSet<String>,
}

impl<'a> Exclusions<'a> {
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.local.contains(name) || self.global.contains(name)
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>) {
        self.local.insert(name.into());
    }

    #[cfg(test)]
    pub(crate) fn local_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.local.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Compute the exclusions for `id`. Ancestors and in-unit base classes must
/// already be processed so their records carry final names.
pub(crate) fn compute<'a>(
    graph: &ContainerGraph,
    registry: &Registry,
    free_names: &'a FxHashSet<String>,
    id: ContainerId,
) -> Exclusions<'a> {
    let container = graph.get(id);
    let mut local = container.names_excluded.clone();

    for scope in std::iter::once(id).chain(graph.ancestors(id)) {
        for &record in &graph.get(scope).locals {
            let record = registry.get(record);
            if record.resolved {
                local.insert(record.effective_name().to_string());
            }
        }
    }

    local.extend(container.excluded_properties.iter().cloned());

    // Members of base classes, so an added member never shadows an
    // inherited one.
    let bases = std::iter::successors(container.base, |&base| graph.get(base).base);
    for base in bases {
        for &record in &graph.get(base).locals {
            local.insert(registry.get(record).effective_name().to_string());
        }
    }

    // Members of subclasses, which are named later and may keep their
    // declared names.
    let mut pending: Vec<ContainerId> = container.derived.clone();
    let mut seen: FxHashSet<ContainerId> = FxHashSet::default();
    while let Some(derived) = pending.pop() {
        if !seen.insert(derived) {
            continue;
        }
        let derived = graph.get(derived);
        for &record in &derived.locals {
            let record = registry.get(record);
            local.insert(record.name.clone());
            local.insert(record.effective_name().to_string());
        }
        pending.extend(derived.derived.iter().copied());
    }

    Exclusions { local, global: free_names }
}
