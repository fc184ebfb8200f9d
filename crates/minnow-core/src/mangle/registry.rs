//! One rename record per symbol.

use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

use super::container::ContainerId;
use crate::model::{IdentifierRef, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub(crate) u32);

impl RecordId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Everything the renamer knows about one symbol. Every occurrence is
/// rewritten to the same short name.
#[derive(Debug, Clone)]
pub struct IdentifierRecord {
    pub symbol: SymbolId,
    /// Name as declared.
    pub name: String,
    pub occurrences: Vec<IdentifierRef>,
    /// Container whose locals declare the symbol.
    pub declared_in: ContainerId,
    /// Containers with at least one occurrence, plus `declared_in`.
    pub containers: BTreeSet<ContainerId>,
    pub short_name: Option<String>,
    /// Set once the record has a final name, kept or assigned.
    pub resolved: bool,
}

impl IdentifierRecord {
    fn new(symbol: SymbolId, name: String, declared_in: ContainerId) -> Self {
        let mut containers = BTreeSet::new();
        containers.insert(declared_in);
        Self {
            symbol,
            name,
            occurrences: Vec::new(),
            declared_in,
            containers,
            short_name: None,
            resolved: false,
        }
    }

    /// The assigned name, or the declared one if none was assigned.
    pub fn effective_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }

    /// Whether the final name differs from the declared one.
    pub fn is_renamed(&self) -> bool {
        self.short_name.as_deref().is_some_and(|short| short != self.name)
    }

    /// Finalize the record under `name`.
    pub(crate) fn resolve(&mut self, name: String) {
        self.short_name = Some(name);
        self.resolved = true;
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    records: Vec<IdentifierRecord>,
    by_symbol: FxHashMap<SymbolId, RecordId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record for `symbol`, creating it as declared in `container` if
    /// this is the first time the symbol is seen.
    pub(crate) fn get_or_insert(
        &mut self,
        symbol: SymbolId,
        name: &str,
        container: ContainerId,
    ) -> RecordId {
        if let Some(&id) = self.by_symbol.get(&symbol) {
            self.records[id.index()].containers.insert(container);
            return id;
        }
        let id = RecordId(self.records.len() as u32);
        self.records
            .push(IdentifierRecord::new(symbol, name.to_string(), container));
        self.by_symbol.insert(symbol, id);
        id
    }

    pub fn lookup(&self, symbol: SymbolId) -> Option<RecordId> {
        self.by_symbol.get(&symbol).copied()
    }

    pub fn get(&self, id: RecordId) -> &IdentifierRecord {
        &self.records[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: RecordId) -> &mut IdentifierRecord {
        &mut self.records[id.index()]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdentifierRecord> {
        self.records.iter()
    }
}
