//! Member names fixed by inheritance.
//!
//! A member that overrides or implements something visible outside the
//! class must keep the name callers use. For each class-like container this
//! pass collects such names into `excluded_properties`, and links in-unit
//! base classes so the renamer can process a base before its subclasses.
//! Matching is by name only; an unrelated member that happens to share a
//! name is excluded too.

use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use tracing::{debug, trace};

use super::container::{ContainerGraph, ContainerId};
use crate::codes;
use crate::diagnostics::DiagnosticSink;
use crate::model::{DeclKind, SemanticModel, Symbol, SymbolId};

pub(crate) fn analyze<M: SemanticModel>(model: &M, graph: &mut ContainerGraph, sink: &mut DiagnosticSink) {
    let class_like: Vec<(ContainerId, SymbolId)> = graph
        .iter()
        .filter(|c| c.class_like)
        .filter_map(|c| c.symbol.map(|symbol| (c.id, symbol)))
        .collect();

    for (container, symbol_id) in class_like {
        let Some(symbol) = model.symbol(symbol_id) else {
            sink.warn(
                codes::MANGLE_MISSING_SYMBOL,
                format!("class symbol {} is missing from the model", symbol_id.0),
                Some(graph.get(container).span),
            );
            continue;
        };

        let mut walker = HeritageWalker {
            model,
            sink: &mut *sink,
            excluded: BTreeSet::new(),
            visited: FxHashSet::default(),
        };
        walker.visited.insert(symbol_id);
        for &member in &symbol.members {
            if let Some(member) = model.symbol(member) {
                if member.flags.is_abstract() {
                    walker.excluded.insert(member.name.clone());
                }
            }
        }
        for &base in &symbol.extends {
            walker.inherit(base);
        }
        for &contract in &symbol.implements {
            walker.require(contract);
        }
        let excluded = walker.excluded;

        if !excluded.is_empty() {
            debug!(class = %symbol.name, excluded = ?excluded, "heritage exclusions");
        }
        graph.get_mut(container).excluded_properties = excluded;

        if let Some(base) = in_unit_base(model, graph, symbol) {
            trace!(class = %symbol.name, base = base.0, "base class container");
            graph.get_mut(container).base = Some(base);
            graph.get_mut(base).derived.push(container);
        }
    }
}

/// The container of the first `extends` target declared in this unit.
fn in_unit_base<M: SemanticModel>(model: &M, graph: &ContainerGraph, symbol: &Symbol) -> Option<ContainerId> {
    symbol.extends.iter().find_map(|&base| {
        let node = model.symbol(base)?.declaration?;
        let container = graph.for_node(node)?;
        graph.get(container).class_like.then_some(container)
    })
}

struct HeritageWalker<'a, M> {
    model: &'a M,
    sink: &'a mut DiagnosticSink,
    excluded: BTreeSet<String>,
    visited: FxHashSet<SymbolId>,
}

impl<'a, M: SemanticModel> HeritageWalker<'a, M> {
    fn resolve(&mut self, id: SymbolId) -> Option<&'a Symbol> {
        if !self.visited.insert(id) {
            return None;
        }
        let model: &'a M = self.model;
        let symbol = model.symbol(id);
        if symbol.is_none() {
            self.sink.warn(
                codes::MANGLE_UNRESOLVED_HERITAGE,
                format!("heritage target {} is missing from the model", id.0),
                None,
            );
        }
        symbol
    }

    /// Walk an `extends` target: keep members visible outside the unit and
    /// members of abstract types.
    fn inherit(&mut self, id: SymbolId) {
        let model = self.model;
        let Some(base) = self.resolve(id) else {
            return;
        };
        let base_visible = base.flags.is_external() || base.declaration.is_none();
        let contract = base.kind == DeclKind::Interface || base.flags.is_abstract();
        for &member in &base.members {
            if let Some(member) = model.symbol(member) {
                if base_visible || contract || member.flags.is_external() || member.flags.is_abstract() {
                    self.excluded.insert(member.name.clone());
                }
            }
        }
        for &next in &base.extends {
            self.inherit(next);
        }
        for &next in &base.implements {
            self.require(next);
        }
    }

    /// Walk an `implements` target: every member is part of the contract.
    fn require(&mut self, id: SymbolId) {
        let model = self.model;
        let Some(contract) = self.resolve(id) else {
            return;
        };
        for &member in &contract.members {
            if let Some(member) = model.symbol(member) {
                self.excluded.insert(member.name.clone());
            }
        }
        for &next in contract.extends.iter().chain(&contract.implements) {
            self.require(next);
        }
    }
}
