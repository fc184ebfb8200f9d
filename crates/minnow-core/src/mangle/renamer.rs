//! Name assignment.
//!
//! Containers are processed in construction order, each after its parent
//! and after its in-unit base class. Within a container, records that keep
//! their name are settled first so that every generated name can avoid
//! them; the rest draw from the container's counter.
//!
//! Names that will be kept are reserved in their declaring containers
//! before anything is named. An outer record used inside a nested scope
//! must not take a name that scope keeps, or the kept local would shadow it.

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use super::container::{ContainerGraph, ContainerId};
use super::eligibility::{self, KeepReason, Verdict};
use super::exclusion::{self, Exclusions};
use super::patch::TextPatcher;
use super::registry::{IdentifierRecord, RecordId, Registry};
use super::MangleError;
use crate::config::MinifierOptions;
use crate::model::SemanticModel;

pub(crate) struct Renamer<'a, M> {
    model: &'a M,
    options: &'a MinifierOptions,
    graph: &'a mut ContainerGraph,
    registry: &'a mut Registry,
    free_names: &'a FxHashSet<String>,
    patcher: TextPatcher<'a>,
    done: Vec<bool>,
}

/// Why a record keeps its declared name.
#[derive(Debug, Clone, Copy)]
enum Kept {
    SingleCharacter,
    Ineligible(KeepReason),
    Heritage,
    Subclass,
}

impl Kept {
    fn as_str(self) -> &'static str {
        match self {
            Kept::SingleCharacter => "single character",
            Kept::Ineligible(reason) => reason.as_str(),
            Kept::Heritage => "inherited contract",
            Kept::Subclass => "kept by subclass",
        }
    }
}

impl<'a, M: SemanticModel> Renamer<'a, M> {
    pub(crate) fn new(
        model: &'a M,
        options: &'a MinifierOptions,
        graph: &'a mut ContainerGraph,
        registry: &'a mut Registry,
        free_names: &'a FxHashSet<String>,
    ) -> Self {
        let done = vec![false; graph.len()];
        Self {
            model,
            options,
            graph,
            registry,
            free_names,
            patcher: TextPatcher::new(model.source_text()),
            done,
        }
    }

    /// Name every record, returning the queued edits.
    pub(crate) fn run(mut self) -> Result<TextPatcher<'a>, MangleError> {
        self.reserve_kept_names();
        let ids: Vec<ContainerId> = self.graph.ids().collect();
        for id in ids {
            self.process(id)?;
        }
        Ok(self.patcher)
    }

    /// Mark the name of every record that cannot be renamed as excluded in
    /// the container declaring it.
    fn reserve_kept_names(&mut self) {
        let kept: Vec<(ContainerId, String)> = self
            .registry
            .iter()
            .filter(|record| self.keeps_declared_name(record))
            .map(|record| (record.declared_in, record.name.clone()))
            .collect();
        debug!(kept = kept.len(), "reserved kept names");
        for (container, name) in kept {
            self.graph.get_mut(container).names_excluded.insert(name);
        }
    }

    fn keeps_declared_name(&self, record: &IdentifierRecord) -> bool {
        if record.name.chars().count() == 1 {
            return true;
        }
        match self.model.symbol(record.symbol) {
            Some(symbol) => !eligibility::classify(self.model, symbol, self.options).is_renamable(),
            None => true,
        }
    }

    /// Containers between each use of `record_id` and its declaration,
    /// both ends included. A name reserved in any of them would capture
    /// one of the uses.
    fn scopes_of_use(&self, record_id: RecordId) -> Vec<ContainerId> {
        let record = self.registry.get(record_id);
        let mut scopes = Vec::new();
        for &used_in in &record.containers {
            let path = std::iter::once(used_in).chain(self.graph.ancestors(used_in));
            for scope in path {
                if !scopes.contains(&scope) {
                    scopes.push(scope);
                }
                if scope == record.declared_in {
                    break;
                }
            }
        }
        scopes
    }

    fn process(&mut self, id: ContainerId) -> Result<(), MangleError> {
        if self.done[id.index()] {
            return Ok(());
        }
        self.done[id.index()] = true;

        let container = self.graph.get(id);
        let (parent, base) = (container.parent, container.base);
        if let Some(parent) = parent {
            self.process(parent)?;
        }
        if let Some(base) = base {
            self.process(base)?;
        }
        self.assign(id)
    }

    fn assign(&mut self, id: ContainerId) -> Result<(), MangleError> {
        let free_names = self.free_names;
        let mut exclusions = exclusion::compute(self.graph, self.registry, free_names, id);
        let container = self.graph.get(id);
        let locals = container.locals.clone();
        let class_like = container.class_like;
        debug!(container = id.0, locals = locals.len(), "assigning names");

        let mut pending = Vec::new();
        for record_id in locals {
            let record = self.registry.get(record_id);
            if record.resolved {
                continue;
            }
            let Some(symbol) = self.model.symbol(record.symbol) else {
                self.keep(record_id, Kept::Ineligible(KeepReason::UnsupportedKind), &mut exclusions);
                continue;
            };
            let verdict = eligibility::classify(self.model, symbol, self.options);

            if record.name.chars().count() == 1 {
                self.keep(record_id, Kept::SingleCharacter, &mut exclusions);
            } else if let Verdict::Keep(reason) = verdict {
                self.keep(record_id, Kept::Ineligible(reason), &mut exclusions);
            } else if class_like && self.graph.get(id).excluded_properties.contains(&record.name) {
                self.keep(record_id, Kept::Heritage, &mut exclusions);
            } else if class_like && self.pinned_by_subclass(id, &record.name) {
                self.keep(record_id, Kept::Subclass, &mut exclusions);
            } else if let Some(inherited) = self.inherited_name(id, &record.name) {
                trace!(name = %record.name, inherited = %inherited, "overrides base member");
                self.commit(record_id, inherited, &mut exclusions)?;
            } else {
                pending.push(record_id);
            }
        }

        for record_id in pending {
            let original_len = self.registry.get(record_id).name.chars().count();
            let scopes = self.scopes_of_use(record_id);
            let candidate = loop {
                let candidate = self.graph.next_name(id);
                let reserved = scopes
                    .iter()
                    .any(|&scope| self.graph.get(scope).names_excluded.contains(&candidate));
                if !exclusions.contains(&candidate) && !reserved {
                    break candidate;
                }
            };
            if candidate.len() > original_len {
                return Err(MangleError::NameTooLong {
                    original: self.registry.get(record_id).name.clone(),
                    candidate,
                });
            }
            self.commit(record_id, candidate, &mut exclusions)?;
        }
        Ok(())
    }

    fn keep(&mut self, record_id: RecordId, why: Kept, exclusions: &mut Exclusions<'_>) {
        let record = self.registry.get_mut(record_id);
        trace!(name = %record.name, reason = why.as_str(), "kept");
        let name = record.name.clone();
        record.resolve(name.clone());
        for &container in &record.containers {
            self.graph.get_mut(container).names_excluded.insert(name.clone());
        }
        exclusions.insert(name);
    }

    fn commit(&mut self, record_id: RecordId, name: String, exclusions: &mut Exclusions<'_>) -> Result<(), MangleError> {
        let record = self.registry.get_mut(record_id);
        trace!(from = %record.name, to = %name, "renamed");
        record.resolve(name.clone());
        for &container in &record.containers {
            self.graph.get_mut(container).names_excluded.insert(name.clone());
        }
        exclusions.insert(name.clone());

        if record.name != name {
            for occurrence in &record.occurrences {
                self.patcher.rename(occurrence, &record.name, &name)?;
            }
        }
        Ok(())
    }

    /// Final name of a same-named member somewhere up the base chain.
    fn inherited_name(&self, id: ContainerId, name: &str) -> Option<String> {
        let bases = std::iter::successors(self.graph.get(id).base, |&base| self.graph.get(base).base);
        for base in bases {
            for &record in &self.graph.get(base).locals {
                let record = self.registry.get(record);
                if record.name == name && record.resolved {
                    return Some(record.effective_name().to_string());
                }
            }
        }
        None
    }

    /// Whether a subclass declares a same-named member that cannot be
    /// renamed, which forces the base member to keep its name too.
    fn pinned_by_subclass(&self, id: ContainerId, name: &str) -> bool {
        let mut pending = self.graph.get(id).derived.clone();
        let mut seen = FxHashSet::default();
        while let Some(derived) = pending.pop() {
            if !seen.insert(derived) {
                continue;
            }
            let container = self.graph.get(derived);
            if container.excluded_properties.contains(name) {
                return true;
            }
            for &record in &container.locals {
                let record = self.registry.get(record);
                if record.name != name {
                    continue;
                }
                let renamable = self
                    .model
                    .symbol(record.symbol)
                    .is_some_and(|symbol| eligibility::classify(self.model, symbol, self.options).is_renamable());
                if !renamable {
                    return true;
                }
            }
            pending.extend(container.derived.iter().copied());
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::config::MinifierOptions;
    use crate::mangle::{mangle, MangleOutcome};
    use crate::model::{BindingKind, DeclKind, NodeKind, SymbolFlags, SymbolId, UnitBuilder};

    fn short(outcome: &MangleOutcome, symbol: SymbolId) -> Option<&str> {
        outcome
            .renames
            .iter()
            .find(|rename| rename.symbol == symbol)
            .map(|rename| rename.short_name.as_str())
    }

    #[test]
    fn test_sibling_functions_reuse_names() {
        let source = "function one(alpha) { return alpha; } function two(beta) { return beta; }";
        let mut b = UnitBuilder::new("r.ts", source);
        let root = b.root();
        let one_node = b.node(NodeKind::FunctionDeclaration, root, b.braced_span("function one", 0).unwrap());
        let two_node = b.node(NodeKind::FunctionDeclaration, root, b.braced_span("function two", 0).unwrap());
        let one = b.declare(root, "one", DeclKind::Function, SymbolFlags::empty());
        let two = b.declare(root, "two", DeclKind::Function, SymbolFlags::empty());
        let alpha = b.declare(one_node, "alpha", DeclKind::Parameter, SymbolFlags::empty());
        let beta = b.declare(two_node, "beta", DeclKind::Parameter, SymbolFlags::empty());
        for symbol in [one, two, alpha, beta] {
            b.references(symbol);
        }
        let model = b.build().unwrap();

        let outcome = mangle(&model, &MinifierOptions::default()).unwrap();
        assert_eq!(short(&outcome, one), Some("a"));
        assert_eq!(short(&outcome, two), Some("b"));
        assert_eq!(short(&outcome, alpha), Some("c"));
        assert_eq!(short(&outcome, beta), Some("c"));
        assert_eq!(
            outcome.text,
            "function a  (c    ) { return c    ; } function b  (c   ) { return c   ; }"
        );
        assert_eq!(outcome.text.len(), source.len());
    }

    #[test]
    fn test_free_names_are_never_generated() {
        let source = "let alpha = a + b;";
        let mut b = UnitBuilder::new("r.ts", source);
        let alpha = b.declare(b.root(), "alpha", DeclKind::Variable(BindingKind::Let), SymbolFlags::empty());
        b.references(alpha);
        b.unresolved_all("a");
        b.unresolved_all("b");
        let model = b.build().unwrap();

        let outcome = mangle(&model, &MinifierOptions::default()).unwrap();
        assert_eq!(outcome.text, "let c     = a + b;");
    }

    #[test]
    fn test_single_character_and_exported_names_are_kept() {
        let source = "export const api = 1; let q = api; let local = q;";
        let mut b = UnitBuilder::new("r.ts", source);
        let root = b.root();
        let api = b.declare(root, "api", DeclKind::Variable(BindingKind::Const), SymbolFlags::EXPORT);
        let q = b.declare(root, "q", DeclKind::Variable(BindingKind::Let), SymbolFlags::empty());
        let local = b.declare(root, "local", DeclKind::Variable(BindingKind::Let), SymbolFlags::empty());
        for symbol in [api, q, local] {
            b.references(symbol);
        }
        let model = b.build().unwrap();

        let outcome = mangle(&model, &MinifierOptions::default()).unwrap();
        assert_eq!(short(&outcome, api), None);
        assert_eq!(short(&outcome, q), None);
        assert_eq!(short(&outcome, local), Some("a"));
        assert_eq!(outcome.identifier_count, 3);
        assert_eq!(outcome.renamed_count, 1);
    }

    #[test]
    fn test_blocks_draw_from_the_function_counter() {
        let source = "function outer() { let first = 1; if (ok) { let second = first; } }";
        let mut b = UnitBuilder::new("r.ts", source);
        let root = b.root();
        let func = b.node(NodeKind::FunctionDeclaration, root, b.braced_span("function outer", 0).unwrap());
        let stmt = b.node(NodeKind::Statement, func, b.braced_span("if (ok)", 0).unwrap());
        let block = b.node(NodeKind::Block, stmt, b.braced_span("{ let second", 0).unwrap());
        let outer = b.declare(root, "outer", DeclKind::Function, SymbolFlags::empty());
        let first = b.declare(func, "first", DeclKind::Variable(BindingKind::Let), SymbolFlags::empty());
        let second = b.declare(block, "second", DeclKind::Variable(BindingKind::Let), SymbolFlags::empty());
        for symbol in [outer, first, second] {
            b.references(symbol);
        }
        let model = b.build().unwrap();

        let outcome = mangle(&model, &MinifierOptions::default()).unwrap();
        assert_eq!(short(&outcome, outer), Some("a"));
        assert_eq!(short(&outcome, first), Some("b"));
        assert_eq!(short(&outcome, second), Some("c"));
    }

    fn class_pair(child_shared: SymbolFlags) -> (crate::model::UnitModel, [SymbolId; 4]) {
        let source = "class Base { shared() {} own() {} } class Child extends Base { shared() {} extra() {} }";
        let mut b = UnitBuilder::new("r.ts", source);
        let root = b.root();
        let base_span = b.braced_span("class Base", 0).unwrap();
        let child_span = b.braced_span("class Child", 0).unwrap();
        let base_node = b.named_node(NodeKind::ClassDeclaration, root, "Base", base_span);
        let child_node = b.named_node(NodeKind::ClassDeclaration, root, "Child", child_span);

        let base = b.declare(root, "Base", DeclKind::Class, SymbolFlags::empty());
        b.set_declaration(base, base_node);
        let child = b.declare(root, "Child", DeclKind::Class, SymbolFlags::empty());
        b.set_declaration(child, child_node);
        b.extends(child, base);

        let base_shared = b.member(base, base_node, "shared", DeclKind::Method, SymbolFlags::empty());
        let own = b.member(base, base_node, "own", DeclKind::Method, SymbolFlags::empty());
        let child_shared = b.member(child, child_node, "shared", DeclKind::Method, child_shared);
        let extra = b.member(child, child_node, "extra", DeclKind::Method, SymbolFlags::empty());

        b.references(base);
        b.references(child);
        b.references_in(base_shared, base_span);
        b.references_in(child_shared, child_span);
        b.references(own);
        b.references(extra);
        (b.build().unwrap(), [base_shared, own, child_shared, extra])
    }

    #[test]
    fn test_overrides_adopt_the_base_name() {
        let (model, [base_shared, own, child_shared, extra]) = class_pair(SymbolFlags::empty());
        let outcome = mangle(&model, &MinifierOptions::default()).unwrap();

        assert_eq!(short(&outcome, base_shared), Some("c"));
        assert_eq!(short(&outcome, child_shared), Some("c"));
        assert_eq!(short(&outcome, own), Some("d"));
        assert_eq!(short(&outcome, extra), Some("e"));
        assert_eq!(outcome.text.len(), model.text.len());
    }

    #[test]
    fn test_kept_override_pins_the_base_member() {
        let (model, [base_shared, own, child_shared, _]) = class_pair(SymbolFlags::NO_MANGLE);
        let outcome = mangle(&model, &MinifierOptions::default()).unwrap();

        assert_eq!(short(&outcome, base_shared), None);
        assert_eq!(short(&outcome, child_shared), None);
        assert_eq!(short(&outcome, own), Some("c"));
        assert!(outcome.text.contains("{ shared() {} c  () {} }"));
    }
}
