//! Container graph: the scopes names are assigned in.
//!
//! Every scope-introducing node becomes a container. Containers live in one
//! arena whose order is construction (pre-order) order, and each container
//! points at its parent, so "process in order" and "walk to the root" are
//! both cheap.
//!
//! Function-scoped containers own a name counter; block-scoped containers
//! draw from the counter of their nearest function-scoped ancestor, so a
//! function and the blocks inside it share one name space.

use minnow_lexer::Span;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use tracing::{debug, trace};

use super::names::NameCounter;
use super::registry::{RecordId, Registry};
use crate::codes;
use crate::diagnostics::DiagnosticSink;
use crate::model::{NodeId, NodeKind, SemanticModel, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub(crate) u32);

impl ContainerId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Owns a name counter.
    FunctionScoped,
    /// Uses the counter of the nearest function-scoped ancestor.
    BlockScoped,
}

#[derive(Debug)]
pub struct Container {
    pub id: ContainerId,
    pub node: NodeId,
    pub kind: ScopeKind,
    /// Class or interface.
    pub class_like: bool,
    /// Symbol declared by the container's node (the class for a class body).
    pub symbol: Option<SymbolId>,
    pub span: Span,
    pub parent: Option<ContainerId>,
    pub children: Vec<ContainerId>,
    /// Nearest function-scoped container, itself included.
    pub function_scope: ContainerId,
    /// Records declared here, in declaration order.
    pub locals: Vec<RecordId>,
    /// Names claimed by records renamed elsewhere that occur here.
    pub names_excluded: FxHashSet<String>,
    /// Member names fixed by heritage (class-like containers only).
    pub excluded_properties: BTreeSet<String>,
    /// In-unit base class container.
    pub base: Option<ContainerId>,
    /// In-unit classes that extend this one directly.
    pub derived: Vec<ContainerId>,
    pub(crate) counter: NameCounter,
}

/// How a node kind participates in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Classification {
    Container(ScopeKind),
    /// Not a scope. Locals reported on it are attributed to the enclosing
    /// container.
    Transparent,
    NotContainer,
    Unknown,
}

pub(crate) fn classify(kind: &NodeKind, parent: Option<&NodeKind>) -> Classification {
    use NodeKind::*;
    match kind {
        SourceFile | ModuleDeclaration | ClassDeclaration | ClassExpression
        | InterfaceDeclaration | EnumDeclaration | ObjectLiteral | TypeLiteral | TypeAlias
        | MappedType => Classification::Container(ScopeKind::FunctionScoped),
        kind if kind.is_function_like() => Classification::Container(ScopeKind::FunctionScoped),
        Block | CatchClause | ForStatement | ForInStatement | ForOfStatement | CaseBlock => {
            if parent.is_some_and(NodeKind::is_function_like) {
                Classification::Transparent
            } else {
                Classification::Container(ScopeKind::BlockScoped)
            }
        }
        Unknown(_) => Classification::Unknown,
        _ => Classification::NotContainer,
    }
}

#[derive(Debug, Default)]
pub struct ContainerGraph {
    containers: Vec<Container>,
    by_node: FxHashMap<NodeId, ContainerId>,
}

impl ContainerGraph {
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn get(&self, id: ContainerId) -> &Container {
        &self.containers[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: ContainerId) -> &mut Container {
        &mut self.containers[id.index()]
    }

    /// Containers in construction order.
    pub fn iter(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = ContainerId> {
        (0..self.containers.len() as u32).map(ContainerId)
    }

    /// The container introduced by `node`, if any.
    pub fn for_node(&self, node: NodeId) -> Option<ContainerId> {
        self.by_node.get(&node).copied()
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: ContainerId) -> impl Iterator<Item = ContainerId> + '_ {
        std::iter::successors(self.get(id).parent, move |&current| self.get(current).parent)
    }

    /// Innermost container whose span contains `offset`. Offsets outside
    /// every span belong to the root.
    pub fn innermost_at(&self, offset: u32) -> Option<ContainerId> {
        let mut current = self.containers.first()?.id;
        'descend: loop {
            for &child in &self.get(current).children {
                if self.get(child).span.contains(offset) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// Next name from the counter `id` draws from.
    pub(crate) fn next_name(&mut self, id: ContainerId) -> String {
        let owner = self.get(id).function_scope;
        self.get_mut(owner).counter.next_name()
    }

    fn push(
        &mut self,
        node: NodeId,
        kind: &NodeKind,
        kind_of_scope: ScopeKind,
        symbol: Option<SymbolId>,
        span: Span,
        parent: Option<ContainerId>,
    ) -> ContainerId {
        let id = ContainerId(self.containers.len() as u32);
        let function_scope = match (kind_of_scope, parent) {
            (ScopeKind::BlockScoped, Some(parent)) => self.get(parent).function_scope,
            _ => id,
        };
        self.containers.push(Container {
            id,
            node,
            kind: kind_of_scope,
            class_like: kind.is_class_like(),
            symbol,
            span,
            parent,
            children: Vec::new(),
            function_scope,
            locals: Vec::new(),
            names_excluded: FxHashSet::default(),
            excluded_properties: BTreeSet::new(),
            base: None,
            derived: Vec::new(),
            counter: NameCounter::new(),
        });
        if let Some(parent) = parent {
            self.get_mut(parent).children.push(id);
        }
        self.by_node.insert(node, id);
        id
    }
}

/// Result of the collection pass.
#[derive(Debug, Default)]
pub struct Collected {
    pub graph: ContainerGraph,
    pub registry: Registry,
    /// Text of every occurrence that is unresolved or declared outside the
    /// unit. No generated name may equal one of these.
    pub free_names: FxHashSet<String>,
}

/// Build the container graph and the identifier registry in one pass over
/// the node tree, then attribute every identifier occurrence.
pub(crate) fn collect<M: SemanticModel>(model: &M, sink: &mut DiagnosticSink) -> Collected {
    let mut out = Collected::default();

    let mut stack: Vec<(NodeId, Option<ContainerId>)> = vec![(model.root(), None)];
    while let Some((id, enclosing)) = stack.pop() {
        let Some(node) = model.node(id) else {
            sink.warn(codes::MANGLE_UNKNOWN_CONTAINER, format!("node {} is missing from the model", id.0), None);
            continue;
        };
        let parent_kind = node.parent.and_then(|p| model.node(p)).map(|p| &p.kind);

        let inner = match classify(&node.kind, parent_kind) {
            Classification::Container(scope) => {
                let container =
                    out.graph.push(id, &node.kind, scope, node.symbol, node.span, enclosing);
                trace!(container = container.0, kind = ?node.kind, ?scope, "container");
                collect_locals(model, &mut out, container, &node.locals, sink);
                Some(container)
            }
            Classification::Transparent => {
                if let Some(container) = enclosing {
                    collect_locals(model, &mut out, container, &node.locals, sink);
                }
                enclosing
            }
            Classification::NotContainer | Classification::Unknown if !node.locals.is_empty() => {
                sink.warn(
                    codes::MANGLE_UNKNOWN_CONTAINER,
                    format!(
                        "{:?} node declares {} local(s) but is not a known scope; they keep their names",
                        node.kind,
                        node.locals.len()
                    ),
                    Some(node.span),
                );
                enclosing
            }
            _ => enclosing,
        };

        for &child in node.children.iter().rev() {
            stack.push((child, inner));
        }
    }

    attribute_occurrences(model, &mut out, sink);
    debug!(
        containers = out.graph.len(),
        records = out.registry.len(),
        free_names = out.free_names.len(),
        "collected"
    );
    out
}

fn collect_locals<M: SemanticModel>(
    model: &M,
    out: &mut Collected,
    container: ContainerId,
    locals: &[SymbolId],
    sink: &mut DiagnosticSink,
) {
    for &symbol_id in locals {
        let Some(symbol) = model.symbol(symbol_id) else {
            sink.warn(
                codes::MANGLE_MISSING_SYMBOL,
                format!("local symbol {} is missing from the model", symbol_id.0),
                None,
            );
            continue;
        };
        let record = out.registry.get_or_insert(symbol_id, &symbol.name, container);
        let locals = &mut out.graph.get_mut(container).locals;
        if !locals.contains(&record) {
            locals.push(record);
        }
    }
}

fn attribute_occurrences<M: SemanticModel>(model: &M, out: &mut Collected, sink: &mut DiagnosticSink) {
    let text = model.source_text();
    for occurrence in model.identifiers() {
        let record = occurrence.symbol.and_then(|symbol| out.registry.lookup(symbol));
        match (record, occurrence.symbol) {
            (Some(record), _) => {
                let Some(container) = out.graph.innermost_at(occurrence.start()) else {
                    continue;
                };
                let record = out.registry.get_mut(record);
                record.occurrences.push(*occurrence);
                record.containers.insert(container);
            }
            (None, Some(symbol_id)) => match model.symbol(symbol_id) {
                Some(symbol) => {
                    out.free_names.insert(symbol.name.clone());
                }
                None => {
                    sink.warn(
                        codes::MANGLE_MISSING_SYMBOL,
                        format!("identifier resolves to unknown symbol {}", symbol_id.0),
                        Some(occurrence.name_span()),
                    );
                    if let Some(name) = occurrence.name_span().text(text) {
                        out.free_names.insert(name.to_string());
                    }
                }
            },
            (None, None) => {
                if let Some(name) = occurrence.name_span().text(text) {
                    trace!(name, "free name");
                    out.free_names.insert(name.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BindingKind, DeclKind, SymbolFlags, UnitBuilder};

    const SOURCE: &str = "function outer(p) { let x = p; { let y = x; } for (let i = 0; i < 1; i++) { } }";

    fn let_kind() -> DeclKind {
        DeclKind::Variable(BindingKind::Let)
    }

    #[test]
    fn test_classification_table() {
        use NodeKind::*;
        let func = FunctionDeclaration;
        assert_eq!(classify(&SourceFile, None), Classification::Container(ScopeKind::FunctionScoped));
        assert_eq!(classify(&ArrowFunction, Some(&Block)), Classification::Container(ScopeKind::FunctionScoped));
        assert_eq!(classify(&InterfaceDeclaration, Some(&SourceFile)), Classification::Container(ScopeKind::FunctionScoped));
        assert_eq!(classify(&Block, Some(&Block)), Classification::Container(ScopeKind::BlockScoped));
        assert_eq!(classify(&Block, Some(&func)), Classification::Transparent);
        assert_eq!(classify(&CatchClause, Some(&Statement)), Classification::Container(ScopeKind::BlockScoped));
        assert_eq!(classify(&ModuleBlock, Some(&ModuleDeclaration)), Classification::NotContainer);
        assert_eq!(classify(&Unknown("Decorator".into()), None), Classification::Unknown);
    }

    #[test]
    fn test_graph_order_parents_and_counters() {
        let mut b = UnitBuilder::new("a.ts", SOURCE);
        let func_span = b.braced_span("function outer", 0).unwrap();
        let func = b.node(NodeKind::FunctionDeclaration, b.root(), func_span);
        let body = b.node(NodeKind::Block, func, b.braced_span("{ let x", 0).unwrap());
        let inner = b.node(NodeKind::Block, body, b.braced_span("{ let y", 0).unwrap());
        let for_span = Span::new(b.find("for", 0).unwrap(), b.find("} }", 0).unwrap() + 1);
        let for_node = b.node(NodeKind::ForStatement, body, for_span);

        let outer = b.declare(b.root(), "outer", DeclKind::Function, SymbolFlags::empty());
        let p = b.declare(func, "p", DeclKind::Parameter, SymbolFlags::empty());
        let x = b.declare(body, "x", let_kind(), SymbolFlags::empty());
        let y = b.declare(inner, "y", let_kind(), SymbolFlags::empty());
        let i = b.declare(for_node, "i", let_kind(), SymbolFlags::empty());
        for symbol in [outer, p, x, y, i] {
            b.references(symbol);
        }
        let model = b.build().unwrap();

        let mut sink = DiagnosticSink::new();
        let collected = collect(&model, &mut sink);
        let graph = &collected.graph;
        assert!(sink.is_empty());

        // root, function, inner block, for statement: the body block is not a container
        assert_eq!(graph.len(), 4);
        let kinds: Vec<ScopeKind> = graph.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ScopeKind::FunctionScoped, ScopeKind::FunctionScoped, ScopeKind::BlockScoped, ScopeKind::BlockScoped]
        );
        let function = graph.for_node(func).unwrap();
        assert_eq!(graph.for_node(body), None);
        let block = graph.for_node(inner).unwrap();
        assert_eq!(graph.get(block).parent, Some(function));
        assert_eq!(graph.get(block).function_scope, function);
        assert_eq!(graph.ancestors(block).collect::<Vec<_>>(), vec![function, ContainerId(0)]);

        // locals of the transparent body land on the function
        let function_locals: Vec<&str> = graph
            .get(function)
            .locals
            .iter()
            .map(|&r| collected.registry.get(r).name.as_str())
            .collect();
        assert_eq!(function_locals, vec!["p", "x"]);

        // x occurs in the function and in the inner block
        let x_record = collected.registry.get(collected.registry.lookup(x).unwrap());
        assert_eq!(x_record.occurrences.len(), 2);
        assert!(x_record.containers.contains(&block));
    }

    #[test]
    fn test_block_scoped_containers_share_the_function_counter() {
        let mut b = UnitBuilder::new("a.ts", SOURCE);
        let func = b.node(NodeKind::FunctionDeclaration, b.root(), b.braced_span("function outer", 0).unwrap());
        let body = b.node(NodeKind::Block, func, b.braced_span("{ let x", 0).unwrap());
        let inner = b.node(NodeKind::Block, body, b.braced_span("{ let y", 0).unwrap());
        let model = b.build().unwrap();

        let mut collected = collect(&model, &mut DiagnosticSink::new());
        let graph = &mut collected.graph;
        let function = graph.for_node(func).unwrap();
        let block = graph.for_node(inner).unwrap();
        assert_eq!(graph.next_name(function), "a");
        assert_eq!(graph.next_name(block), "b");
        assert_eq!(graph.next_name(function), "c");
        assert_eq!(graph.next_name(ContainerId(0)), "a");
    }

    #[test]
    fn test_unresolved_and_external_names_are_free() {
        let mut b = UnitBuilder::new("a.ts", "let total = console.log(Math.max(1, 2));");
        let total = b.declare(b.root(), "total", let_kind(), SymbolFlags::empty());
        let math = b.symbol("Math", DeclKind::Variable(BindingKind::Var), SymbolFlags::AMBIENT);
        b.references(total);
        b.references(math);
        b.unresolved_all("console");
        let model = b.build().unwrap();

        let collected = collect(&model, &mut DiagnosticSink::new());
        assert!(collected.free_names.contains("Math"));
        assert!(collected.free_names.contains("console"));
        assert!(!collected.free_names.contains("total"));
    }

    #[test]
    fn test_locals_on_unknown_nodes_are_reported() {
        let mut b = UnitBuilder::new("a.ts", "@dec class C {}");
        let odd = b.node(NodeKind::Unknown("Decorator".into()), b.root(), Span::new(0, 4));
        b.declare(odd, "dec", DeclKind::Other, SymbolFlags::empty());
        let model = b.build().unwrap();

        let mut sink = DiagnosticSink::new();
        let collected = collect(&model, &mut sink);
        assert_eq!(collected.registry.len(), 0);
        let diagnostics = sink.into_vec();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, codes::MANGLE_UNKNOWN_CONTAINER);
    }
}
