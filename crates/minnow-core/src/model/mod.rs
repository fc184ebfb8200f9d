//! The semantic model consumed by the mangler.
//!
//! Parsing and type checking happen elsewhere. A host runs its checker,
//! then exposes the result through [`SemanticModel`]: a node tree with
//! per-node local symbols, a symbol table, and every identifier occurrence
//! with the symbol it resolves to. [`UnitModel`] is the plain-data
//! implementation; it round-trips through JSON so a checker in another
//! process can hand its results to the `minnow` binary.

mod builder;
mod flags;

pub use builder::UnitBuilder;
pub use flags::SymbolFlags;

use minnow_lexer::Span;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Index of a node in the model's node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a symbol in the model's symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Syntax kinds the mangler distinguishes. Everything else is reported as
/// `Statement`, `Expression` or `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    SourceFile,
    ModuleDeclaration,
    ModuleBlock,
    ClassDeclaration,
    ClassExpression,
    InterfaceDeclaration,
    EnumDeclaration,
    ObjectLiteral,
    TypeLiteral,
    TypeAlias,
    MappedType,

    FunctionDeclaration,
    FunctionExpression,
    ArrowFunction,
    Method,
    Constructor,
    GetAccessor,
    SetAccessor,
    MethodSignature,
    CallSignature,
    ConstructSignature,
    IndexSignature,
    FunctionType,
    ConstructorType,

    Block,
    CatchClause,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    CaseBlock,

    Statement,
    Expression,
    /// A kind the host could not map, carrying its own name.
    Unknown(String),
}

impl NodeKind {
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::ArrowFunction
                | NodeKind::Method
                | NodeKind::Constructor
                | NodeKind::GetAccessor
                | NodeKind::SetAccessor
                | NodeKind::MethodSignature
                | NodeKind::CallSignature
                | NodeKind::ConstructSignature
                | NodeKind::IndexSignature
                | NodeKind::FunctionType
                | NodeKind::ConstructorType
        )
    }

    /// Classes and interfaces: the containers that carry heritage clauses.
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            NodeKind::ClassDeclaration | NodeKind::ClassExpression | NodeKind::InterfaceDeclaration
        )
    }
}

/// How a variable was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    Var,
    Let,
    Const,
}

/// The declaration kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    Variable(BindingKind),
    Parameter,
    Function,
    Class,
    Interface,
    Enum,
    EnumMember,
    Method,
    Property,
    Accessor,
    Namespace,
    NamespaceImport,
    ImportBinding,
    TypeAlias,
    TypeParameter,
    Other,
}

/// A symbol as resolved by the type checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub name: String,
    pub kind: DeclKind,
    #[serde(default)]
    pub flags: SymbolFlags,
    /// The node that declares this symbol. `None` for symbols declared
    /// outside the unit (library globals, imports).
    #[serde(default)]
    pub declaration: Option<NodeId>,
    /// The declaring class, interface or enum, for members.
    #[serde(default)]
    pub parent: Option<SymbolId>,
    #[serde(default)]
    pub extends: Vec<SymbolId>,
    #[serde(default)]
    pub implements: Vec<SymbolId>,
    #[serde(default)]
    pub members: Vec<SymbolId>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: DeclKind, flags: SymbolFlags) -> Self {
        Self {
            name: name.into(),
            kind,
            flags,
            declaration: None,
            parent: None,
            extends: Vec::new(),
            implements: Vec::new(),
            members: Vec::new(),
        }
    }
}

/// A syntax node. Its id is its index in the node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Declared name, for namespaces and classes.
    #[serde(default)]
    pub name: Option<String>,
    /// Full span, including leading trivia.
    pub span: Span,
    #[serde(default)]
    pub children: Vec<NodeId>,
    /// Symbols declared directly in this node's scope, in declaration order.
    #[serde(default)]
    pub locals: Vec<SymbolId>,
    /// The symbol this node declares, if any.
    #[serde(default)]
    pub symbol: Option<SymbolId>,
}

/// One identifier occurrence in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierRef {
    /// Full start, including leading trivia.
    pub pos: u32,
    pub end: u32,
    /// Width of the trivia between `pos` and the identifier itself.
    #[serde(default)]
    pub leading_trivia: u32,
    /// Resolved symbol, or `None` for unresolved names.
    #[serde(default)]
    pub symbol: Option<SymbolId>,
}

impl IdentifierRef {
    /// Start of the identifier text, after leading trivia.
    #[inline]
    pub fn start(&self) -> u32 {
        self.pos + self.leading_trivia
    }

    /// Span of the identifier text, without trivia.
    #[inline]
    pub fn name_span(&self) -> Span {
        Span::new(self.start(), self.end)
    }
}

/// Read-only view of a type-checked unit.
pub trait SemanticModel {
    fn file_name(&self) -> &str;

    fn source_text(&self) -> &str;

    /// The source-file node.
    fn root(&self) -> NodeId;

    fn node(&self, id: NodeId) -> Option<&Node>;

    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;

    /// Every identifier occurrence, ordered by position.
    fn identifiers(&self) -> &[IdentifierRef];

    /// Diagnostics the checker reported for this unit.
    fn diagnostics(&self) -> &[Diagnostic];

    /// Whether the checker reported any errors.
    fn has_errors(&self) -> bool {
        self.diagnostics().iter().any(Diagnostic::is_error)
    }

    /// Walk from `id` up to the root, starting with `id` itself.
    fn ancestors(&self, id: NodeId) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors { model: self, next: Some(id) }
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'m, M> {
    model: &'m M,
    next: Option<NodeId>,
}

impl<'m, M: SemanticModel> Iterator for Ancestors<'m, M> {
    type Item = (NodeId, &'m Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.model.node(id)?;
        self.next = node.parent;
        Some((id, node))
    }
}

/// Errors found while validating a model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model has no nodes")]
    Empty,

    #[error("root node must be a source file, found {0:?}")]
    RootNotSourceFile(NodeKind),

    #[error("node {node} refers to missing node {missing}")]
    DanglingNode { node: u32, missing: u32 },

    #[error("node {child} is listed under node {listed} but its parent is {parent:?}")]
    ParentMismatch {
        child: u32,
        listed: u32,
        parent: Option<u32>,
    },

    #[error("span {start}..{end} of {owner} is outside the source text ({len} bytes)")]
    SpanOutOfBounds {
        owner: String,
        start: u32,
        end: u32,
        len: usize,
    },
}

/// Plain-data semantic model for one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitModel {
    pub file_name: String,
    /// Source text. May be left empty in JSON and supplied separately with
    /// [`UnitModel::with_text`].
    #[serde(default)]
    pub text: String,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub identifiers: Vec<IdentifierRef>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl UnitModel {
    /// Parse a model from JSON without validating it.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Check structural consistency: the root, node links and every span.
    /// Symbol references are not checked here; the mangler reports
    /// unknown symbols as warnings and skips them.
    pub fn validate(&mut self) -> Result<(), ModelError> {
        let root = self.nodes.first().ok_or(ModelError::Empty)?;
        if root.kind != NodeKind::SourceFile {
            return Err(ModelError::RootNotSourceFile(root.kind.clone()));
        }

        let len = self.text.len();
        let node_count = self.nodes.len() as u32;
        for (index, node) in self.nodes.iter().enumerate() {
            let index = index as u32;
            check_span(len, node.span, || format!("node {index}"))?;
            if let Some(parent) = node.parent {
                if parent.0 >= node_count {
                    return Err(ModelError::DanglingNode { node: index, missing: parent.0 });
                }
            }
            for child in &node.children {
                let Some(child_node) = self.nodes.get(child.index()) else {
                    return Err(ModelError::DanglingNode { node: index, missing: child.0 });
                };
                if child_node.parent != Some(NodeId(index)) {
                    return Err(ModelError::ParentMismatch {
                        child: child.0,
                        listed: index,
                        parent: child_node.parent.map(|p| p.0),
                    });
                }
            }
        }

        for symbol in &self.symbols {
            if let Some(declaration) = symbol.declaration {
                if declaration.0 >= node_count {
                    return Err(ModelError::DanglingNode { node: u32::MAX, missing: declaration.0 });
                }
            }
        }

        for identifier in &self.identifiers {
            check_span(len, Span::new(identifier.pos, identifier.end), || {
                "identifier".to_string()
            })?;
            if identifier.start() > identifier.end {
                return Err(ModelError::SpanOutOfBounds {
                    owner: "identifier trivia".to_string(),
                    start: identifier.start(),
                    end: identifier.end,
                    len,
                });
            }
        }
        self.identifiers.sort_by_key(|identifier| identifier.pos);
        Ok(())
    }
}

fn check_span(len: usize, span: Span, owner: impl FnOnce() -> String) -> Result<(), ModelError> {
    if span.start > span.end || span.end as usize > len {
        return Err(ModelError::SpanOutOfBounds {
            owner: owner(),
            start: span.start,
            end: span.end,
            len,
        });
    }
    Ok(())
}

impl SemanticModel for UnitModel {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn source_text(&self) -> &str {
        &self.text
    }

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    fn identifiers(&self) -> &[IdentifierRef] {
        &self.identifiers
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_model() -> UnitModel {
        UnitModel {
            file_name: "a.ts".into(),
            text: "function f() {}".into(),
            nodes: vec![
                Node {
                    kind: NodeKind::SourceFile,
                    parent: None,
                    name: None,
                    span: Span::new(0, 15),
                    children: vec![NodeId(1)],
                    locals: vec![],
                    symbol: None,
                },
                Node {
                    kind: NodeKind::FunctionDeclaration,
                    parent: Some(NodeId(0)),
                    name: None,
                    span: Span::new(0, 15),
                    children: vec![],
                    locals: vec![],
                    symbol: None,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_consistent_model() {
        let mut model = two_node_model();
        model.validate().unwrap();
        assert_eq!(model.ancestors(NodeId(1)).count(), 2);
    }

    #[test]
    fn test_validate_rejects_wrong_root() {
        let mut model = two_node_model();
        model.nodes[0].kind = NodeKind::Block;
        assert!(matches!(model.validate(), Err(ModelError::RootNotSourceFile(NodeKind::Block))));
    }

    #[test]
    fn test_validate_rejects_parent_mismatch() {
        let mut model = two_node_model();
        model.nodes[1].parent = None;
        assert!(matches!(
            model.validate(),
            Err(ModelError::ParentMismatch { child: 1, listed: 0, parent: None })
        ));
    }

    #[test]
    fn test_validate_rejects_span_past_end() {
        let mut model = two_node_model();
        model.identifiers.push(IdentifierRef { pos: 9, end: 40, leading_trivia: 0, symbol: None });
        assert!(matches!(model.validate(), Err(ModelError::SpanOutOfBounds { end: 40, .. })));
    }

    #[test]
    fn test_json_round_trip_keeps_kinds() {
        let mut model = two_node_model();
        model.nodes[1].kind = NodeKind::Unknown("Decorator".into());
        model.symbols.push(Symbol::new("f", DeclKind::Variable(BindingKind::Let), SymbolFlags::EXPORT));

        let json = model.to_json().unwrap();
        let parsed = UnitModel::from_json(&json).unwrap();
        assert_eq!(parsed, model);
    }

    #[test]
    fn test_text_can_be_supplied_separately() {
        let mut model = two_node_model();
        let text = std::mem::take(&mut model.text);
        let json = model.to_json().unwrap();
        let mut parsed = UnitModel::from_json(&json).unwrap().with_text(text);
        parsed.validate().unwrap();
        assert_eq!(parsed.source_text(), "function f() {}");
    }
}
