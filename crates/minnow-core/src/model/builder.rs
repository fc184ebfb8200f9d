//! Incremental construction of a [`UnitModel`].
//!
//! Hosts that walk their own checker output, and tests that describe a unit
//! by hand, build a model here instead of assembling the tables directly.
//! The builder keeps node/child and symbol/member links consistent; the
//! text-search helpers locate spans by pattern so hand-written fixtures do
//! not hard-code byte offsets.

use minnow_lexer::Span;

use super::{
    DeclKind, IdentifierRef, ModelError, Node, NodeId, NodeKind, Symbol, SymbolFlags, SymbolId,
    UnitModel,
};
use crate::diagnostics::Diagnostic;

pub struct UnitBuilder {
    model: UnitModel,
}

impl UnitBuilder {
    /// Start a model whose root source-file node spans all of `text`.
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let root = Node {
            kind: NodeKind::SourceFile,
            parent: None,
            name: None,
            span: Span::new(0, text.len() as u32),
            children: Vec::new(),
            locals: Vec::new(),
            symbol: None,
        };
        Self {
            model: UnitModel {
                file_name: file_name.into(),
                text,
                nodes: vec![root],
                ..Default::default()
            },
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn text(&self) -> &str {
        &self.model.text
    }

    /// Add a child node under `parent`.
    pub fn node(&mut self, kind: NodeKind, parent: NodeId, span: Span) -> NodeId {
        let id = NodeId(self.model.nodes.len() as u32);
        self.model.nodes.push(Node {
            kind,
            parent: Some(parent),
            name: None,
            span,
            children: Vec::new(),
            locals: Vec::new(),
            symbol: None,
        });
        if let Some(parent) = self.model.nodes.get_mut(parent.index()) {
            parent.children.push(id);
        }
        id
    }

    /// Add a named child node (namespaces, classes).
    pub fn named_node(
        &mut self,
        kind: NodeKind,
        parent: NodeId,
        name: impl Into<String>,
        span: Span,
    ) -> NodeId {
        let id = self.node(kind, parent, span);
        self.model.nodes[id.index()].name = Some(name.into());
        id
    }

    /// Add a symbol that is not a local of any node, such as a library
    /// global or an imported class.
    pub fn symbol(&mut self, name: impl Into<String>, kind: DeclKind, flags: SymbolFlags) -> SymbolId {
        let id = SymbolId(self.model.symbols.len() as u32);
        self.model.symbols.push(Symbol::new(name, kind, flags));
        id
    }

    /// Add a symbol declared in the scope of `scope`.
    pub fn declare(
        &mut self,
        scope: NodeId,
        name: impl Into<String>,
        kind: DeclKind,
        flags: SymbolFlags,
    ) -> SymbolId {
        let id = self.symbol(name, kind, flags);
        if let Some(node) = self.model.nodes.get_mut(scope.index()) {
            node.locals.push(id);
        }
        id
    }

    /// Add a member of `owner` declared in the scope of the owner's node.
    pub fn member(
        &mut self,
        owner: SymbolId,
        scope: NodeId,
        name: impl Into<String>,
        kind: DeclKind,
        flags: SymbolFlags,
    ) -> SymbolId {
        let id = self.declare(scope, name, kind, flags);
        self.add_member(owner, id);
        id
    }

    pub fn add_member(&mut self, owner: SymbolId, member: SymbolId) {
        if let Some(symbol) = self.model.symbols.get_mut(member.index()) {
            symbol.parent = Some(owner);
        }
        if let Some(symbol) = self.model.symbols.get_mut(owner.index()) {
            symbol.members.push(member);
        }
    }

    /// Link a symbol and the node that declares it.
    pub fn set_declaration(&mut self, symbol: SymbolId, node: NodeId) {
        if let Some(entry) = self.model.symbols.get_mut(symbol.index()) {
            entry.declaration = Some(node);
        }
        if let Some(entry) = self.model.nodes.get_mut(node.index()) {
            entry.symbol = Some(symbol);
        }
    }

    pub fn extends(&mut self, derived: SymbolId, base: SymbolId) {
        if let Some(symbol) = self.model.symbols.get_mut(derived.index()) {
            symbol.extends.push(base);
        }
    }

    pub fn implements(&mut self, class: SymbolId, contract: SymbolId) {
        if let Some(symbol) = self.model.symbols.get_mut(class.index()) {
            symbol.implements.push(contract);
        }
    }

    /// Record an occurrence of `symbol` whose name starts at `start`.
    pub fn reference(&mut self, symbol: SymbolId, start: u32) {
        let len = self
            .model
            .symbols
            .get(symbol.index())
            .map_or(0, |s| s.name.len() as u32);
        self.occurrence(IdentifierRef {
            pos: start,
            end: start + len,
            leading_trivia: 0,
            symbol: Some(symbol),
        });
    }

    /// Record an occurrence with explicit full start and trivia width.
    pub fn occurrence(&mut self, identifier: IdentifierRef) {
        self.model.identifiers.push(identifier);
    }

    /// Record an identifier that did not resolve to any symbol.
    pub fn unresolved(&mut self, start: u32, len: u32) {
        self.occurrence(IdentifierRef {
            pos: start,
            end: start + len,
            leading_trivia: 0,
            symbol: None,
        });
    }

    /// Record every whole-word occurrence of the symbol's name inside
    /// `within`. Returns how many were found.
    pub fn references_in(&mut self, symbol: SymbolId, within: Span) -> usize {
        let Some(name) = self.model.symbols.get(symbol.index()).map(|s| s.name.clone()) else {
            return 0;
        };
        let starts = word_occurrences(&self.model.text, &name, within);
        let count = starts.len();
        for start in starts {
            self.reference(symbol, start);
        }
        count
    }

    /// Record every whole-word occurrence in the whole text.
    pub fn references(&mut self, symbol: SymbolId) -> usize {
        let all = Span::new(0, self.model.text.len() as u32);
        self.references_in(symbol, all)
    }

    /// Record every whole-word occurrence of `name` as unresolved.
    pub fn unresolved_all(&mut self, name: &str) -> usize {
        let all = Span::new(0, self.model.text.len() as u32);
        let starts = word_occurrences(&self.model.text, name, all);
        let count = starts.len();
        for start in starts {
            self.unresolved(start, name.len() as u32);
        }
        count
    }

    pub fn diagnostic(&mut self, diagnostic: Diagnostic) {
        self.model.diagnostics.push(diagnostic);
    }

    /// Byte offset of the `nth` (0-based) occurrence of `needle`.
    pub fn find(&self, needle: &str, nth: usize) -> Option<u32> {
        self.model
            .text
            .match_indices(needle)
            .nth(nth)
            .map(|(offset, _)| offset as u32)
    }

    /// Span from the `nth` occurrence of `needle` through the brace that
    /// closes the first `{` after it.
    pub fn braced_span(&self, needle: &str, nth: usize) -> Option<Span> {
        let start = self.find(needle, nth)?;
        let bytes = self.model.text.as_bytes();
        let open = start as usize + self.model.text[start as usize..].find('{')?;
        let mut depth = 0usize;
        for (offset, byte) in bytes.iter().enumerate().skip(open) {
            match byte {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(Span::new(start, offset as u32 + 1));
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Validate and return the model.
    pub fn build(mut self) -> Result<UnitModel, ModelError> {
        self.model.validate()?;
        Ok(self.model)
    }
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$' || byte >= 0x80
}

fn word_occurrences(text: &str, word: &str, within: Span) -> Vec<u32> {
    let Some(region) = within.text(text) else {
        return Vec::new();
    };
    let bytes = text.as_bytes();
    region
        .match_indices(word)
        .map(|(offset, _)| within.start as usize + offset)
        .filter(|&start| {
            let end = start + word.len();
            let before = start.checked_sub(1).map(|i| bytes[i]);
            let after = bytes.get(end).copied();
            !before.is_some_and(is_ident_byte) && !after.is_some_and(is_ident_byte)
        })
        .map(|start| start as u32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BindingKind, SemanticModel};

    #[test]
    fn test_builder_links_nodes_and_symbols() {
        let mut b = UnitBuilder::new("a.ts", "class Box { size = 1 }");
        let span = b.braced_span("class Box", 0).unwrap();
        let class_node = b.named_node(NodeKind::ClassDeclaration, b.root(), "Box", span);
        let class = b.declare(b.root(), "Box", DeclKind::Class, SymbolFlags::empty());
        b.set_declaration(class, class_node);
        let size = b.member(class, class_node, "size", DeclKind::Property, SymbolFlags::empty());
        assert_eq!(b.references(class), 1);
        assert_eq!(b.references(size), 1);

        let model = b.build().unwrap();
        assert_eq!(model.node(model.root()).unwrap().children, vec![class_node]);
        assert_eq!(model.node(class_node).unwrap().symbol, Some(class));
        assert_eq!(model.symbol(size).unwrap().parent, Some(class));
        assert_eq!(model.symbol(class).unwrap().members, vec![size]);
        assert_eq!(span, Span::new(0, 22));
    }

    #[test]
    fn test_references_match_whole_words_only() {
        let mut b = UnitBuilder::new("a.ts", "let item = items[0] + item_2 + item;");
        let item = b.declare(b.root(), "item", DeclKind::Variable(BindingKind::Let), SymbolFlags::empty());
        assert_eq!(b.references(item), 2);

        let model = b.build().unwrap();
        let starts: Vec<u32> = model.identifiers().iter().map(|i| i.start()).collect();
        assert_eq!(starts, vec![4, 31]);
    }

    #[test]
    fn test_braced_span_skips_nested_blocks() {
        let b = UnitBuilder::new("a.ts", "function f() { if (x) { y(); } } f();");
        assert_eq!(b.braced_span("function f", 0), Some(Span::new(0, 32)));
        assert_eq!(b.braced_span("nothing", 0), None);
    }
}
