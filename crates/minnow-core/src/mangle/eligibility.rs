//! Which symbols may be renamed.
//!
//! The verdict depends only on the symbol, its declaring type, the nodes
//! enclosing its declaration and the session options. Reasons are kept so
//! each decision can be traced.

use crate::config::MinifierOptions;
use crate::model::{DeclKind, NodeKind, SemanticModel, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Rename(RenameReason),
    Keep(KeepReason),
}

impl Verdict {
    pub fn is_renamable(&self) -> bool {
        matches!(self, Verdict::Rename(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameReason {
    Variable,
    Parameter,
    InternalClass,
    PrivateMember,
    InternalClassMember,
    InternalFunction,
    NamespaceImport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    NoMangle,
    /// Exported or ambient.
    External,
    /// Constructor parameter with an accessibility or `readonly` modifier;
    /// it is also a class property.
    ParameterProperty,
    InterfaceMember,
    AbstractClassMember,
    PublicMember,
    /// Member of an enum, object literal or unknown owner.
    OtherMember,
    /// Nested in a namespace other than the configured external one.
    ExternalNamespace,
    UnsupportedKind,
}

impl KeepReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeepReason::NoMangle => "no-mangle",
            KeepReason::External => "external",
            KeepReason::ParameterProperty => "parameter property",
            KeepReason::InterfaceMember => "interface member",
            KeepReason::AbstractClassMember => "abstract class member",
            KeepReason::PublicMember => "public member",
            KeepReason::OtherMember => "other member",
            KeepReason::ExternalNamespace => "outside external namespace",
            KeepReason::UnsupportedKind => "unsupported kind",
        }
    }
}

pub fn classify<M: SemanticModel>(model: &M, symbol: &Symbol, options: &MinifierOptions) -> Verdict {
    if symbol.flags.is_no_mangle() {
        return Verdict::Keep(KeepReason::NoMangle);
    }
    if symbol.flags.is_external() {
        return Verdict::Keep(KeepReason::External);
    }

    match symbol.kind {
        DeclKind::Variable(_) => Verdict::Rename(RenameReason::Variable),
        DeclKind::Parameter if symbol.flags.is_parameter_property() => {
            Verdict::Keep(KeepReason::ParameterProperty)
        }
        DeclKind::Parameter => Verdict::Rename(RenameReason::Parameter),
        DeclKind::Class => Verdict::Rename(RenameReason::InternalClass),
        DeclKind::Method | DeclKind::Property | DeclKind::Accessor => classify_member(model, symbol),
        DeclKind::Function => match &options.external_namespace {
            Some(namespace) if in_foreign_namespace(model, symbol, namespace) => {
                Verdict::Keep(KeepReason::ExternalNamespace)
            }
            _ => Verdict::Rename(RenameReason::InternalFunction),
        },
        DeclKind::NamespaceImport => Verdict::Rename(RenameReason::NamespaceImport),
        _ => Verdict::Keep(KeepReason::UnsupportedKind),
    }
}

fn classify_member<M: SemanticModel>(model: &M, member: &Symbol) -> Verdict {
    let Some(owner) = member.parent.and_then(|id| model.symbol(id)) else {
        return Verdict::Keep(KeepReason::OtherMember);
    };
    match owner.kind {
        DeclKind::Interface => Verdict::Keep(KeepReason::InterfaceMember),
        DeclKind::Class if owner.flags.is_abstract() => Verdict::Keep(KeepReason::AbstractClassMember),
        DeclKind::Class if member.flags.is_private() => Verdict::Rename(RenameReason::PrivateMember),
        DeclKind::Class if !owner.flags.is_external() => Verdict::Rename(RenameReason::InternalClassMember),
        DeclKind::Class => Verdict::Keep(KeepReason::PublicMember),
        _ => Verdict::Keep(KeepReason::OtherMember),
    }
}

/// Whether any namespace enclosing the declaration is named other than
/// `namespace`.
fn in_foreign_namespace<M: SemanticModel>(model: &M, symbol: &Symbol, namespace: &str) -> bool {
    let Some(declaration) = symbol.declaration else {
        return false;
    };
    model
        .ancestors(declaration)
        .skip(1)
        .any(|(_, node)| {
            node.kind == NodeKind::ModuleDeclaration
                && node.name.as_deref().is_some_and(|name| name != namespace)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BindingKind, SymbolFlags, SymbolId, UnitBuilder, UnitModel};

    fn verdict(model: &UnitModel, symbol: SymbolId, options: &MinifierOptions) -> Verdict {
        classify(model, model.symbol(symbol).unwrap(), options)
    }

    #[test]
    fn test_variables_and_parameters() {
        let mut b = UnitBuilder::new("e.ts", "");
        let root = b.root();
        let local = b.declare(root, "total", DeclKind::Variable(BindingKind::Const), SymbolFlags::empty());
        let var = b.declare(root, "legacy", DeclKind::Variable(BindingKind::Var), SymbolFlags::empty());
        let exported = b.declare(root, "api", DeclKind::Variable(BindingKind::Let), SymbolFlags::EXPORT);
        let pinned = b.declare(root, "keepMe", DeclKind::Variable(BindingKind::Let), SymbolFlags::NO_MANGLE);
        let param = b.declare(root, "input", DeclKind::Parameter, SymbolFlags::empty());
        let property = b.declare(root, "store", DeclKind::Parameter, SymbolFlags::PRIVATE | SymbolFlags::READONLY);
        let alias = b.declare(root, "ts", DeclKind::TypeAlias, SymbolFlags::empty());
        let model = b.build().unwrap();
        let options = MinifierOptions::default();

        assert_eq!(verdict(&model, local, &options), Verdict::Rename(RenameReason::Variable));
        assert_eq!(verdict(&model, var, &options), Verdict::Rename(RenameReason::Variable));
        assert_eq!(verdict(&model, exported, &options), Verdict::Keep(KeepReason::External));
        assert_eq!(verdict(&model, pinned, &options), Verdict::Keep(KeepReason::NoMangle));
        assert_eq!(verdict(&model, param, &options), Verdict::Rename(RenameReason::Parameter));
        assert_eq!(verdict(&model, property, &options), Verdict::Keep(KeepReason::ParameterProperty));
        assert_eq!(verdict(&model, alias, &options), Verdict::Keep(KeepReason::UnsupportedKind));
    }

    #[test]
    fn test_members_follow_their_owner() {
        let mut b = UnitBuilder::new("e.ts", "");
        let root = b.root();
        let internal = b.declare(root, "Inner", DeclKind::Class, SymbolFlags::empty());
        let public = b.declare(root, "Api", DeclKind::Class, SymbolFlags::EXPORT);
        let base = b.declare(root, "Base", DeclKind::Class, SymbolFlags::ABSTRACT);
        let contract = b.declare(root, "Shape", DeclKind::Interface, SymbolFlags::empty());

        let run = b.member(internal, root, "run", DeclKind::Method, SymbolFlags::empty());
        let api_run = b.member(public, root, "run", DeclKind::Method, SymbolFlags::empty());
        let api_secret = b.member(public, root, "secret", DeclKind::Property, SymbolFlags::PRIVATE);
        let base_secret = b.member(base, root, "secret", DeclKind::Property, SymbolFlags::PRIVATE);
        let area = b.member(contract, root, "area", DeclKind::Method, SymbolFlags::empty());
        let orphan = b.declare(root, "loose", DeclKind::Property, SymbolFlags::empty());
        let model = b.build().unwrap();
        let options = MinifierOptions::default();

        assert_eq!(verdict(&model, internal, &options), Verdict::Rename(RenameReason::InternalClass));
        assert_eq!(verdict(&model, public, &options), Verdict::Keep(KeepReason::External));
        assert_eq!(verdict(&model, run, &options), Verdict::Rename(RenameReason::InternalClassMember));
        assert_eq!(verdict(&model, api_run, &options), Verdict::Keep(KeepReason::PublicMember));
        assert_eq!(verdict(&model, api_secret, &options), Verdict::Rename(RenameReason::PrivateMember));
        assert_eq!(verdict(&model, base_secret, &options), Verdict::Keep(KeepReason::AbstractClassMember));
        assert_eq!(verdict(&model, area, &options), Verdict::Keep(KeepReason::InterfaceMember));
        assert_eq!(verdict(&model, orphan, &options), Verdict::Keep(KeepReason::OtherMember));
    }

    #[test]
    fn test_functions_in_foreign_namespaces() {
        let source = "namespace App { function a1() {} } namespace Lib { function b1() {} }";
        let mut b = UnitBuilder::new("e.ts", source);
        let root = b.root();
        let app = b.named_node(NodeKind::ModuleDeclaration, root, "App", b.braced_span("namespace App", 0).unwrap());
        let lib = b.named_node(NodeKind::ModuleDeclaration, root, "Lib", b.braced_span("namespace Lib", 0).unwrap());
        let app_fn_node = b.node(NodeKind::FunctionDeclaration, app, b.braced_span("function a1", 0).unwrap());
        let lib_fn_node = b.node(NodeKind::FunctionDeclaration, lib, b.braced_span("function b1", 0).unwrap());
        let app_fn = b.declare(app, "a1", DeclKind::Function, SymbolFlags::empty());
        let lib_fn = b.declare(lib, "b1", DeclKind::Function, SymbolFlags::empty());
        b.set_declaration(app_fn, app_fn_node);
        b.set_declaration(lib_fn, lib_fn_node);
        let model = b.build().unwrap();

        let plain = MinifierOptions::default();
        assert!(verdict(&model, app_fn, &plain).is_renamable());
        assert!(verdict(&model, lib_fn, &plain).is_renamable());

        let scoped = MinifierOptions::default().with_external_namespace("App");
        assert_eq!(verdict(&model, app_fn, &scoped), Verdict::Rename(RenameReason::InternalFunction));
        assert_eq!(verdict(&model, lib_fn, &scoped), Verdict::Keep(KeepReason::ExternalNamespace));
    }
}
