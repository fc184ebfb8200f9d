//! minnow-core: identifier mangling and whitespace compaction for
//! TypeScript compiler output.
//!
//! The crate consumes a [`model::SemanticModel`] (a flat symbol table plus
//! a node tree, produced by whatever type checker the host runs) and
//! rewrites the unit's text in place:
//!
//! 1. [`mangle`] shortens every identifier that is provably private to the
//!    unit, without ever changing a byte offset;
//! 2. [`whitespace`] re-spaces the result from its token stream.
//!
//! [`session::Minifier`] runs both for one unit.

pub mod codes;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod mangle;
pub mod model;
pub mod session;
pub mod stats;
pub mod whitespace;

pub use config::MinifierOptions;
pub use diagnostics::{Diagnostic, Severity};
pub use error::{Error, Result};
pub use minnow_lexer::{LineIndex, Span};
pub use session::{Minifier, MinifyOutput};
pub use stats::Statistics;
