//! Identifier mangling.
//!
//! Shortens every identifier that is provably private to the unit while
//! keeping each byte offset of the text unchanged: a short name is written
//! over the original and padded with spaces.
//!
//! The pass runs in four steps:
//!
//! 1. [`container`] builds the scope graph and the identifier registry;
//! 2. `heritage` fixes member names that inheritance makes visible;
//! 3. `renamer` assigns names, container by container, using
//!    [`eligibility`] and the per-container exclusion sets;
//! 4. [`patch`] rewrites the text.

pub mod container;
pub mod eligibility;
pub(crate) mod exclusion;
pub(crate) mod heritage;
pub mod names;
pub mod patch;
pub mod registry;
pub(crate) mod renamer;

use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

use crate::codes;
use crate::config::MinifierOptions;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::{SemanticModel, SymbolId};

/// Failures that abort mangling. The unit is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MangleError {
    #[error("generated name `{candidate}` is longer than `{original}`")]
    NameTooLong { original: String, candidate: String },

    #[error("expected `{expected}` at offset {offset}, found `{found}`")]
    OccurrenceMismatch {
        expected: String,
        offset: u32,
        found: String,
    },

    #[error("occurrence {start}..{end} is outside the text ({len} bytes)")]
    OccurrenceOutOfBounds { start: u32, end: u32, len: usize },
}

impl MangleError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NameTooLong { .. } => codes::MANGLE_NAME_TOO_LONG,
            Self::OccurrenceMismatch { .. } => codes::MANGLE_OCCURRENCE_MISMATCH,
            Self::OccurrenceOutOfBounds { .. } => codes::MANGLE_OCCURRENCE_OUT_OF_BOUNDS,
        }
    }
}

/// One symbol that received a shorter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rename {
    pub symbol: SymbolId,
    pub original: String,
    pub short_name: String,
}

/// Result of mangling one unit.
#[derive(Debug, Clone)]
pub struct MangleOutcome {
    /// Rewritten text, byte-for-byte the length of the input.
    pub text: String,
    /// Renamed symbols in registry order.
    pub renames: Vec<Rename>,
    /// Records considered.
    pub identifier_count: usize,
    pub renamed_count: usize,
    pub elapsed: Duration,
    pub diagnostics: Vec<Diagnostic>,
}

/// Mangles one unit described by a semantic model.
pub struct ManglerSession<'m, M> {
    model: &'m M,
    options: &'m MinifierOptions,
    sink: DiagnosticSink,
}

impl<'m, M: SemanticModel> ManglerSession<'m, M> {
    pub fn new(model: &'m M, options: &'m MinifierOptions) -> Self {
        Self {
            model,
            options,
            sink: DiagnosticSink::new(),
        }
    }

    pub fn run(mut self) -> Result<MangleOutcome, MangleError> {
        let start = Instant::now();
        let model = self.model;

        let mut collected = container::collect(model, &mut self.sink);
        heritage::analyze(model, &mut collected.graph, &mut self.sink);

        let patcher = renamer::Renamer::new(
            model,
            self.options,
            &mut collected.graph,
            &mut collected.registry,
            &collected.free_names,
        )
        .run()?;
        debug!(edits = patcher.edits().len(), "applying edits");
        let text = patcher.apply();

        let renames: Vec<Rename> = collected
            .registry
            .iter()
            .filter(|record| record.is_renamed())
            .map(|record| Rename {
                symbol: record.symbol,
                original: record.name.clone(),
                short_name: record.effective_name().to_string(),
            })
            .collect();

        let outcome = MangleOutcome {
            text,
            identifier_count: collected.registry.len(),
            renamed_count: renames.len(),
            renames,
            elapsed: start.elapsed(),
            diagnostics: self.sink.into_vec(),
        };
        info!(
            file = model.file_name(),
            identifiers = outcome.identifier_count,
            renamed = outcome.renamed_count,
            elapsed_ms = outcome.elapsed.as_secs_f64() * 1000.0,
            "mangled identifiers"
        );
        Ok(outcome)
    }
}

/// Mangle one unit with the given options.
pub fn mangle<M: SemanticModel>(model: &M, options: &MinifierOptions) -> Result<MangleOutcome, MangleError> {
    ManglerSession::new(model, options).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = MangleError::NameTooLong {
            original: "ab".into(),
            candidate: "abc".into(),
        };
        assert_eq!(err.code(), codes::MANGLE_NAME_TOO_LONG);
        assert_eq!(err.to_string(), "generated name `abc` is longer than `ab`");

        let err = MangleError::OccurrenceOutOfBounds { start: 1, end: 9, len: 4 };
        assert_eq!(err.code(), codes::MANGLE_OCCURRENCE_OUT_OF_BOUNDS);
    }
}
