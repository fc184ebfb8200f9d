//! One minification run over one unit.

use serde::Serialize;
use tracing::{debug, info_span, warn};

use crate::codes;
use crate::config::MinifierOptions;
use crate::diagnostics::{Diagnostic, Severity};
use crate::error::Result;
use crate::mangle::{self, Rename};
use crate::model::SemanticModel;
use crate::stats::Statistics;
use crate::whitespace;

/// What a session produced for one unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinifyOutput {
    pub file_name: String,
    /// Transformed text, or `None` when emission was skipped.
    pub text: Option<String>,
    /// Whether identifier mangling ran.
    pub mangled: bool,
    /// Whether whitespace compaction ran.
    pub whitespace_removed: bool,
    pub renames: Vec<Rename>,
    pub diagnostics: Vec<Diagnostic>,
    pub statistics: Statistics,
}

impl MinifyOutput {
    pub fn emit_skipped(&self) -> bool {
        self.text.is_none()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Runs mangling and compaction with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Minifier {
    options: MinifierOptions,
}

impl Minifier {
    pub fn new(options: MinifierOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MinifierOptions {
        &self.options
    }

    /// Minify the unit described by `model`.
    ///
    /// A unit with upstream errors is not emitted: its diagnostics are
    /// returned unchanged with `text` set to `None`. A mangling invariant
    /// violation is returned as an error and no text is produced.
    pub fn minify<M: SemanticModel>(&self, model: &M) -> Result<MinifyOutput> {
        let span = info_span!("minify", file = model.file_name());
        let _guard = span.enter();

        let mut output = MinifyOutput {
            file_name: model.file_name().to_string(),
            text: None,
            mangled: false,
            whitespace_removed: false,
            renames: Vec::new(),
            diagnostics: model.diagnostics().to_vec(),
            statistics: Statistics::default(),
        };

        if model.has_errors() {
            let errors = output.diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
            warn!(errors, "unit has errors, emit skipped");
            output.diagnostics.push(Diagnostic {
                severity: Severity::Info,
                code: codes::EMIT_SKIPPED.to_string(),
                message: format!("{} has {errors} error(s); output was not emitted", model.file_name()),
                span: None,
            });
            return Ok(output);
        }

        let mut text = model.source_text().to_string();

        if self.options.mangle_identifiers {
            let outcome = mangle::mangle(model, &self.options)?;
            output.statistics.identifier_count = outcome.identifier_count;
            output.statistics.renamed_count = outcome.renamed_count;
            output.statistics.mangle_time = outcome.elapsed;
            output.diagnostics.extend(outcome.diagnostics);
            output.renames = outcome.renames;
            output.mangled = true;
            text = outcome.text;
        }

        if self.options.remove_whitespace {
            let compacted = whitespace::compact(&text);
            output.statistics.whitespace_before = compacted.before;
            output.statistics.whitespace_after = compacted.after;
            output.statistics.whitespace_time = compacted.elapsed;
            output.whitespace_removed = true;
            text = compacted.text;
        }

        debug!(bytes = text.len(), "emitted");
        output.text = Some(text);
        Ok(output)
    }
}
