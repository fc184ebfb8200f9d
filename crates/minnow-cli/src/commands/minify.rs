//! `minnow minify`: the full pipeline over a file and its semantic model.

use miette::Result;
use minnow_core::mangle::Rename;
use minnow_core::model::UnitModel;
use minnow_core::{Diagnostic, LineIndex, Minifier, MinifierOptions, MinifyOutput, Severity, Statistics};
use serde::Serialize;
use std::path::PathBuf;

use super::{emit, fail, print_json, read_source, REPORT_SCHEMA_VERSION};

/// Arguments of `minnow minify`.
#[derive(Debug, Clone)]
pub struct MinifyAction {
    pub file: PathBuf,
    pub model: PathBuf,
    pub options: Option<PathBuf>,
    pub no_mangle: bool,
    pub no_whitespace: bool,
    pub external_namespace: Option<String>,
    pub output: Option<PathBuf>,
}

impl MinifyAction {
    /// Options file first, then flags on top.
    fn options(&self) -> minnow_core::Result<MinifierOptions> {
        let mut options = match &self.options {
            Some(path) => MinifierOptions::from_json_file(path)?,
            None => MinifierOptions::default(),
        };
        if self.no_mangle {
            options.mangle_identifiers = false;
        }
        if self.no_whitespace {
            options.remove_whitespace = false;
        }
        if let Some(namespace) = &self.external_namespace {
            options.external_namespace = Some(namespace.clone());
        }
        Ok(options)
    }

    /// Load the model and attach the file's text to it.
    fn load_model(&self) -> minnow_core::Result<UnitModel> {
        let json = read_source(&self.model)?;
        let text = read_source(&self.file)?;
        let mut model = UnitModel::from_json(&json)?.with_text(text);
        if model.file_name.is_empty() {
            model.file_name = self.file.display().to_string();
        }
        model.validate()?;
        Ok(model)
    }
}

#[derive(Debug, Serialize)]
struct MinifyReport<'a> {
    schema_version: u32,
    ok: bool,
    file: &'a str,
    emit_skipped: bool,
    mangled: bool,
    whitespace_removed: bool,
    statistics: &'a Statistics,
    renames: &'a [Rename],
    diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    notes: Vec<String>,
}

pub fn run(action: MinifyAction, json: bool) -> Result<()> {
    let prepared = action
        .options()
        .and_then(|options| Ok((options, action.load_model()?)));
    let (options, model) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return fail(err, json),
    };
    let output = match Minifier::new(options).minify(&model) {
        Ok(output) => output,
        Err(err) => return fail(err, json),
    };

    if let Some(text) = &output.text {
        if let Err(err) = emit(text, action.output.as_deref(), json) {
            return fail(err, json);
        }
    }

    if json {
        print_json(&report(&output, &action))?;
    } else {
        let lines = LineIndex::new(&model.text);
        for diagnostic in &output.diagnostics {
            eprintln!("{}", describe(&output.file_name, &lines, diagnostic));
        }
        if tracing::enabled!(tracing::Level::INFO) {
            output.statistics.report(&output.file_name);
        }
    }

    if output.emit_skipped() {
        std::process::exit(1);
    }
    Ok(())
}

fn report<'a>(output: &'a MinifyOutput, action: &MinifyAction) -> MinifyReport<'a> {
    let mut notes = Vec::new();
    if output.emit_skipped() {
        notes.push("unit has errors; no output was written".to_string());
    }
    MinifyReport {
        schema_version: REPORT_SCHEMA_VERSION,
        ok: !output.emit_skipped(),
        file: &output.file_name,
        emit_skipped: output.emit_skipped(),
        mangled: output.mangled,
        whitespace_removed: output.whitespace_removed,
        statistics: &output.statistics,
        renames: &output.renames,
        diagnostics: &output.diagnostics,
        output: action.output.as_ref().map(|path| path.display().to_string()),
        text: if action.output.is_none() { output.text.as_deref() } else { None },
        notes,
    }
}

/// `file:line:col: level: message [CODE]`, without the position when the
/// diagnostic has no span.
fn describe(file: &str, lines: &LineIndex, diagnostic: &Diagnostic) -> String {
    let level = match diagnostic.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    };
    let location = match diagnostic.span {
        Some(span) => {
            let (line, col) = lines.line_col(span.start);
            format!("{file}:{}:{}", line + 1, col + 1)
        }
        None => file.to_string(),
    };
    format!("{location}: {level}: {} [{}]", diagnostic.message, diagnostic.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minnow_core::Span;

    #[test]
    fn test_describe_with_and_without_span() {
        let lines = LineIndex::new("let a;\nlet b;\n");
        let warning = Diagnostic::warning("MANGLE_UNKNOWN_CONTAINER", "skipped").with_span(Span::new(11, 12));
        assert_eq!(
            describe("x.js", &lines, &warning),
            "x.js:2:5: warning: skipped [MANGLE_UNKNOWN_CONTAINER]"
        );
        let note = Diagnostic {
            severity: Severity::Info,
            code: "EMIT_SKIPPED".into(),
            message: "not emitted".into(),
            span: None,
        };
        assert_eq!(describe("x.js", &lines, &note), "x.js: note: not emitted [EMIT_SKIPPED]");
    }
}
