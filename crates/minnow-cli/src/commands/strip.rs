//! `minnow strip`: whitespace compaction without a semantic model.

use miette::Result;
use minnow_core::whitespace;
use serde::Serialize;
use std::path::Path;

use super::{emit, fail, print_json, read_source, REPORT_SCHEMA_VERSION};

#[derive(Debug, Serialize)]
struct StripReport {
    schema_version: u32,
    ok: bool,
    file: String,
    bytes_before: usize,
    bytes_after: usize,
    duration_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    notes: Vec<String>,
}

pub fn run(file: &Path, output: Option<&Path>, json: bool) -> Result<()> {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(err) => return fail(err, json),
    };

    let compacted = whitespace::compact(&source);
    tracing::info!(
        file = %file.display(),
        before = compacted.before,
        after = compacted.after,
        "stripped whitespace"
    );
    if let Err(err) = emit(&compacted.text, output, json) {
        return fail(err, json);
    }

    if json {
        let report = StripReport {
            schema_version: REPORT_SCHEMA_VERSION,
            ok: true,
            file: file.display().to_string(),
            bytes_before: compacted.before,
            bytes_after: compacted.after,
            duration_ms: compacted.elapsed.as_secs_f64() * 1000.0,
            output: output.map(|path| path.display().to_string()),
            text: output.is_none().then(|| compacted.text.clone()),
            notes: Vec::new(),
        };
        print_json(&report)?;
    }
    Ok(())
}
