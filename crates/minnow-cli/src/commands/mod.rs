//! Subcommand implementations.

pub mod minify;
pub mod strip;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::Path;

/// Version of the JSON reports printed with `--json`.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Error object embedded in JSON reports.
#[derive(Debug, Serialize)]
pub struct ErrorJson {
    pub code: String,
    pub message: String,
}

/// Report printed when a command fails before producing output.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub schema_version: u32,
    pub ok: bool,
    pub error: ErrorJson,
    pub notes: Vec<String>,
}

impl ErrorReport {
    pub fn new(err: &minnow_core::Error) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            ok: false,
            error: ErrorJson {
                code: err.code().to_string(),
                message: err.to_string(),
            },
            notes: Vec::new(),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

/// Print a failure as JSON and exit, or hand it to miette.
pub fn fail(err: minnow_core::Error, json: bool) -> Result<()> {
    if json {
        print_json(&ErrorReport::new(&err))?;
        std::process::exit(1);
    }
    Err(miette::miette!(code = err.code(), "{err}"))
}

pub fn read_source(path: &Path) -> std::result::Result<String, minnow_core::Error> {
    std::fs::read_to_string(path).map_err(|source| minnow_core::Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `text` to `output`, or to stdout when no path is given and no
/// JSON report owns stdout.
pub fn emit(text: &str, output: Option<&Path>, json: bool) -> std::result::Result<(), minnow_core::Error> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None if !json => print!("{text}"),
        None => {}
    }
    Ok(())
}
