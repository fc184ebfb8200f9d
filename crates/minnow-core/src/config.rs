use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Options for one minification session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinifierOptions {
    /// Shorten identifiers that are private to the unit.
    pub mangle_identifiers: bool,

    /// Re-space the output from its token stream.
    pub remove_whitespace: bool,

    /// When set, non-exported functions nested in a namespace with a
    /// different name keep their names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_namespace: Option<String>,
}

impl Default for MinifierOptions {
    fn default() -> Self {
        Self {
            mangle_identifiers: true,
            remove_whitespace: true,
            external_namespace: None,
        }
    }
}

impl MinifierOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mangle_identifiers(mut self, mangle: bool) -> Self {
        self.mangle_identifiers = mangle;
        self
    }

    #[must_use]
    pub fn with_remove_whitespace(mut self, remove: bool) -> Self {
        self.remove_whitespace = remove;
        self
    }

    #[must_use]
    pub fn with_external_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.external_namespace = Some(namespace.into());
        self
    }

    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| Error::OptionsParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
