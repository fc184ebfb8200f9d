//! Diagnostics reported by a minification session.
//!
//! Recoverable problems are both logged through `tracing` and collected
//! here, so hosts that do not install a subscriber still see them.

use minnow_lexer::Span;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single diagnostic. Upstream diagnostics from the type checker use the
/// same shape and are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable code (see [`crate::codes`]) or the checker's own code.
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            message: message.into(),
            span: None,
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            message: message.into(),
            span: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Collects diagnostics for one session and mirrors them to `tracing`.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recoverable problem.
    pub fn warn(&mut self, code: &'static str, message: impl Into<String>, span: Option<Span>) {
        let message = message.into();
        tracing::warn!(code, at = ?span, "{message}");
        let mut diagnostic = Diagnostic::warning(code, message);
        diagnostic.span = span;
        self.diagnostics.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;

    #[test]
    fn test_sink_collects_warnings() {
        let mut sink = DiagnosticSink::new();
        sink.warn(codes::MANGLE_MISSING_SYMBOL, "symbol 7 not found", Some(Span::new(3, 9)));
        assert_eq!(sink.len(), 1);

        let diagnostics = sink.into_vec();
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].code, codes::MANGLE_MISSING_SYMBOL);
        assert_eq!(diagnostics[0].span, Some(Span::new(3, 9)));
        assert!(!diagnostics[0].is_error());
    }

    #[test]
    fn test_diagnostic_json_shape() {
        let diagnostic = Diagnostic::error("TS2304", "Cannot find name 'x'.");
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["code"], "TS2304");
        assert!(json.get("span").is_none());
    }
}
