//! Stable diagnostic codes.
//!
//! All codes are SCREAMING_SNAKE_CASE and stable across versions.

/// A node kind the container table does not recognize reported locals.
pub const MANGLE_UNKNOWN_CONTAINER: &str = "MANGLE_UNKNOWN_CONTAINER";

/// A local or identifier refers to a symbol the model does not contain.
pub const MANGLE_MISSING_SYMBOL: &str = "MANGLE_MISSING_SYMBOL";

/// An `extends`/`implements` target could not be resolved.
pub const MANGLE_UNRESOLVED_HERITAGE: &str = "MANGLE_UNRESOLVED_HERITAGE";

/// A generated name was longer than the name it replaces.
pub const MANGLE_NAME_TOO_LONG: &str = "MANGLE_NAME_TOO_LONG";

/// The source text at an occurrence did not match the symbol name.
pub const MANGLE_OCCURRENCE_MISMATCH: &str = "MANGLE_OCCURRENCE_MISMATCH";

/// An occurrence span points outside the source text.
pub const MANGLE_OCCURRENCE_OUT_OF_BOUNDS: &str = "MANGLE_OCCURRENCE_OUT_OF_BOUNDS";

/// Emission skipped because the unit has upstream errors.
pub const EMIT_SKIPPED: &str = "EMIT_SKIPPED";

/// Semantic model failed validation.
pub const MODEL_INVALID: &str = "MODEL_INVALID";

/// Options file failed to parse.
pub const OPTIONS_INVALID: &str = "OPTIONS_INVALID";

/// File could not be read or written.
pub const IO_ERROR: &str = "IO_ERROR";
