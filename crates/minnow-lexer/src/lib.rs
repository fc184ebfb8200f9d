//! minnow-lexer: JavaScript/TypeScript tokenizer
//!
//! A small, allocation-free tokenizer used by the minifier's whitespace
//! compactor. It is lossless with respect to token text: every token is a
//! kind plus a byte span, and concatenating the token texts of a file gives
//! back the file minus its trivia.
//!
//! # Example
//!
//! ```
//! use minnow_lexer::{tokenize, TokenKind};
//!
//! let source = "let total = a /* sum */ + b;";
//! let tokens = tokenize(source);
//! assert_eq!(tokens[0].kind, TokenKind::Let);
//! assert_eq!(tokens[1].text(source), "total");
//! ```

mod lexer;
mod span;
mod token;

pub use lexer::{tokenize, Lexer};
pub use span::{LineIndex, Span};
pub use token::{keyword_from_str, Token, TokenKind};
