//! Token types for JavaScript and TypeScript.
//!
//! Tokens carry only a kind and a span. Their text is always read back from
//! the source, so a token stream can be re-emitted byte for byte.

use crate::span::Span;

/// A token with its kind and source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Source text of this token.
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source).unwrap_or("")
    }
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===
    /// Identifier: `foo`, `_bar`, `$baz`, `ünïcode`
    Identifier,
    /// String literal: `"hello"`, `'world'`
    String,
    /// Number literal: `42`, `3.14`, `0xff`, `.5`
    Number,
    /// BigInt literal: `42n`
    BigInt,
    /// Regular expression: `/pattern/flags`
    Regex,
    /// Template literal without substitutions
    TemplateNoSub,
    /// Template head: `` `hello ${``
    TemplateHead,
    /// Template middle: `} middle ${`
    TemplateMiddle,
    /// Template tail: `` } end` ``
    TemplateTail,

    // === Keywords ===
    // Declarations
    Var,
    Let,
    Const,
    Function,
    Class,

    // Control flow
    If,
    Else,
    Switch,
    Case,
    Default,
    For,
    While,
    Do,
    Break,
    Continue,
    Return,

    // Exception handling
    Try,
    Catch,
    Finally,
    Throw,

    // Operators as keywords
    New,
    Delete,
    Typeof,
    Void,
    In,
    Instanceof,

    // Values
    This,
    Super,
    Null,
    True,
    False,

    // Modules
    Import,
    Export,
    From,
    As,

    // Async
    Async,
    Await,

    // Generators
    Yield,

    // Class modifiers
    Static,
    Get,
    Set,
    Extends,

    // Other
    With,
    Debugger,

    // TypeScript
    Type,
    Interface,
    Enum,
    Namespace,
    Module,
    Declare,
    Abstract,
    Private,
    Protected,
    Public,
    Readonly,
    Override,
    Implements,
    Is,
    Keyof,
    Infer,
    Never,
    Unknown,
    Any,
    Asserts,
    Satisfies,

    // === Punctuation ===
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]

    Semicolon,  // ;
    Comma,      // ,
    Colon,      // :
    Dot,        // .
    Question,   // ?
    At,         // @
    Hash,       // #

    Arrow,      // =>
    Spread,     // ...
    QuestionDot, // ?.

    // === Operators ===
    // Assignment
    Eq,         // =
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    StarStarEq, // **=
    AmpEq,      // &=
    PipeEq,     // |=
    CaretEq,    // ^=
    LtLtEq,     // <<=
    GtGtEq,     // >>=
    GtGtGtEq,   // >>>=
    AmpAmpEq,   // &&=
    PipePipeEq, // ||=
    QuestionQuestionEq, // ??=

    // Comparison
    EqEq,       // ==
    EqEqEq,     // ===
    BangEq,     // !=
    BangEqEq,   // !==
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=

    // Arithmetic
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    StarStar,   // **
    PlusPlus,   // ++
    MinusMinus, // --

    // Bitwise
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    Tilde,      // ~
    LtLt,       // <<
    GtGt,       // >>
    GtGtGt,     // >>>

    // Logical
    AmpAmp,     // &&
    PipePipe,   // ||
    Bang,       // !
    QuestionQuestion, // ??

    // === Special ===
    /// End of file
    Eof,
    /// Bytes the lexer could not classify, or an unterminated literal.
    Invalid,
}

impl TokenKind {
    /// Check if this is a reserved or contextual keyword.
    pub fn is_keyword(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Var | Let | Const | Function | Class | If | Else | Switch | Case | Default | For
                | While | Do | Break | Continue | Return | Try | Catch | Finally | Throw | New
                | Delete | Typeof | Void | In | Instanceof | This | Super | Null | True | False
                | Import | Export | From | As | Async | Await | Yield | Static | Get | Set
                | Extends | With | Debugger | Type | Interface | Enum | Namespace | Module
                | Declare | Abstract | Private | Protected | Public | Readonly | Override
                | Implements | Is | Keyof | Infer | Never | Unknown | Any | Asserts | Satisfies
        )
    }

    /// Tokens made of identifier characters. Two of these in a row need a
    /// separator or they fuse into one token.
    pub fn is_word_like(&self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::Number | TokenKind::BigInt)
            || self.is_keyword()
    }

    /// Check if this token can close an expression. A `/` after such a token
    /// is division; anywhere else it starts a regular expression.
    pub fn ends_expression(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Identifier
                | String
                | Number
                | BigInt
                | Regex
                | TemplateNoSub
                | TemplateTail
                | RParen
                | RBracket
                | RBrace
                | This
                | Super
                | Null
                | True
                | False
                | PlusPlus
                | MinusMinus
                // Contextual keywords that are usually plain identifiers.
                | From
                | As
                | Async
                | Get
                | Set
                | Static
                | Type
                | Namespace
                | Module
                | Declare
                | Abstract
                | Private
                | Protected
                | Public
                | Readonly
                | Override
                | Is
                | Infer
                | Never
                | Unknown
                | Any
                | Asserts
                | Satisfies
        )
    }
}

/// Look up a keyword from an identifier string.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    let kind = match s {
        "var" => TokenKind::Var,
        "let" => TokenKind::Let,
        "const" => TokenKind::Const,
        "function" => TokenKind::Function,
        "class" => TokenKind::Class,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "return" => TokenKind::Return,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "finally" => TokenKind::Finally,
        "throw" => TokenKind::Throw,
        "new" => TokenKind::New,
        "delete" => TokenKind::Delete,
        "typeof" => TokenKind::Typeof,
        "void" => TokenKind::Void,
        "in" => TokenKind::In,
        "instanceof" => TokenKind::Instanceof,
        "this" => TokenKind::This,
        "super" => TokenKind::Super,
        "null" => TokenKind::Null,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "import" => TokenKind::Import,
        "export" => TokenKind::Export,
        "from" => TokenKind::From,
        "as" => TokenKind::As,
        "async" => TokenKind::Async,
        "await" => TokenKind::Await,
        "yield" => TokenKind::Yield,
        "static" => TokenKind::Static,
        "get" => TokenKind::Get,
        "set" => TokenKind::Set,
        "extends" => TokenKind::Extends,
        "with" => TokenKind::With,
        "debugger" => TokenKind::Debugger,

        "type" => TokenKind::Type,
        "interface" => TokenKind::Interface,
        "enum" => TokenKind::Enum,
        "namespace" => TokenKind::Namespace,
        "module" => TokenKind::Module,
        "declare" => TokenKind::Declare,
        "abstract" => TokenKind::Abstract,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "public" => TokenKind::Public,
        "readonly" => TokenKind::Readonly,
        "override" => TokenKind::Override,
        "implements" => TokenKind::Implements,
        "is" => TokenKind::Is,
        "keyof" => TokenKind::Keyof,
        "infer" => TokenKind::Infer,
        "never" => TokenKind::Never,
        "unknown" => TokenKind::Unknown,
        "any" => TokenKind::Any,
        "asserts" => TokenKind::Asserts,
        "satisfies" => TokenKind::Satisfies,

        _ => return None,
    };
    Some(kind)
}
