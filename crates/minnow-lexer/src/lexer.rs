//! Lexer (tokenizer) for JavaScript and TypeScript.
//!
//! The lexer turns source text into a stream of tokens and drops all
//! trivia (whitespace and comments). Regex-vs-division is decided from the
//! previous token, and template literals are tracked through nested
//! `${ ... }` substitutions so that the text after a closing `}` is scanned
//! as template content rather than code.

use crate::span::Span;
use crate::token::{keyword_from_str, Token, TokenKind};

/// The lexer state.
#[derive(Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    /// Source code as bytes (for fast indexing).
    bytes: &'a [u8],
    /// Current byte position.
    pos: usize,
    /// Start position of the current token.
    token_start: usize,
    /// Whether the previous token allows a regex to follow.
    /// This disambiguates `/regex/` vs `a / b`.
    allow_regex: bool,
    /// One entry per open `{` or `${`; `true` marks a template substitution.
    braces: Vec<bool>,
    /// Leading `#!` line, if any.
    hashbang: Option<Span>,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            token_start: 0,
            allow_regex: true,
            braces: Vec::new(),
            hashbang: None,
            done: false,
        };
        if source.starts_with("#!") {
            while !lexer.is_eof() && !matches!(lexer.current(), b'\n' | b'\r') {
                lexer.advance();
            }
            lexer.hashbang = Some(Span::new(0, lexer.pos as u32));
        }
        lexer
    }

    /// Get the current byte position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The `#!` line at the top of the file. It is not part of the token
    /// stream.
    pub fn hashbang(&self) -> Option<Span> {
        self.hashbang
    }

    /// Get the next token. Returns `Eof` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.token_start = self.pos;

        if self.is_eof() {
            return self.make_token(TokenKind::Eof);
        }

        let ch = self.current();
        let kind = match ch {
            // Identifiers and keywords
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | b'\\' => self.scan_identifier(),
            0x80..=0xff => self.scan_identifier(),

            // Numbers
            b'0'..=b'9' => self.scan_number(),

            // Strings
            b'"' | b'\'' => self.scan_string(ch),

            // Template literals
            b'`' => {
                self.advance();
                let kind = self.scan_template(true);
                if kind == TokenKind::TemplateHead {
                    self.braces.push(true);
                }
                kind
            }

            b'{' => {
                self.advance();
                self.braces.push(false);
                TokenKind::LBrace
            }
            b'}' => {
                self.advance();
                if self.braces.pop() == Some(true) {
                    let kind = self.scan_template(false);
                    if kind == TokenKind::TemplateMiddle {
                        self.braces.push(true);
                    }
                    kind
                } else {
                    TokenKind::RBrace
                }
            }

            // Punctuation and operators
            b'(' => { self.advance(); TokenKind::LParen }
            b')' => { self.advance(); TokenKind::RParen }
            b'[' => { self.advance(); TokenKind::LBracket }
            b']' => { self.advance(); TokenKind::RBracket }
            b';' => { self.advance(); TokenKind::Semicolon }
            b',' => { self.advance(); TokenKind::Comma }
            b':' => { self.advance(); TokenKind::Colon }
            b'@' => { self.advance(); TokenKind::At }
            b'#' => { self.advance(); TokenKind::Hash }
            b'~' => { self.advance(); TokenKind::Tilde }

            b'.' => self.scan_dot(),
            b'?' => self.scan_question(),
            b'+' => self.scan_plus(),
            b'-' => self.scan_minus(),
            b'*' => self.scan_star(),
            b'/' => self.scan_slash(),
            b'%' => self.scan_percent(),
            b'=' => self.scan_equals(),
            b'!' => self.scan_bang(),
            b'<' => self.scan_less_than(),
            b'>' => self.scan_greater_than(),
            b'&' => self.scan_ampersand(),
            b'|' => self.scan_pipe(),
            b'^' => self.scan_caret(),

            _ => {
                self.advance_char();
                TokenKind::Invalid
            }
        };

        self.allow_regex = !kind.ends_expression();
        self.make_token(kind)
    }

    // === Helper methods ===

    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn current(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_char(&self) -> u8 {
        self.bytes.get(self.pos + 1).copied().unwrap_or(0)
    }

    fn current_char(&self) -> Option<char> {
        self.source.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    /// Step over one whole character so `pos` stays on a UTF-8 boundary.
    fn advance_char(&mut self) {
        match self.current_char() {
            Some(c) => self.pos += c.len_utf8(),
            None => self.pos += 1,
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.token_start as u32, self.pos as u32))
    }

    fn token_slice(&self) -> &'a str {
        self.source.get(self.token_start..self.pos).unwrap_or("")
    }

    // === Whitespace and comments ===

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current() {
                b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c => self.advance(),
                b'/' if self.peek_char() == b'/' => self.skip_line_comment(),
                b'/' if self.peek_char() == b'*' => self.skip_block_comment(),
                0x80..=0xff => match self.current_char() {
                    Some(c) if is_unicode_space(c) => self.pos += c.len_utf8(),
                    _ => break,
                },
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        self.advance_n(2);
        while !self.is_eof() && !matches!(self.current(), b'\n' | b'\r') {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance_n(2);
        while !self.is_eof() {
            if self.current() == b'*' && self.peek_char() == b'/' {
                self.advance_n(2);
                return;
            }
            self.advance();
        }
    }

    // === Token scanning ===

    fn scan_identifier(&mut self) -> TokenKind {
        let mut escaped = false;
        while !self.is_eof() {
            match self.current() {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$' => self.advance(),
                b'\\' => {
                    escaped = true;
                    self.advance();
                    if self.current() == b'u' {
                        self.advance();
                        if self.current() == b'{' {
                            while !self.is_eof() && self.current() != b'}' {
                                self.advance();
                            }
                            self.advance();
                        }
                    }
                }
                0x80..=0xff => match self.current_char() {
                    Some(c) if !is_unicode_space(c) => self.pos += c.len_utf8(),
                    _ => break,
                },
                _ => break,
            }
        }

        if self.pos == self.token_start {
            self.advance_char();
            return TokenKind::Invalid;
        }
        if escaped {
            return TokenKind::Identifier;
        }
        keyword_from_str(self.token_slice()).unwrap_or(TokenKind::Identifier)
    }

    fn scan_number(&mut self) -> TokenKind {
        if self.current() == b'0' {
            match self.peek_char() {
                b'x' | b'X' => return self.scan_radix_number(|b| b.is_ascii_hexdigit()),
                b'b' | b'B' => return self.scan_radix_number(|b| matches!(b, b'0' | b'1')),
                b'o' | b'O' => return self.scan_radix_number(|b| matches!(b, b'0'..=b'7')),
                _ => {}
            }
        }

        self.skip_digits();

        if self.current() == b'.' {
            self.advance();
            self.skip_digits();
        }

        if matches!(self.current(), b'e' | b'E') {
            self.advance();
            if matches!(self.current(), b'+' | b'-') {
                self.advance();
            }
            self.skip_digits();
        }

        if self.current() == b'n' {
            self.advance();
            return TokenKind::BigInt;
        }

        TokenKind::Number
    }

    fn skip_digits(&mut self) {
        while self.current().is_ascii_digit() || self.current() == b'_' {
            self.advance();
        }
    }

    fn scan_radix_number(&mut self, is_digit: fn(u8) -> bool) -> TokenKind {
        self.advance_n(2);
        while is_digit(self.current()) || self.current() == b'_' {
            self.advance();
        }
        if self.current() == b'n' {
            self.advance();
            return TokenKind::BigInt;
        }
        TokenKind::Number
    }

    fn scan_string(&mut self, quote: u8) -> TokenKind {
        self.advance();
        while !self.is_eof() {
            match self.current() {
                c if c == quote => {
                    self.advance();
                    return TokenKind::String;
                }
                b'\\' => {
                    self.advance();
                    // A CRLF line continuation counts as one escaped break.
                    if self.current() == b'\r' && self.peek_char() == b'\n' {
                        self.advance();
                    }
                    if !self.is_eof() {
                        self.advance();
                    }
                }
                b'\n' | b'\r' => break,
                _ => self.advance(),
            }
        }
        TokenKind::Invalid
    }

    /// Scan template characters up to the closing backtick or the next
    /// `${`. `head` is true when the template was opened by a backtick and
    /// false when resuming after a substitution's `}`.
    fn scan_template(&mut self, head: bool) -> TokenKind {
        while !self.is_eof() {
            match self.current() {
                b'`' => {
                    self.advance();
                    return if head {
                        TokenKind::TemplateNoSub
                    } else {
                        TokenKind::TemplateTail
                    };
                }
                b'$' if self.peek_char() == b'{' => {
                    self.advance_n(2);
                    return if head {
                        TokenKind::TemplateHead
                    } else {
                        TokenKind::TemplateMiddle
                    };
                }
                b'\\' => {
                    self.advance();
                    if !self.is_eof() {
                        self.advance();
                    }
                }
                _ => self.advance(),
            }
        }

        // Unterminated template
        TokenKind::Invalid
    }

    fn scan_regex(&mut self) -> TokenKind {
        self.advance(); // Skip opening /

        let mut in_class = false;
        while !self.is_eof() {
            match self.current() {
                b'/' if !in_class => break,
                b'[' => {
                    in_class = true;
                    self.advance();
                }
                b']' => {
                    in_class = false;
                    self.advance();
                }
                b'\\' => {
                    self.advance();
                    if !self.is_eof() && !matches!(self.current(), b'\n' | b'\r') {
                        self.advance();
                    }
                }
                b'\n' | b'\r' => break,
                _ => self.advance(),
            }
        }

        if self.current() != b'/' {
            return TokenKind::Invalid;
        }
        self.advance();

        // Flags
        while matches!(self.current(), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$') {
            self.advance();
        }

        TokenKind::Regex
    }

    // === Multi-character operators ===

    fn scan_dot(&mut self) -> TokenKind {
        if self.peek_char().is_ascii_digit() {
            return self.scan_number();
        }
        self.advance();
        if self.current() == b'.' && self.peek_char() == b'.' {
            self.advance_n(2);
            TokenKind::Spread
        } else {
            TokenKind::Dot
        }
    }

    fn scan_question(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'?' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::QuestionQuestionEq
                } else {
                    TokenKind::QuestionQuestion
                }
            }
            b'.' if !self.peek_char().is_ascii_digit() => {
                self.advance();
                TokenKind::QuestionDot
            }
            _ => TokenKind::Question,
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'+' => { self.advance(); TokenKind::PlusPlus }
            b'=' => { self.advance(); TokenKind::PlusEq }
            _ => TokenKind::Plus,
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'-' => { self.advance(); TokenKind::MinusMinus }
            b'=' => { self.advance(); TokenKind::MinusEq }
            _ => TokenKind::Minus,
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'*' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::StarStarEq
                } else {
                    TokenKind::StarStar
                }
            }
            b'=' => { self.advance(); TokenKind::StarEq }
            _ => TokenKind::Star,
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        if self.allow_regex {
            return self.scan_regex();
        }
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::SlashEq
        } else {
            TokenKind::Slash
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::PercentEq
        } else {
            TokenKind::Percent
        }
    }

    fn scan_equals(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::EqEqEq
                } else {
                    TokenKind::EqEq
                }
            }
            b'>' => { self.advance(); TokenKind::Arrow }
            _ => TokenKind::Eq,
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::BangEqEq
                } else {
                    TokenKind::BangEq
                }
            }
            _ => TokenKind::Bang,
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'<' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::LtLtEq
                } else {
                    TokenKind::LtLt
                }
            }
            b'=' => { self.advance(); TokenKind::LtEq }
            _ => TokenKind::Lt,
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'>' => {
                self.advance();
                match self.current() {
                    b'>' => {
                        self.advance();
                        if self.current() == b'=' {
                            self.advance();
                            TokenKind::GtGtGtEq
                        } else {
                            TokenKind::GtGtGt
                        }
                    }
                    b'=' => { self.advance(); TokenKind::GtGtEq }
                    _ => TokenKind::GtGt,
                }
            }
            b'=' => { self.advance(); TokenKind::GtEq }
            _ => TokenKind::Gt,
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'&' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::AmpAmpEq
                } else {
                    TokenKind::AmpAmp
                }
            }
            b'=' => { self.advance(); TokenKind::AmpEq }
            _ => TokenKind::Amp,
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'|' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::PipePipeEq
                } else {
                    TokenKind::PipePipe
                }
            }
            b'=' => { self.advance(); TokenKind::PipeEq }
            _ => TokenKind::Pipe,
        }
    }

    fn scan_caret(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::CaretEq
        } else {
            TokenKind::Caret
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.done = true;
            return None;
        }
        Some(token)
    }
}

fn is_unicode_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Tokenize a whole source text, excluding the final `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        tokenize(source).iter().map(|t| t.text(source)).collect()
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(texts("foo bar _baz $qux"), vec!["foo", "bar", "_baz", "$qux"]);
        assert_eq!(
            kinds("foo bar"),
            vec![TokenKind::Identifier, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_unicode_identifiers() {
        let source = "const größe = π\u{00a0}+ 1";
        assert_eq!(texts(source), vec!["const", "größe", "=", "π", "+", "1"]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("const let var function"),
            vec![TokenKind::Const, TokenKind::Let, TokenKind::Var, TokenKind::Function]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            texts("42 3.14 0xff 0b101 0o77 1_000 .5 1e-7 10n"),
            vec!["42", "3.14", "0xff", "0b101", "0o77", "1_000", ".5", "1e-7", "10n"]
        );
        assert_eq!(kinds("10n"), vec![TokenKind::BigInt]);
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            texts(r#""hello /* not a comment */" 'it\'s'"#),
            vec![r#""hello /* not a comment */""#, r"'it\'s'"]
        );
    }

    #[test]
    fn test_unterminated_string_is_invalid() {
        assert_eq!(kinds("'abc\nx"), vec![TokenKind::Invalid, TokenKind::Identifier]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a + - * % ** ++ -- / b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Plus, TokenKind::Minus, TokenKind::Star, TokenKind::Percent,
                TokenKind::StarStar, TokenKind::PlusPlus, TokenKind::MinusMinus,
                TokenKind::Slash, TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_comparison() {
        assert_eq!(
            kinds("== === != !== < <= > >="),
            vec![
                TokenKind::EqEq, TokenKind::EqEqEq, TokenKind::BangEq, TokenKind::BangEqEq,
                TokenKind::Lt, TokenKind::LtEq, TokenKind::Gt, TokenKind::GtEq,
            ]
        );
    }

    #[test]
    fn test_arrow_function() {
        assert_eq!(
            kinds("(x) => x"),
            vec![
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::RParen,
                TokenKind::Arrow,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(texts("a // line comment\nb /* block */ c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_regex_vs_division() {
        assert_eq!(texts("a / b / c"), vec!["a", "/", "b", "/", "c"]);
        assert_eq!(texts("x = / a b /g;"), vec!["x", "=", "/ a b /g", ";"]);
        assert_eq!(texts("return /=+/.test(s)"), vec!["return", "/=+/", ".", "test", "(", "s", ")"]);
        assert_eq!(kinds("a /= 2"), vec![TokenKind::Identifier, TokenKind::SlashEq, TokenKind::Number]);
    }

    #[test]
    fn test_regex_with_class_containing_slash() {
        assert_eq!(texts("f(/[/]+/g)"), vec!["f", "(", "/[/]+/g", ")"]);
    }

    #[test]
    fn test_template_literal_no_sub() {
        assert_eq!(kinds("`hello world`"), vec![TokenKind::TemplateNoSub]);
    }

    #[test]
    fn test_template_substitutions() {
        let source = "`a ${ b } c ${ { d: `x ${e}` } } f`";
        assert_eq!(
            texts(source),
            vec![
                "`a ${", "b", "} c ${", "{", "d", ":", "`x ${", "e", "}`", "}", "} f`",
            ]
        );
        assert_eq!(
            kinds(source).last().copied(),
            Some(TokenKind::TemplateTail)
        );
    }

    #[test]
    fn test_hashbang_is_not_a_token() {
        let source = "#!/usr/bin/env node\nlet a";
        let mut lexer = Lexer::new(source);
        assert_eq!(lexer.hashbang(), Some(Span::new(0, 19)));
        assert_eq!(lexer.next_token().kind, TokenKind::Let);
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("  ");
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}
