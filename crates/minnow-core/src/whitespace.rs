//! Whitespace compaction over the token stream.
//!
//! All trivia is dropped and token text is copied verbatim. A single space
//! is put back between two tokens only where omitting it would change how
//! the pair lexes. The decision looks at the previous significant token and
//! the current one, nothing else.
//!
//! Newlines are not preserved, so input that relies on automatic semicolon
//! insertion is not supported. Compiler output always terminates
//! statements explicitly.
//!
//! A `/` directly after `)` or `}` is always lexed as division. A regex
//! literal in that position, as in `if (x) / +/.test(s)`, is split into
//! operator tokens and spaces inside it are lost.

use minnow_lexer::{Lexer, TokenKind};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of compacting one text.
#[derive(Debug, Clone)]
pub struct Compacted {
    pub text: String,
    /// Byte length of the input.
    pub before: usize,
    /// Byte length of the output.
    pub after: usize,
    pub elapsed: Duration,
}

/// Every operator that is longer than one character. A punctuator followed
/// by a character that extends it into one of these must be separated.
const COMPOUND_OPERATORS: &[&str] = &[
    "=>", "...", "?.", "??", "??=", "==", "===", "!=", "!==", "<=", ">=", "+=", "-=", "*=", "/=",
    "%=", "**", "**=", "&=", "|=", "^=", "<<", "<<=", ">>", ">>=", ">>>", ">>>=", "&&", "&&=",
    "||", "||=", "++", "--",
];

fn is_operator(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Dot | Question
            | Arrow
            | Spread
            | QuestionDot
            | Eq
            | PlusEq
            | MinusEq
            | StarEq
            | SlashEq
            | PercentEq
            | StarStarEq
            | AmpEq
            | PipeEq
            | CaretEq
            | LtLtEq
            | GtGtEq
            | GtGtGtEq
            | AmpAmpEq
            | PipePipeEq
            | QuestionQuestionEq
            | EqEq
            | EqEqEq
            | BangEq
            | BangEqEq
            | Lt
            | LtEq
            | Gt
            | GtEq
            | Plus
            | Minus
            | Star
            | Slash
            | Percent
            | StarStar
            | PlusPlus
            | MinusMinus
            | Amp
            | Pipe
            | Caret
            | Tilde
            | LtLt
            | GtGt
            | GtGtGt
            | AmpAmp
            | PipePipe
            | Bang
            | QuestionQuestion
    )
}

/// Keywords that are always followed by a space.
fn spaced_after(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Case | Class
            | Const
            | Delete
            | Do
            | Export
            | Get
            | Import
            | Let
            | New
            | Set
            | Static
            | Throw
            | Typeof
            | Var
            | Void
    )
}

/// Binary keyword operators, spaced on both sides.
fn spaced_around(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Extends | TokenKind::In | TokenKind::Instanceof)
}

fn is_integer_literal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit() || b == b'_')
}

/// Whether `cur` must be separated from `prev` by a space.
pub fn needs_space(prev: TokenKind, prev_text: &str, cur: TokenKind, cur_text: &str) -> bool {
    use TokenKind::*;

    match prev {
        Function => return cur.is_word_like(),
        Break | Continue | Return | Yield => return cur != Semicolon,
        Else => return cur != LBrace,
        _ => {}
    }
    if spaced_after(prev) || spaced_around(prev) || spaced_around(cur) {
        return true;
    }

    match (prev, cur) {
        (Plus | PlusPlus, Plus | PlusPlus) | (Minus | MinusMinus, Minus | MinusMinus) => return true,
        (Slash | SlashEq, Regex) => return true,
        (Number, Dot) if is_integer_literal(prev_text) => return true,
        // `<!--` opens an HTML-like comment in scripts.
        (Lt, Bang) => return true,
        (Regex, _) if cur.is_word_like() => return true,
        _ => {}
    }
    if prev.is_word_like() && cur.is_word_like() {
        return true;
    }

    // `a / /b/` and `/a/ * 2` would otherwise open a comment.
    if prev_text.ends_with('/') && (cur_text.starts_with('/') || cur_text.starts_with('*')) {
        return true;
    }

    is_operator(prev) && is_operator(cur) && extends_operator(prev_text, cur_text)
}

/// Whether `prev` followed directly by `cur` would start a longer operator.
fn extends_operator(prev: &str, cur: &str) -> bool {
    let Some(next) = cur.chars().next() else {
        return false;
    };
    COMPOUND_OPERATORS.iter().any(|op| {
        op.len() > prev.len() && op.starts_with(prev) && op[prev.len()..].starts_with(next)
    })
}

/// Remove all non-semantic whitespace and comments from `source`.
pub fn compact(source: &str) -> Compacted {
    let start = Instant::now();
    let lexer = Lexer::new(source);
    let mut out = String::with_capacity(source.len());

    if let Some(hashbang) = lexer.hashbang() {
        out.push_str(hashbang.text(source).unwrap_or(""));
        out.push('\n');
    }

    let mut last: Option<(TokenKind, &str)> = None;
    let mut tokens = 0usize;
    for token in lexer {
        let text = token.text(source);
        if let Some((prev, prev_text)) = last {
            if needs_space(prev, prev_text, token.kind, text) {
                out.push(' ');
            }
        }
        out.push_str(text);
        last = Some((token.kind, text));
        tokens += 1;
    }

    let compacted = Compacted {
        before: source.len(),
        after: out.len(),
        text: out,
        elapsed: start.elapsed(),
    };
    debug!(tokens, before = compacted.before, after = compacted.after, "compacted whitespace");
    compacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn min(source: &str) -> String {
        compact(source).text
    }

    #[track_caller]
    fn assert_fixed_point(source: &str) {
        let once = min(source);
        assert_eq!(min(&once), once, "not idempotent for {source:?}");
    }

    #[test]
    fn test_strips_comments_and_blank_space() {
        let source = "// header\nlet  total = a + b; /* note */\n\nfoo( total );\n";
        assert_eq!(min(source), "let total=a+b;foo(total);");
    }

    #[test]
    fn test_function_keyword() {
        assert_eq!(min("function  run ( ) { }"), "function run(){}");
        assert_eq!(min("x = function ( ) { }"), "x=function(){}");
    }

    #[test]
    fn test_jump_statements() {
        assert_eq!(min("return ;"), "return;");
        assert_eq!(min("return x ;"), "return x;");
        assert_eq!(min("return ( x ) ;"), "return (x);");
        assert_eq!(min("for (;;) { break ; continue ; }"), "for(;;){break;continue;}");
        assert_eq!(min("function* g() { yield 1; }"), "function*g(){yield 1;}");
    }

    #[test]
    fn test_else() {
        assert_eq!(min("if (a) { } else { }"), "if(a){}else{}");
        assert_eq!(min("if (a) x(); else y();"), "if(a)x();else y();");
    }

    #[test]
    fn test_right_spaced_keywords() {
        assert_eq!(min("throw new Error ( 'x' ) ;"), "throw new Error('x');");
        assert_eq!(min("typeof x === 'string'"), "typeof x==='string'");
        assert_eq!(min("void 0"), "void 0");
        assert_eq!(min("const a = [ 1 ] ;"), "const a=[1];");
        assert_eq!(min("switch (x) { case 'a' : break; }"), "switch(x){case 'a':break;}");
    }

    #[test]
    fn test_binary_keywords() {
        assert_eq!(min("if ('k' in obj) {}"), "if('k' in obj){}");
        assert_eq!(min("a instanceof B"), "a instanceof B");
        assert_eq!(min("class A extends B {}"), "class A extends B{}");
    }

    #[test]
    fn test_plus_and_minus_runs() {
        assert_eq!(min("a + +b"), "a+ +b");
        assert_eq!(min("a++ + b"), "a++ +b");
        assert_eq!(min("a + ++b"), "a+ ++b");
        assert_eq!(min("a - -b"), "a- -b");
        assert_eq!(min("a-- - b"), "a-- -b");
        assert_eq!(min("a + -b"), "a+-b");
    }

    #[test]
    fn test_word_boundaries() {
        assert_eq!(min("let x = await foo"), "let x=await foo");
        assert_eq!(min("async function f() {}"), "async function f(){}");
        assert_eq!(min("x = 1 in y"), "x=1 in y");
    }

    #[test]
    fn test_relex_hazards() {
        assert_eq!(min("a / /re/.source"), "a/ /re/.source");
        assert_eq!(min("1 .toString()"), "1 .toString()");
        assert_eq!(min("1.5 .toFixed()"), "1.5.toFixed()");
        assert_eq!(min("x = y / 2"), "x=y/2");
        assert_eq!(min("/a/ * 2"), "/a/ *2");
        assert_eq!(min("let a: Array<B> = c"), "let a:Array<B> =c");
        assert_eq!(min("a = b ? .5 : 1"), "a=b?.5:1");
        assert_eq!(min("a < !--b"), "a< !--b");
        assert_eq!(min("a < ! b"), "a< !b");
    }

    #[test]
    fn test_templates_are_copied_whole() {
        let source = "f(`a ${ x + 1 } b ${ y }`)";
        assert_eq!(min(source), "f(`a ${x+1} b ${y}`)");
    }

    #[test]
    fn test_hashbang_keeps_its_line() {
        assert_eq!(min("#!/usr/bin/env node\nlet  a = 1;"), "#!/usr/bin/env node\nlet a=1;");
    }

    #[test]
    fn test_statistics() {
        let compacted = compact("let   a = 1;");
        assert_eq!(compacted.before, 12);
        assert_eq!(compacted.after, 8);
        assert_eq!(compacted.text, "let a=1;");
    }

    #[test]
    fn test_output_is_a_fixed_point() {
        for source in [
            "function f(a, b) { return a + +b; }",
            "if (x) { y = /re/g.test(z) } else { w = a / b / c }",
            "class A extends B { static get x() { return this.#y; } }",
            "const s = `t ${ a ? `inner ${b}` : c } u`;",
            "label: for (const k in o) { if (k instanceof K) continue; else break }",
            "x = a-- - --b + ++c",
            "#!/bin/sh\nexport default class {}",
        ] {
            assert_fixed_point(source);
        }
    }
}
