//! Short-name generation.
//!
//! Names are drawn from a per-container counter. Index `i` maps to a name
//! whose first character comes from the 54 identifier-start symbols and
//! whose remaining characters encode `i / 54` in base 64, least significant
//! digit first. The mapping is injective and its length never decreases as
//! the index grows, so indices below 54 give one-character names.

/// Symbols usable in generated names. The first 54 may start an identifier.
const ALPHABET: &[u8; 64] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ$_0123456789";

const FIRST_LEN: usize = 54;

/// Name for a raw index, reserved words included.
pub fn generate(index: usize) -> String {
    let mut name = String::with_capacity(4);
    name.push(ALPHABET[index % FIRST_LEN] as char);

    let mut rest = index / FIRST_LEN;
    while rest > 0 {
        name.push(ALPHABET[rest % ALPHABET.len()] as char);
        rest /= ALPHABET.len();
    }
    name
}

/// Words a generated name must never be.
pub fn is_reserved(name: &str) -> bool {
    matches!(
        name,
        "do" | "if" | "in" | "for" | "int" | "let" | "new" | "try" | "var"
            | "case" | "else" | "enum" | "eval" | "null" | "this" | "true" | "void" | "with"
            | "await" | "break" | "catch" | "class" | "const" | "false" | "super" | "throw"
            | "while" | "yield" | "delete" | "export" | "import" | "public" | "return"
            | "static" | "switch" | "typeof" | "default" | "extends" | "finally" | "package"
            | "private" | "continue" | "debugger" | "function" | "arguments" | "interface"
            | "protected" | "implements" | "instanceof"
    )
}

/// A name-index counter. Function-scoped containers own one; block-scoped
/// containers borrow their function's.
#[derive(Debug, Clone, Default)]
pub struct NameCounter {
    next: usize,
}

impl NameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next call to [`NameCounter::next_name`] starts from.
    pub fn position(&self) -> usize {
        self.next
    }

    /// Next non-reserved name. Each call consumes at least one index.
    pub fn next_name(&mut self) -> String {
        loop {
            let candidate = generate(self.next);
            self.next += 1;
            if !is_reserved(&candidate) {
                return candidate;
            }
        }
    }
}
