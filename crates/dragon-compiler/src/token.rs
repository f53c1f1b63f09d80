use std::fmt;

use crate::intern::Symbol;
use crate::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(Symbol),
    Num(i64),
    Real(f64),
    // int, float, char, bool
    Basic(Type),

    // Keywords
    If,
    Else,
    While,
    Do,
    Break,
    True,
    False,

    // Two-character operators
    And,
    Or,
    Eq,
    Ne,
    Le,
    Ge,

    /// Any other byte stands for itself: `{`, `;`, `+`, `<`, `!`, ...
    Punct(u8),
    Eof,
}

impl TokenKind {
    pub fn is_punct(&self, ch: u8) -> bool { matches!(self, TokenKind::Punct(c) if *c == ch) }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        match self {
            Ident(_) => write!(f, "identifier"),
            Num(v) => write!(f, "{v}"),
            Real(v) => write!(f, "{v}"),
            Basic(t) => write!(f, "{t}"),
            If => write!(f, "if"),
            Else => write!(f, "else"),
            While => write!(f, "while"),
            Do => write!(f, "do"),
            Break => write!(f, "break"),
            True => write!(f, "true"),
            False => write!(f, "false"),
            And => write!(f, "&&"),
            Or => write!(f, "||"),
            Eq => write!(f, "=="),
            Ne => write!(f, "!="),
            Le => write!(f, "<="),
            Ge => write!(f, ">="),
            Punct(c) => write!(f, "'{}'", char::from(*c)),
            Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}
