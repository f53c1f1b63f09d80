use std::io;

use thiserror::Error;

use crate::types::Type;

#[derive(Debug, Error)]
pub enum CompileErrorKind {
    #[error("syntax error: expected {expected}, found {found}")]
    Syntax { expected: String, found: String },
    #[error("{name} undeclared")]
    Undeclared { name: String },
    #[error("type error: {0}")]
    Type(TypeMismatch),
    #[error("unenclosed break")]
    UnenclosedBreak,
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// The operand combination a construct rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeMismatch {
    #[error("cannot assign {value} to {target}")]
    Assign { target: Type, value: Type },
    #[error("operator `{op}` cannot combine {left} and {right}")]
    Binary { op: &'static str, left: Type, right: Type },
    #[error("operator `{op}` cannot apply to {operand}")]
    Unary { op: &'static str, operand: Type },
    #[error("boolean required in {construct}, found {found}")]
    Condition { construct: &'static str, found: Type },
    #[error("cannot index into {0}")]
    NotAnArray(Type),
}

#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub line: usize,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, line: usize) -> Self { Self { kind, line } }

    pub fn syntax(expected: impl Into<String>, found: impl ToString, line: usize) -> Self {
        Self::new(CompileErrorKind::Syntax { expected: expected.into(), found: found.to_string() }, line)
    }

    pub fn mismatch(mismatch: TypeMismatch, line: usize) -> Self { Self::new(CompileErrorKind::Type(mismatch), line) }

    pub fn io(err: io::Error, line: usize) -> Self { Self::new(CompileErrorKind::Io(err), line) }
}

pub type Result<T> = std::result::Result<T, CompileError>;
