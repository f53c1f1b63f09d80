//! Single-pass translator from a small block-structured language to
//! three-address code with numeric jump labels.

pub mod ast;
pub mod codegen;
pub mod env;
pub mod error;
pub mod intern;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod typeck;
pub mod types;

use std::io::{Read, Write};

pub use ast::{Expr, Id, Stmt};
pub use codegen::Emitter;
pub use error::{CompileError, CompileErrorKind, Result, TypeMismatch};
pub use intern::{Interner, Symbol};
pub use ir::{Instr, Label, Place};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};
pub use types::Type;

/// Translates the program read from `input` and writes its code to `output`,
/// followed by a newline. Nothing is written for a program that fails to
/// parse or type-check.
pub fn compile<R: Read, W: Write>(input: R, output: W) -> Result<()> {
    let mut parser = Parser::new(Lexer::new(input))?;
    let mut out = Emitter::new(output);
    parser.program(&mut out)?;
    out.finish().map_err(|e| CompileError::io(e, parser.line()))
}

/// In-memory variant of [`compile`].
pub fn compile_str(src: &str) -> Result<String> {
    let mut buf = Vec::new();
    compile(src.as_bytes(), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
