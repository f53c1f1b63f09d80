use std::io::{Read, Write};

use tracing::trace;

use crate::ast::*;
use crate::codegen::Emitter;
use crate::env::Env;
use crate::error::{CompileError, CompileErrorKind, Result, TypeMismatch};
use crate::intern::Symbol;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::typeck;
use crate::types::Type;

/// Recursive-descent parser with one token of lookahead. Type rules are
/// checked as each node is built, so a finished tree is well typed.
pub struct Parser<R: Read> {
    lexer: Lexer<R>,
    look: Token,
    env: Env,
    // Loops whose body is being parsed, innermost last.
    loops: Vec<LoopId>,
    next_loop: usize,
}

impl<'a> Parser<&'a [u8]> {
    pub fn from_source(src: &'a str) -> Result<Self> { Parser::new(Lexer::from_source(src)) }
}

impl<R: Read> Parser<R> {
    pub fn new(mut lexer: Lexer<R>) -> Result<Self> {
        let look = lexer.scan()?;
        Ok(Self { lexer, look, env: Env::new(), loops: Vec::new(), next_loop: 0 })
    }

    /// Parses the program block and generates its code into `out`.
    pub fn program<W: Write>(&mut self, out: &mut Emitter<W>) -> Result<()> {
        let body = self.parse_program()?;
        self.gen_program(&body, out)
    }

    /// Emits `begin:`, the body's code, then `after:`.
    pub fn gen_program<W: Write>(&self, body: &Stmt, out: &mut Emitter<W>) -> Result<()> {
        let begin = out.new_label();
        let after = out.new_label();
        out.emit_label(begin)
            .and_then(|()| body.gen(out, begin, after))
            .and_then(|()| out.emit_label(after))
            .map_err(|e| CompileError::io(e, self.look.line))
    }

    /// Parses the program block without emitting anything.
    pub fn parse_program(&mut self) -> Result<Stmt> {
        let body = self.block()?;
        if self.look.kind != TokenKind::Eof {
            return Err(self.unexpected("end of input"));
        }
        Ok(body)
    }

    /// Line of the lookahead token.
    pub fn line(&self) -> usize { self.look.line }

    fn advance(&mut self) -> Result<()> {
        self.look = self.lexer.scan()?;
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> CompileError { CompileError::syntax(expected, &self.look.kind, self.look.line) }

    fn mismatch<T>(&self, checked: std::result::Result<T, TypeMismatch>) -> Result<T> {
        checked.map_err(|m| CompileError::mismatch(m, self.look.line))
    }

    fn expect(&mut self, expected: TokenKind) -> Result<()> {
        trace!(line = self.look.line, want = %expected, got = %self.look.kind, "match");
        if self.look.kind == expected {
            self.advance()
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn expect_punct(&mut self, ch: u8) -> Result<()> { self.expect(TokenKind::Punct(ch)) }

    fn expect_ident(&mut self) -> Result<Symbol> {
        trace!(line = self.look.line, want = "identifier", got = %self.look.kind, "match");
        match self.look.kind {
            TokenKind::Ident(sym) => {
                self.advance()?;
                Ok(sym)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_num(&mut self) -> Result<i64> {
        trace!(line = self.look.line, want = "integer", got = %self.look.kind, "match");
        match self.look.kind {
            TokenKind::Num(v) => {
                self.advance()?;
                Ok(v)
            }
            _ => Err(self.unexpected("integer")),
        }
    }

    fn lookup(&self, sym: Symbol) -> Result<Id> {
        self.env.lookup(sym).cloned().ok_or_else(|| {
            let name = self.lexer.interner().resolve(sym).to_owned();
            CompileError::new(CompileErrorKind::Undeclared { name }, self.look.line)
        })
    }

    fn block(&mut self) -> Result<Stmt> {
        self.expect_punct(b'{')?;
        self.env.enter();
        self.decls()?;
        let body = self.stmts()?;
        self.expect_punct(b'}')?;
        self.env.exit();
        Ok(body)
    }

    fn decls(&mut self) -> Result<()> {
        while let TokenKind::Basic(_) = self.look.kind {
            let base = self.ty()?;
            let sym = self.expect_ident()?;
            let ty = if self.look.kind.is_punct(b'[') { self.dims(base)? } else { base };
            self.expect_punct(b';')?;
            let name = self.lexer.interner().name(sym);
            let id = self.env.declare(sym, name, ty);
            trace!(name = %id.name, ty = %id.ty, offset = id.offset, "declare");
        }
        Ok(())
    }

    fn ty(&mut self) -> Result<Type> {
        let base = match &self.look.kind {
            TokenKind::Basic(ty) => ty.clone(),
            _ => return Err(self.unexpected("type")),
        };
        self.advance()?;
        Ok(base)
    }

    // Dimensions follow the name and nest right to left: `int a[2][3]` is
    // 2 arrays of 3 ints.
    fn dims(&mut self, base: Type) -> Result<Type> {
        self.expect_punct(b'[')?;
        let line = self.look.line;
        let len = self.expect_num()?;
        self.expect_punct(b']')?;
        let elem = if self.look.kind.is_punct(b'[') { self.dims(base)? } else { base };
        u32::try_from(len)
            .ok()
            .filter(|len| len.checked_mul(elem.width()).is_some())
            .map(|len| Type::array(len, elem))
            .ok_or_else(|| CompileError::syntax("array size", len, line))
    }

    fn stmts(&mut self) -> Result<Stmt> {
        let mut list = Vec::new();
        while !self.look.kind.is_punct(b'}') {
            match self.stmt()? {
                Stmt::Null => {}
                stmt => list.push(stmt),
            }
        }
        Ok(list.into_iter().rev().fold(Stmt::Null, |rest, stmt| Stmt::seq(stmt, rest)))
    }

    fn stmt(&mut self) -> Result<Stmt> {
        match self.look.kind {
            TokenKind::Punct(b';') => {
                self.advance()?;
                Ok(Stmt::Null)
            }
            TokenKind::If => self.if_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::Do => self.do_stmt(),
            TokenKind::Break => self.break_stmt(),
            TokenKind::Punct(b'{') => self.block(),
            _ => self.assign(),
        }
    }

    fn condition(&mut self, construct: &'static str) -> Result<Expr> {
        self.expect_punct(b'(')?;
        let cond = self.parse_or()?;
        self.expect_punct(b')')?;
        self.mismatch(typeck::condition(construct, &cond.ty()))?;
        Ok(cond)
    }

    fn if_stmt(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::If)?;
        let cond = self.condition("if")?;
        let then_branch = Box::new(self.stmt()?);
        if self.look.kind != TokenKind::Else {
            return Ok(Stmt::If { cond, body: then_branch });
        }
        self.expect(TokenKind::Else)?;
        let else_branch = Box::new(self.stmt()?);
        Ok(Stmt::IfElse { cond, then_branch, else_branch })
    }

    fn open_loop(&mut self) -> LoopId {
        let id = LoopId(self.next_loop);
        self.next_loop += 1;
        self.loops.push(id);
        id
    }

    fn while_stmt(&mut self) -> Result<Stmt> {
        let id = self.open_loop();
        self.expect(TokenKind::While)?;
        let cond = self.condition("while")?;
        let body = Box::new(self.stmt()?);
        self.loops.pop();
        Ok(Stmt::While { cond, body, id })
    }

    fn do_stmt(&mut self) -> Result<Stmt> {
        let id = self.open_loop();
        self.expect(TokenKind::Do)?;
        let body = Box::new(self.stmt()?);
        self.expect(TokenKind::While)?;
        let cond = self.condition("do")?;
        self.expect_punct(b';')?;
        self.loops.pop();
        Ok(Stmt::DoWhile { body, cond, id })
    }

    fn break_stmt(&mut self) -> Result<Stmt> {
        let line = self.look.line;
        self.expect(TokenKind::Break)?;
        let Some(&id) = self.loops.last() else {
            return Err(CompileError::new(CompileErrorKind::UnenclosedBreak, line));
        };
        self.expect_punct(b';')?;
        Ok(Stmt::Break(id))
    }

    fn assign(&mut self) -> Result<Stmt> {
        let sym = self.expect_ident()?;
        let target = self.lookup(sym)?;
        let stmt = if self.look.kind.is_punct(b'=') {
            self.advance()?;
            let value = self.parse_or()?;
            self.mismatch(Stmt::assign(target, value))?
        } else {
            let access = self.offset(target)?;
            self.expect_punct(b'=')?;
            let value = self.parse_or()?;
            self.mismatch(Stmt::assign_elem(access, value))?
        };
        self.expect_punct(b';')?;
        Ok(stmt)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.look.kind == TokenKind::Or {
            self.advance()?;
            let right = self.parse_and()?;
            left = self.mismatch(Expr::or(left, right))?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_equality()?;
        while self.look.kind == TokenKind::And {
            self.advance()?;
            let right = self.parse_equality()?;
            left = self.mismatch(Expr::and(left, right))?;
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut left = self.parse_rel()?;
        loop {
            let op = match self.look.kind {
                TokenKind::Eq => RelOp::Eq,
                TokenKind::Ne => RelOp::Ne,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_rel()?;
            left = self.mismatch(Expr::rel(op, left, right))?;
        }
        Ok(left)
    }

    // Relational operators do not chain: `a < b < c` is a syntax error.
    fn parse_rel(&mut self) -> Result<Expr> {
        let left = self.parse_add_sub()?;
        let op = match self.look.kind {
            TokenKind::Punct(b'<') => RelOp::Lt,
            TokenKind::Le => RelOp::Le,
            TokenKind::Ge => RelOp::Ge,
            TokenKind::Punct(b'>') => RelOp::Gt,
            _ => return Ok(left),
        };
        self.advance()?;
        let right = self.parse_add_sub()?;
        self.mismatch(Expr::rel(op, left, right))
    }

    fn parse_add_sub(&mut self) -> Result<Expr> {
        let mut left = self.parse_mul_div()?;
        loop {
            let op = match self.look.kind {
                TokenKind::Punct(b'+') => ArithOp::Add,
                TokenKind::Punct(b'-') => ArithOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_mul_div()?;
            left = self.mismatch(Expr::arith(op, left, right))?;
        }
        Ok(left)
    }

    fn parse_mul_div(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.look.kind {
                TokenKind::Punct(b'*') => ArithOp::Mul,
                TokenKind::Punct(b'/') => ArithOp::Div,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = self.mismatch(Expr::arith(op, left, right))?;
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        match self.look.kind {
            TokenKind::Punct(b'-') => {
                self.advance()?;
                let operand = self.parse_unary()?;
                self.mismatch(Expr::minus(operand))
            }
            TokenKind::Punct(b'!') => {
                self.advance()?;
                let operand = self.parse_unary()?;
                self.mismatch(Expr::not(operand))
            }
            _ => self.parse_factor(),
        }
    }

    fn parse_factor(&mut self) -> Result<Expr> {
        let expr = match self.look.kind {
            TokenKind::Punct(b'(') => {
                self.advance()?;
                let inner = self.parse_or()?;
                self.expect_punct(b')')?;
                return Ok(inner);
            }
            TokenKind::Num(v) => Expr::Constant(Literal::Int(v)),
            TokenKind::Real(v) => Expr::Constant(Literal::Real(v)),
            TokenKind::True => Expr::Constant(Literal::Bool(true)),
            TokenKind::False => Expr::Constant(Literal::Bool(false)),
            TokenKind::Ident(sym) => {
                let id = self.lookup(sym)?;
                self.advance()?;
                if !self.look.kind.is_punct(b'[') {
                    return Ok(Expr::Id(id));
                }
                return Ok(Expr::Access(self.offset(id)?));
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.advance()?;
        Ok(expr)
    }

    /// `[E] [E] ...` after an array name. Each index is scaled by the width
    /// of the element it selects and the terms are summed, which yields the
    /// row-major byte offset from the array base.
    fn offset(&mut self, array: Id) -> Result<Access> {
        let mut ty = array.ty.clone();
        let mut loc = self.index_term(&mut ty)?;
        while self.look.kind.is_punct(b'[') {
            let term = self.index_term(&mut ty)?;
            loc = self.mismatch(Expr::arith(ArithOp::Add, loc, term))?;
        }
        Ok(Access { array, index: Box::new(loc), ty })
    }

    fn index_term(&mut self, ty: &mut Type) -> Result<Expr> {
        self.expect_punct(b'[')?;
        let index = self.parse_or()?;
        self.expect_punct(b']')?;
        *ty = self.mismatch(typeck::index(ty))?;
        let width = Expr::int(ty.width());
        self.mismatch(Expr::arith(ArithOp::Mul, index, width))
    }
}
