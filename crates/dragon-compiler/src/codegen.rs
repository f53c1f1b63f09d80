//! Code generation protocols.
//!
//! Expressions support three operations:
//!
//! * `reduce` materializes the value into something usable as an operand (a
//!   leaf stays as it is, anything else lands in a fresh temporary),
//! * `gen_node` rebuilds the node over reduced operands, which is the form an
//!   assignment can take as its right-hand side without an extra temporary,
//! * `jumping(t, f)` emits control flow to `t` when true and to `f` when
//!   false, with [`FALL`] meaning "no jump, fall through".
//!
//! Statements support `gen(begin, after)`.

use std::io::{self, Write};

use tracing::debug;

use crate::ast::{Access, Expr, Literal, LoopId, Stmt, Temp};
use crate::ir::{Instr, Label, Place, FALL};
use crate::types::Type;

/// Instruction sink plus the counters of one compilation.
pub struct Emitter<W: Write> {
    out: W,
    labels: Label,
    temps: u32,
    loop_exits: Vec<Label>,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self { Self { out, labels: 0, temps: 0, loop_exits: Vec::new() } }

    pub fn into_inner(self) -> W { self.out }

    pub fn new_label(&mut self) -> Label {
        self.labels += 1;
        self.labels
    }

    pub fn new_temp(&mut self, ty: Type) -> Temp {
        self.temps += 1;
        Temp { number: self.temps, ty }
    }

    /// Labels share a line with the instruction that follows them.
    pub fn emit_label(&mut self, label: Label) -> io::Result<()> {
        debug!(label, "emit label");
        write!(self.out, "L{label}:")
    }

    pub fn emit(&mut self, instr: Instr) -> io::Result<()> { writeln!(self.out, "\t{instr}") }

    pub fn emit_jumps(&mut self, test: Expr, t: Label, f: Label) -> io::Result<()> {
        match (t, f) {
            (FALL, FALL) => Ok(()),
            (t, FALL) => self.emit(Instr::If { test, target: t }),
            (FALL, f) => self.emit(Instr::IfFalse { test, target: f }),
            (t, f) => {
                self.emit(Instr::If { test, target: t })?;
                self.emit(Instr::Goto(f))
            }
        }
    }

    /// Ends the program text with a newline and flushes the sink.
    pub fn finish(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }

    fn set_loop_exit(&mut self, id: LoopId, after: Label) {
        if self.loop_exits.len() <= id.0 {
            self.loop_exits.resize(id.0 + 1, FALL);
        }
        self.loop_exits[id.0] = after;
    }

    fn loop_exit(&self, id: LoopId) -> Label {
        let exit = self.loop_exits.get(id.0).copied().unwrap_or(FALL);
        debug_assert_ne!(exit, FALL, "break generated before its loop");
        exit
    }
}

impl Expr {
    pub fn reduce<W: Write>(&self, out: &mut Emitter<W>) -> io::Result<Expr> {
        match self {
            Expr::Id(_) | Expr::Temp(_) | Expr::Constant(_) => Ok(self.clone()),
            Expr::Arith { .. } | Expr::Minus { .. } | Expr::Access(_) => {
                let src = self.gen_node(out)?;
                let dst = Place::Temp(out.new_temp(self.ty()));
                out.emit(Instr::Copy { dst: dst.clone(), src })?;
                Ok(dst.into())
            }
            // Already a temporary once lowered.
            Expr::Rel { .. } | Expr::And(..) | Expr::Or(..) | Expr::Not(_) => self.gen_node(out),
        }
    }

    pub fn gen_node<W: Write>(&self, out: &mut Emitter<W>) -> io::Result<Expr> {
        match self {
            Expr::Id(_) | Expr::Temp(_) | Expr::Constant(_) => Ok(self.clone()),
            Expr::Arith { op, left, right, ty } => {
                let left = left.reduce(out)?;
                let right = right.reduce(out)?;
                Ok(Expr::Arith { op: *op, left: Box::new(left), right: Box::new(right), ty: ty.clone() })
            }
            Expr::Minus { operand, ty } => {
                let operand = operand.reduce(out)?;
                Ok(Expr::Minus { operand: Box::new(operand), ty: ty.clone() })
            }
            Expr::Access(access) => {
                let index = access.index.reduce(out)?;
                Ok(Expr::Access(Access { array: access.array.clone(), index: Box::new(index), ty: access.ty.clone() }))
            }
            Expr::Rel { .. } | Expr::And(..) | Expr::Or(..) | Expr::Not(_) => self.to_value(out),
        }
    }

    /// Lowers a boolean-control expression into a `bool` temporary:
    ///
    /// ```text
    ///     <jumping(0, f)>
    ///     t = true
    ///     goto a
    /// f:  t = false
    /// a:
    /// ```
    fn to_value<W: Write>(&self, out: &mut Emitter<W>) -> io::Result<Expr> {
        let f = out.new_label();
        let a = out.new_label();
        let temp = Place::Temp(out.new_temp(Type::Bool));
        self.jumping(out, FALL, f)?;
        out.emit(Instr::Copy { dst: temp.clone(), src: Expr::Constant(Literal::Bool(true)) })?;
        out.emit(Instr::Goto(a))?;
        out.emit_label(f)?;
        out.emit(Instr::Copy { dst: temp.clone(), src: Expr::Constant(Literal::Bool(false)) })?;
        out.emit_label(a)?;
        Ok(temp.into())
    }

    pub fn jumping<W: Write>(&self, out: &mut Emitter<W>, t: Label, f: Label) -> io::Result<()> {
        if t == FALL && f == FALL {
            return Ok(());
        }
        match self {
            Expr::Id(_) | Expr::Temp(_) => out.emit_jumps(self.clone(), t, f),
            Expr::Constant(Literal::Bool(true)) if t != FALL => out.emit(Instr::Goto(t)),
            Expr::Constant(Literal::Bool(false)) if f != FALL => out.emit(Instr::Goto(f)),
            Expr::Constant(_) => Ok(()),
            Expr::Arith { .. } | Expr::Minus { .. } | Expr::Access(_) => {
                let test = self.reduce(out)?;
                out.emit_jumps(test, t, f)
            }
            Expr::Rel { op, left, right } => {
                let left = left.reduce(out)?;
                let right = right.reduce(out)?;
                out.emit_jumps(Expr::Rel { op: *op, left: Box::new(left), right: Box::new(right) }, t, f)
            }
            Expr::And(left, right) => {
                let label = if f == FALL { out.new_label() } else { f };
                left.jumping(out, FALL, label)?;
                right.jumping(out, t, f)?;
                if f == FALL {
                    out.emit_label(label)?;
                }
                Ok(())
            }
            Expr::Or(left, right) => {
                let label = if t == FALL { out.new_label() } else { t };
                left.jumping(out, label, FALL)?;
                right.jumping(out, t, f)?;
                if t == FALL {
                    out.emit_label(label)?;
                }
                Ok(())
            }
            Expr::Not(operand) => operand.jumping(out, f, t),
        }
    }
}

impl Stmt {
    pub fn gen<W: Write>(&self, out: &mut Emitter<W>, begin: Label, after: Label) -> io::Result<()> {
        match self {
            Stmt::Null => Ok(()),
            Stmt::Seq(first, rest) => match (&**first, &**rest) {
                (Stmt::Null, only) | (only, Stmt::Null) => only.gen(out, begin, after),
                (first, rest) => {
                    let label = out.new_label();
                    first.gen(out, begin, label)?;
                    out.emit_label(label)?;
                    rest.gen(out, label, after)
                }
            },
            Stmt::If { cond, body } => {
                let label = out.new_label();
                cond.jumping(out, FALL, after)?;
                out.emit_label(label)?;
                body.gen(out, label, after)
            }
            Stmt::IfElse { cond, then_branch, else_branch } => {
                let label1 = out.new_label();
                let label2 = out.new_label();
                cond.jumping(out, FALL, label2)?;
                out.emit_label(label1)?;
                then_branch.gen(out, label1, after)?;
                out.emit(Instr::Goto(after))?;
                out.emit_label(label2)?;
                else_branch.gen(out, label2, after)
            }
            Stmt::While { cond, body, id } => {
                out.set_loop_exit(*id, after);
                cond.jumping(out, FALL, after)?;
                let label = out.new_label();
                out.emit_label(label)?;
                body.gen(out, label, begin)?;
                out.emit(Instr::Goto(begin))
            }
            Stmt::DoWhile { body, cond, id } => {
                out.set_loop_exit(*id, after);
                let label = out.new_label();
                body.gen(out, begin, label)?;
                out.emit_label(label)?;
                cond.jumping(out, begin, FALL)
            }
            Stmt::Break(id) => {
                let exit = out.loop_exit(*id);
                out.emit(Instr::Goto(exit))
            }
            Stmt::Assign { target, value } => {
                let src = value.gen_node(out)?;
                out.emit(Instr::Copy { dst: Place::Id(target.clone()), src })
            }
            Stmt::AssignElem { array, index, value } => {
                let index = index.reduce(out)?;
                let value = value.reduce(out)?;
                out.emit(Instr::Store { array: array.clone(), index, value })
            }
        }
    }
}
