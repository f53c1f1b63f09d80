use std::fmt;
use std::rc::Rc;

use crate::error::TypeMismatch;
use crate::typeck;
use crate::types::Type;

/// A declared variable: its spelling, type and byte offset in storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Id {
    pub name: Rc<str>,
    pub ty: Type,
    pub offset: u32,
}

/// Scratch cell minted by the emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct Temp {
    pub number: u32,
    pub ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Real(f64),
    Bool(bool),
}

/// `array [ index ]`, where `index` is already the byte offset from the
/// array base and `ty` is the type of the selected element.
#[derive(Debug, Clone, PartialEq)]
pub struct Access {
    pub array: Id,
    pub index: Box<Expr>,
    pub ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp { Add, Sub, Mul, Div }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp { Lt, Le, Gt, Ge, Eq, Ne }

impl ArithOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

impl RelOp {
    pub fn as_str(self) -> &'static str {
        match self {
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Id(Id),
    Temp(Temp),
    Constant(Literal),
    Arith { op: ArithOp, left: Box<Expr>, right: Box<Expr>, ty: Type },
    /// Unary minus.
    Minus { operand: Box<Expr>, ty: Type },
    Access(Access),
    Rel { op: RelOp, left: Box<Expr>, right: Box<Expr> },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn int(value: impl Into<i64>) -> Self { Expr::Constant(Literal::Int(value.into())) }

    pub fn arith(op: ArithOp, left: Expr, right: Expr) -> Result<Self, TypeMismatch> {
        let ty = typeck::arith(op, &left.ty(), &right.ty())?;
        Ok(Expr::Arith { op, left: Box::new(left), right: Box::new(right), ty })
    }

    pub fn minus(operand: Expr) -> Result<Self, TypeMismatch> {
        let ty = typeck::minus(&operand.ty())?;
        Ok(Expr::Minus { operand: Box::new(operand), ty })
    }

    pub fn rel(op: RelOp, left: Expr, right: Expr) -> Result<Self, TypeMismatch> {
        typeck::rel(op, &left.ty(), &right.ty())?;
        Ok(Expr::Rel { op, left: Box::new(left), right: Box::new(right) })
    }

    pub fn and(left: Expr, right: Expr) -> Result<Self, TypeMismatch> {
        typeck::logical("&&", &left.ty(), &right.ty())?;
        Ok(Expr::And(Box::new(left), Box::new(right)))
    }

    pub fn or(left: Expr, right: Expr) -> Result<Self, TypeMismatch> {
        typeck::logical("||", &left.ty(), &right.ty())?;
        Ok(Expr::Or(Box::new(left), Box::new(right)))
    }

    pub fn not(operand: Expr) -> Result<Self, TypeMismatch> {
        typeck::not(&operand.ty())?;
        Ok(Expr::Not(Box::new(operand)))
    }

    /// Value type of the expression.
    pub fn ty(&self) -> Type {
        match self {
            Expr::Id(id) => id.ty.clone(),
            Expr::Temp(temp) => temp.ty.clone(),
            Expr::Constant(Literal::Int(_)) => Type::Int,
            Expr::Constant(Literal::Real(_)) => Type::Float,
            Expr::Constant(Literal::Bool(_)) => Type::Bool,
            Expr::Arith { ty, .. } | Expr::Minus { ty, .. } => ty.clone(),
            Expr::Access(access) => access.ty.clone(),
            Expr::Rel { .. } | Expr::And(..) | Expr::Or(..) | Expr::Not(_) => Type::Bool,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Real(v) => write!(f, "{v}"),
            Literal::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} [ {} ]", self.array.name, self.index) }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Id(id) => write!(f, "{}", id.name),
            Expr::Temp(temp) => write!(f, "t{}", temp.number),
            Expr::Constant(lit) => write!(f, "{lit}"),
            Expr::Arith { op, left, right, .. } => write!(f, "{left} {} {right}", op.as_str()),
            Expr::Minus { operand, .. } => write!(f, "minus {operand}"),
            Expr::Access(access) => write!(f, "{access}"),
            Expr::Rel { op, left, right } => write!(f, "{left} {} {right}", op.as_str()),
            Expr::And(left, right) => write!(f, "{left} && {right}"),
            Expr::Or(left, right) => write!(f, "{left} || {right}"),
            Expr::Not(operand) => write!(f, "! {operand}"),
        }
    }
}

/// Index into the emitter's loop-exit table. The parser hands the innermost
/// loop's id to every `break` inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Empty statement (`;` or an empty block).
    Null,
    Seq(Box<Stmt>, Box<Stmt>),
    If { cond: Expr, body: Box<Stmt> },
    IfElse { cond: Expr, then_branch: Box<Stmt>, else_branch: Box<Stmt> },
    While { cond: Expr, body: Box<Stmt>, id: LoopId },
    DoWhile { body: Box<Stmt>, cond: Expr, id: LoopId },
    Break(LoopId),
    Assign { target: Id, value: Expr },
    AssignElem { array: Id, index: Expr, value: Expr },
}

impl Stmt {
    pub fn seq(first: Stmt, rest: Stmt) -> Self { Stmt::Seq(Box::new(first), Box::new(rest)) }

    pub fn assign(target: Id, value: Expr) -> Result<Self, TypeMismatch> {
        typeck::assign(&target.ty, &value.ty())?;
        Ok(Stmt::Assign { target, value })
    }

    pub fn assign_elem(access: Access, value: Expr) -> Result<Self, TypeMismatch> {
        typeck::assign_elem(&access.ty, &value.ty())?;
        Ok(Stmt::AssignElem { array: access.array, index: *access.index, value })
    }
}
