use std::fmt;

use crate::ast::{Expr, Id, Temp};

/// Jump target. `0` is never defined: as an argument to `jumping` it means
/// "fall through to the next instruction".
pub type Label = u32;

pub const FALL: Label = 0;

/// Destination of a copy: a declared variable or a temporary.
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    Id(Id),
    Temp(Temp),
}

impl From<Place> for Expr {
    fn from(place: Place) -> Expr {
        match place {
            Place::Id(id) => Expr::Id(id),
            Place::Temp(temp) => Expr::Temp(temp),
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Id(id) => write!(f, "{}", id.name),
            Place::Temp(temp) => write!(f, "t{}", temp.number),
        }
    }
}

/// One three-address instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// `dst = src`, where `src` is a leaf, a single operator over leaves, or
    /// an array access with a reduced index.
    Copy { dst: Place, src: Expr },
    /// `array [ index ] = value`
    Store { array: Id, index: Expr, value: Expr },
    If { test: Expr, target: Label },
    IfFalse { test: Expr, target: Label },
    Goto(Label),
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Copy { dst, src } => write!(f, "{dst} = {src}"),
            Instr::Store { array, index, value } => write!(f, "{} [ {index} ] = {value}", array.name),
            Instr::If { test, target } => write!(f, "if {test} goto L{target}"),
            Instr::IfFalse { test, target } => write!(f, "iffalse {test} goto L{target}"),
            Instr::Goto(target) => write!(f, "goto L{target}"),
        }
    }
}
