use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    Char,
    Bool,
    /// `len` elements of `elem`; nested arrays give multiple dimensions.
    Array { len: u32, elem: Box<Type> },
}

impl Type {
    pub fn array(len: u32, elem: Type) -> Self { Type::Array { len, elem: Box::new(elem) } }

    /// Storage size in bytes.
    pub fn width(&self) -> u32 {
        match self {
            Type::Int => 4,
            Type::Float => 8,
            Type::Char | Type::Bool => 1,
            Type::Array { len, elem } => len * elem.width(),
        }
    }

    pub fn is_numeric(&self) -> bool { matches!(self, Type::Int | Type::Float | Type::Char) }

    pub fn is_array(&self) -> bool { matches!(self, Type::Array { .. }) }

    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array { elem, .. } => Some(elem),
            _ => None,
        }
    }

    /// Numeric promotion: char < int < float. `None` if either side is not numeric.
    pub fn max(a: &Type, b: &Type) -> Option<Type> {
        if !a.is_numeric() || !b.is_numeric() {
            return None;
        }
        if *a == Type::Float || *b == Type::Float {
            Some(Type::Float)
        } else if *a == Type::Int || *b == Type::Int {
            Some(Type::Int)
        } else {
            Some(Type::Char)
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Char => write!(f, "char"),
            Type::Bool => write!(f, "bool"),
            Type::Array { len, elem } => write!(f, "[{len}]{elem}"),
        }
    }
}
