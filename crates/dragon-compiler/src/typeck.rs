//! Type rules applied while nodes are built. Each rule either yields the
//! result type of the construct or the mismatch that rejected it.

use crate::ast::{ArithOp, RelOp};
use crate::error::TypeMismatch;
use crate::types::Type;

pub type TypeResult<T> = Result<T, TypeMismatch>;

pub fn arith(op: ArithOp, left: &Type, right: &Type) -> TypeResult<Type> {
    Type::max(left, right).ok_or_else(|| TypeMismatch::Binary { op: op.as_str(), left: left.clone(), right: right.clone() })
}

// char and int operands come out as int, float stays float.
pub fn minus(operand: &Type) -> TypeResult<Type> {
    Type::max(&Type::Int, operand).ok_or_else(|| TypeMismatch::Unary { op: "-", operand: operand.clone() })
}

/// No implicit widening across a comparison: both sides must have the same
/// scalar type.
pub fn rel(op: RelOp, left: &Type, right: &Type) -> TypeResult<Type> {
    if !left.is_array() && !right.is_array() && left == right {
        Ok(Type::Bool)
    } else {
        Err(TypeMismatch::Binary { op: op.as_str(), left: left.clone(), right: right.clone() })
    }
}

pub fn logical(op: &'static str, left: &Type, right: &Type) -> TypeResult<Type> {
    if *left == Type::Bool && *right == Type::Bool {
        Ok(Type::Bool)
    } else {
        Err(TypeMismatch::Binary { op, left: left.clone(), right: right.clone() })
    }
}

pub fn not(operand: &Type) -> TypeResult<Type> {
    if *operand == Type::Bool {
        Ok(Type::Bool)
    } else {
        Err(TypeMismatch::Unary { op: "!", operand: operand.clone() })
    }
}

/// `id = expr`: both numeric or both bool. The assigned type is the value's.
pub fn assign(target: &Type, value: &Type) -> TypeResult<Type> {
    if (target.is_numeric() && value.is_numeric()) || (*target == Type::Bool && *value == Type::Bool) {
        Ok(value.clone())
    } else {
        Err(TypeMismatch::Assign { target: target.clone(), value: value.clone() })
    }
}

/// `id[..] = expr`: never a whole array on either side; otherwise identical
/// types or both numeric.
pub fn assign_elem(target: &Type, value: &Type) -> TypeResult<Type> {
    if target.is_array() || value.is_array() {
        return Err(TypeMismatch::Assign { target: target.clone(), value: value.clone() });
    }
    if target == value || (target.is_numeric() && value.is_numeric()) {
        Ok(value.clone())
    } else {
        Err(TypeMismatch::Assign { target: target.clone(), value: value.clone() })
    }
}

pub fn condition(construct: &'static str, found: &Type) -> TypeResult<()> {
    if *found == Type::Bool {
        Ok(())
    } else {
        Err(TypeMismatch::Condition { construct, found: found.clone() })
    }
}

/// Element type selected by one more index.
pub fn index(indexed: &Type) -> TypeResult<Type> {
    indexed.element().cloned().ok_or_else(|| TypeMismatch::NotAnArray(indexed.clone()))
}
