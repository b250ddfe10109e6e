//! Callee names the translator recognizes.

use crate::graph::GraphOp;

/// Prefix of one-argument non-differentiable callbacks.
pub const DISCRETE_PREFIX: &str = "discrete_";

/// Prefix of user-defined atomic functions.
pub const ATOMIC_PREFIX: &str = "atomic_";

/// The external name a call must use to reach `op`, if calls can reach it.
pub fn callee_name(op: GraphOp) -> Option<&'static str> {
    match op {
        GraphOp::Acos
        | GraphOp::Acosh
        | GraphOp::Asin
        | GraphOp::Asinh
        | GraphOp::Atan
        | GraphOp::Atanh
        | GraphOp::Cos
        | GraphOp::Cosh
        | GraphOp::Erf
        | GraphOp::Erfc
        | GraphOp::Exp
        | GraphOp::Expm1
        | GraphOp::Log1p
        | GraphOp::Log
        | GraphOp::Pow
        | GraphOp::Sin
        | GraphOp::Sinh
        | GraphOp::Sqrt
        | GraphOp::Tan
        | GraphOp::Tanh => Some(op.name()),
        GraphOp::Azmul => Some("cppad_link_azmul"),
        GraphOp::Abs => Some("cppad_link_fabs"),
        GraphOp::Sign => Some("cppad_link_sign"),
        _ => None,
    }
}

/// Operator called by `name`.
pub fn lookup(name: &str) -> Option<GraphOp> {
    GraphOp::ALL
        .iter()
        .copied()
        .find(|&op| callee_name(op) == Some(name))
}

/// `name` without `prefix`, when it has the prefix and something after it.
pub fn strip_reserved<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}
