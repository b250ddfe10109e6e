//! Graph operator tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operator tag of a graph operator.
///
/// The discriminants are stable and match the order of [`GraphOp::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GraphOp {
    Abs = 0,
    Acos = 1,
    Acosh = 2,
    Add = 3,
    Asin = 4,
    Asinh = 5,
    Atan = 6,
    Atanh = 7,
    /// Atomic function call: `(name_index, n_result, n_arg, arg...)`.
    Atom = 8,
    /// Atomic function call: `(name_index, call_id, n_result, n_arg, arg...)`.
    Atom4 = 9,
    Azmul = 10,
    CexpEq = 11,
    CexpLe = 12,
    CexpLt = 13,
    CompEq = 14,
    CompLe = 15,
    CompLt = 16,
    CompNe = 17,
    Cos = 18,
    Cosh = 19,
    /// Discrete function call: `(name_index, arg)`.
    Discrete = 20,
    Div = 21,
    Erf = 22,
    Erfc = 23,
    Exp = 24,
    Expm1 = 25,
    Log1p = 26,
    Log = 27,
    Mul = 28,
    Neg = 29,
    Pow = 30,
    Print = 31,
    Sign = 32,
    Sin = 33,
    Sinh = 34,
    Sqrt = 35,
    Sub = 36,
    Sum = 37,
    Tan = 38,
    Tanh = 39,
}

pub const NUM_GRAPH_OPS: usize = 40;

impl GraphOp {
    /// Every operator, in discriminant order.
    pub const ALL: [GraphOp; NUM_GRAPH_OPS] = [
        GraphOp::Abs,
        GraphOp::Acos,
        GraphOp::Acosh,
        GraphOp::Add,
        GraphOp::Asin,
        GraphOp::Asinh,
        GraphOp::Atan,
        GraphOp::Atanh,
        GraphOp::Atom,
        GraphOp::Atom4,
        GraphOp::Azmul,
        GraphOp::CexpEq,
        GraphOp::CexpLe,
        GraphOp::CexpLt,
        GraphOp::CompEq,
        GraphOp::CompLe,
        GraphOp::CompLt,
        GraphOp::CompNe,
        GraphOp::Cos,
        GraphOp::Cosh,
        GraphOp::Discrete,
        GraphOp::Div,
        GraphOp::Erf,
        GraphOp::Erfc,
        GraphOp::Exp,
        GraphOp::Expm1,
        GraphOp::Log1p,
        GraphOp::Log,
        GraphOp::Mul,
        GraphOp::Neg,
        GraphOp::Pow,
        GraphOp::Print,
        GraphOp::Sign,
        GraphOp::Sin,
        GraphOp::Sinh,
        GraphOp::Sqrt,
        GraphOp::Sub,
        GraphOp::Sum,
        GraphOp::Tan,
        GraphOp::Tanh,
    ];

    /// Canonical operator name.
    pub fn name(self) -> &'static str {
        match self {
            GraphOp::Abs => "abs",
            GraphOp::Acos => "acos",
            GraphOp::Acosh => "acosh",
            GraphOp::Add => "add",
            GraphOp::Asin => "asin",
            GraphOp::Asinh => "asinh",
            GraphOp::Atan => "atan",
            GraphOp::Atanh => "atanh",
            GraphOp::Atom => "atom",
            GraphOp::Atom4 => "atom4",
            GraphOp::Azmul => "azmul",
            GraphOp::CexpEq => "cexp_eq",
            GraphOp::CexpLe => "cexp_le",
            GraphOp::CexpLt => "cexp_lt",
            GraphOp::CompEq => "comp_eq",
            GraphOp::CompLe => "comp_le",
            GraphOp::CompLt => "comp_lt",
            GraphOp::CompNe => "comp_ne",
            GraphOp::Cos => "cos",
            GraphOp::Cosh => "cosh",
            GraphOp::Discrete => "discrete",
            GraphOp::Div => "div",
            GraphOp::Erf => "erf",
            GraphOp::Erfc => "erfc",
            GraphOp::Exp => "exp",
            GraphOp::Expm1 => "expm1",
            GraphOp::Log1p => "log1p",
            GraphOp::Log => "log",
            GraphOp::Mul => "mul",
            GraphOp::Neg => "neg",
            GraphOp::Pow => "pow",
            GraphOp::Print => "print",
            GraphOp::Sign => "sign",
            GraphOp::Sin => "sin",
            GraphOp::Sinh => "sinh",
            GraphOp::Sqrt => "sqrt",
            GraphOp::Sub => "sub",
            GraphOp::Sum => "sum",
            GraphOp::Tan => "tan",
            GraphOp::Tanh => "tanh",
        }
    }

    /// True for the comparison operators. They record a condition and
    /// never produce a node.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            GraphOp::CompEq | GraphOp::CompLe | GraphOp::CompLt | GraphOp::CompNe
        )
    }

    /// Number of result nodes this operator produces, given its arguments.
    ///
    /// `atom` and `atom4` carry their result count in their argument prefix.
    pub fn result_count(self, args: &[usize]) -> usize {
        match self {
            op if op.is_comparison() => 0,
            GraphOp::Print => 0,
            GraphOp::Atom => args.get(1).copied().unwrap_or(0),
            GraphOp::Atom4 => args.get(2).copied().unwrap_or(0),
            _ => 1,
        }
    }

    /// Leading arguments that are not node ids (name indices and counts).
    pub fn non_node_args(self) -> usize {
        match self {
            GraphOp::Atom => 3,
            GraphOp::Atom4 => 4,
            GraphOp::Discrete => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for GraphOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_ops_are_in_discriminant_order() {
        for (i, op) in GraphOp::ALL.iter().enumerate() {
            assert_eq!(*op as usize, i, "{} out of order", op);
        }
        assert_eq!(GraphOp::Tanh as usize, NUM_GRAPH_OPS - 1);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = GraphOp::ALL.iter().map(|op| op.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), NUM_GRAPH_OPS);
    }

    #[test]
    fn result_counts() {
        assert_eq!(GraphOp::Add.result_count(&[1, 2]), 1);
        assert_eq!(GraphOp::CompLt.result_count(&[1, 2]), 0);
        assert_eq!(GraphOp::Atom.result_count(&[0, 3, 1, 4]), 3);
        assert_eq!(GraphOp::Atom4.result_count(&[0, 7, 2, 1, 4]), 2);
        assert_eq!(GraphOp::Discrete.result_count(&[0, 1]), 1);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(format!("{}", GraphOp::CexpLe), "cexp_le");
        assert_eq!(GraphOp::Log1p.to_string(), "log1p");
    }
}
