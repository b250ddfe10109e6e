//! Instruction definitions.

use std::fmt;

use super::ValueRef;
use crate::span::Span;

/// Float comparison predicates (ordered `o*`, unordered `u*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatPredicate {
    False,
    Oeq,
    Ogt,
    Oge,
    Olt,
    Ole,
    One,
    Ord,
    Uno,
    Ueq,
    Ugt,
    Uge,
    Ult,
    Ule,
    Une,
    True,
}

impl FloatPredicate {
    pub fn name(self) -> &'static str {
        match self {
            FloatPredicate::False => "false",
            FloatPredicate::Oeq => "oeq",
            FloatPredicate::Ogt => "ogt",
            FloatPredicate::Oge => "oge",
            FloatPredicate::Olt => "olt",
            FloatPredicate::Ole => "ole",
            FloatPredicate::One => "one",
            FloatPredicate::Ord => "ord",
            FloatPredicate::Uno => "uno",
            FloatPredicate::Ueq => "ueq",
            FloatPredicate::Ugt => "ugt",
            FloatPredicate::Uge => "uge",
            FloatPredicate::Ult => "ult",
            FloatPredicate::Ule => "ule",
            FloatPredicate::Une => "une",
            FloatPredicate::True => "true",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "false" => FloatPredicate::False,
            "oeq" => FloatPredicate::Oeq,
            "ogt" => FloatPredicate::Ogt,
            "oge" => FloatPredicate::Oge,
            "olt" => FloatPredicate::Olt,
            "ole" => FloatPredicate::Ole,
            "one" => FloatPredicate::One,
            "ord" => FloatPredicate::Ord,
            "uno" => FloatPredicate::Uno,
            "ueq" => FloatPredicate::Ueq,
            "ugt" => FloatPredicate::Ugt,
            "uge" => FloatPredicate::Uge,
            "ult" => FloatPredicate::Ult,
            "ule" => FloatPredicate::Ule,
            "une" => FloatPredicate::Une,
            "true" => FloatPredicate::True,
            _ => return None,
        })
    }
}

/// Integer comparison predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntPredicate {
    Eq,
    Ne,
    Ugt,
    Uge,
    Ult,
    Ule,
    Sgt,
    Sge,
    Slt,
    Sle,
}

impl IntPredicate {
    pub fn name(self) -> &'static str {
        match self {
            IntPredicate::Eq => "eq",
            IntPredicate::Ne => "ne",
            IntPredicate::Ugt => "ugt",
            IntPredicate::Uge => "uge",
            IntPredicate::Ult => "ult",
            IntPredicate::Ule => "ule",
            IntPredicate::Sgt => "sgt",
            IntPredicate::Sge => "sge",
            IntPredicate::Slt => "slt",
            IntPredicate::Sle => "sle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "eq" => IntPredicate::Eq,
            "ne" => IntPredicate::Ne,
            "ugt" => IntPredicate::Ugt,
            "uge" => IntPredicate::Uge,
            "ult" => IntPredicate::Ult,
            "ule" => IntPredicate::Ule,
            "sgt" => IntPredicate::Sgt,
            "sge" => IntPredicate::Sge,
            "slt" => IntPredicate::Slt,
            "sle" => IntPredicate::Sle,
            _ => return None,
        })
    }
}

/// Comparison predicate of an `fcmp` or `icmp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    Float(FloatPredicate),
    Int(IntPredicate),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Float(p) => write!(f, "{}", p.name()),
            Predicate::Int(p) => write!(f, "{}", p.name()),
        }
    }
}

/// Instruction opcodes.
///
/// Operand layout per opcode (the order of `Instruction::operands`):
/// - `Load`: `[ptr]`
/// - `Store`: `[value, ptr]`
/// - `GetElementPtr`: `[base, index...]`
/// - binary float ops, `FCmp`, `ICmp`, `Or`: `[lhs, rhs]`
/// - `FNeg`, `ZExt`: `[value]`
/// - `Select`: `[condition, if_true, if_false]`
/// - `Call`: `[arg..., callee]`
/// - `Br`: `[condition, then, else]` or `[target]`
/// - `Ret`: `[value]` or `[]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Opcode {
    Alloca,
    Load,
    Store,
    GetElementPtr,
    FAdd,
    FSub,
    FMul,
    FDiv,
    FNeg,
    FCmp,
    ICmp,
    ZExt,
    Or,
    Select,
    Call,
    Br,
    Ret,
    /// Any opcode outside the supported subset, by its textual name.
    Other(String),
}

impl Opcode {
    pub fn name(&self) -> &str {
        match self {
            Opcode::Alloca => "alloca",
            Opcode::Load => "load",
            Opcode::Store => "store",
            Opcode::GetElementPtr => "getelementptr",
            Opcode::FAdd => "fadd",
            Opcode::FSub => "fsub",
            Opcode::FMul => "fmul",
            Opcode::FDiv => "fdiv",
            Opcode::FNeg => "fneg",
            Opcode::FCmp => "fcmp",
            Opcode::ICmp => "icmp",
            Opcode::ZExt => "zext",
            Opcode::Or => "or",
            Opcode::Select => "select",
            Opcode::Call => "call",
            Opcode::Br => "br",
            Opcode::Ret => "ret",
            Opcode::Other(name) => name,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One instruction in program order.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<ValueRef>,
    /// The value this instruction defines, if any.
    pub result: Option<ValueRef>,
    /// Set for `FCmp` and `ICmp`.
    pub predicate: Option<Predicate>,
    /// Source location when read from text, dummy otherwise.
    pub span: Span,
}

impl Instruction {
    pub fn operand(&self, index: usize) -> Option<ValueRef> {
        self.operands.get(index).copied()
    }

    /// Callee operand of a call (always the last operand).
    pub fn callee(&self) -> Option<ValueRef> {
        match self.opcode {
            Opcode::Call => self.operands.last().copied(),
            _ => None,
        }
    }

    /// Call arguments, without the callee.
    pub fn call_args(&self) -> &[ValueRef] {
        match self.opcode {
            Opcode::Call if !self.operands.is_empty() => {
                &self.operands[..self.operands.len() - 1]
            }
            _ => &[],
        }
    }
}
