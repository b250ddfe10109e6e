//! Source IR consumed by the translator.
//!
//! A small typed SSA representation in the shape of LLVM IR: values live
//! in a per-function arena and are referenced by `ValueRef` indices, never
//! by pointer. Constants get a fresh handle per occurrence unless the
//! producer reuses one, so identity is the only notion of sameness.
//!
//! Functions follow a fixed six-argument calling convention, see
//! [`CallingConvention`].

mod builder;
mod function;
mod instruction;
pub mod parse;

use std::fmt;

pub use builder::Builder;
pub use function::{Function, Module};
pub use instruction::{FloatPredicate, Instruction, IntPredicate, Opcode, Predicate};

/// Reference to a value (argument, constant, symbol, label or instruction
/// result) in a function's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueRef(pub(crate) u32);

impl ValueRef {
    /// Raw index into the value arena.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Reference to an instruction in program order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstRef(pub(crate) u32);

impl InstRef {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Void,
    /// 64-bit IEEE float.
    Double,
    /// 32-bit IEEE float.
    Float,
    Int(u32),
    Ptr,
    Label,
    Array(u64, Box<Type>),
}

impl Type {
    pub fn is_double(&self) -> bool {
        matches!(self, Type::Double)
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int(_))
    }

    pub fn is_ptr(&self) -> bool {
        matches!(self, Type::Ptr)
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Type::Label)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Double => write!(f, "double"),
            Type::Float => write!(f, "float"),
            Type::Int(bits) => write!(f, "i{}", bits),
            Type::Ptr => write!(f, "ptr"),
            Type::Label => write!(f, "label"),
            Type::Array(len, elem) => write!(f, "[{} x {}]", len, elem),
        }
    }
}

/// What a value is.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// Function argument by position.
    Argument(u32),
    ConstFloat(f64),
    ConstInt(u64),
    /// A function symbol, used as callee operand.
    Function(String),
    /// A basic block label, used as branch target.
    Block(String),
    /// Result of an instruction.
    Inst(InstRef),
}

/// Arena entry for one value.
#[derive(Debug, Clone)]
pub struct ValueData {
    pub kind: ValueKind,
    pub ty: Type,
    pub name: Option<String>,
}

/// Positions of the six arguments every translated function takes.
pub struct CallingConvention;

impl CallingConvention {
    pub const INPUT_LEN: usize = 0;
    pub const INPUT: usize = 1;
    pub const OUTPUT_LEN: usize = 2;
    pub const OUTPUT: usize = 3;
    pub const MESSAGE_LEN: usize = 4;
    pub const MESSAGE: usize = 5;
    pub const ARITY: usize = 6;

    /// Argument types in order: `(i64, ptr, i64, ptr, i64, ptr)`.
    pub fn argument_types() -> [Type; 6] {
        [
            Type::Int(64),
            Type::Ptr,
            Type::Int(64),
            Type::Ptr,
            Type::Int(64),
            Type::Ptr,
        ]
    }
}
