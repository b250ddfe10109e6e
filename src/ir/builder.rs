//! Builder API for constructing functions.
//!
//! Both the text reader and hand-written tests go through this builder, so
//! every instruction gets a result value of the right type in one place.

use std::collections::HashMap;

use super::{
    CallingConvention, FloatPredicate, Function, InstRef, Instruction, IntPredicate, Opcode,
    Predicate, Type, ValueKind, ValueRef,
};
use crate::span::Span;

/// Builder for a function's instruction stream.
pub struct Builder<'a> {
    func: &'a mut Function,
    symbols: HashMap<String, ValueRef>,
    labels: HashMap<String, ValueRef>,
    span: Span,
}

impl<'a> Builder<'a> {
    pub fn new(func: &'a mut Function) -> Self {
        Self {
            func,
            symbols: HashMap::new(),
            labels: HashMap::new(),
            span: Span::dummy(),
        }
    }

    /// Source span attached to subsequently pushed instructions.
    pub fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    // ── Values ──

    pub fn arg(&self, index: usize) -> ValueRef {
        self.func.args[index]
    }

    pub fn input(&self) -> ValueRef {
        self.arg(CallingConvention::INPUT)
    }

    pub fn output(&self) -> ValueRef {
        self.arg(CallingConvention::OUTPUT)
    }

    pub fn message(&self) -> ValueRef {
        self.arg(CallingConvention::MESSAGE)
    }

    /// A fresh float literal. Each call creates a distinct handle.
    pub fn fconst(&mut self, value: f64) -> ValueRef {
        self.func
            .push_value(ValueKind::ConstFloat(value), Type::Double, None)
    }

    /// A fresh integer literal of the given bit width.
    pub fn iconst(&mut self, bits: u32, value: u64) -> ValueRef {
        self.func
            .push_value(ValueKind::ConstInt(value), Type::Int(bits), None)
    }

    /// Function symbol by name; one handle per name.
    pub fn symbol(&mut self, name: &str) -> ValueRef {
        if let Some(&v) = self.symbols.get(name) {
            return v;
        }
        let v = self
            .func
            .push_value(ValueKind::Function(name.to_string()), Type::Ptr, Some(name));
        self.symbols.insert(name.to_string(), v);
        v
    }

    /// Block label by name; one handle per name, usable before the block.
    pub fn label(&mut self, name: &str) -> ValueRef {
        if let Some(&v) = self.labels.get(name) {
            return v;
        }
        let v = self
            .func
            .push_value(ValueKind::Block(name.to_string()), Type::Label, Some(name));
        self.labels.insert(name.to_string(), v);
        v
    }

    // ── Generic push ──

    /// Append an instruction. A result value of type `result_ty` is created
    /// unless the type is `Void`.
    pub fn push(
        &mut self,
        opcode: Opcode,
        operands: Vec<ValueRef>,
        result_ty: Type,
        predicate: Option<Predicate>,
        name: Option<&str>,
    ) -> Option<ValueRef> {
        let inst = InstRef(self.func.instructions.len() as u32);
        let result = match result_ty {
            Type::Void => None,
            ty => Some(self.func.push_value(ValueKind::Inst(inst), ty, name)),
        };
        self.func.instructions.push(Instruction {
            opcode,
            operands,
            result,
            predicate,
            span: self.span,
        });
        result
    }

    fn push_value_inst(&mut self, opcode: Opcode, operands: Vec<ValueRef>, ty: Type) -> ValueRef {
        match self.push(opcode, operands, ty.clone(), None, None) {
            Some(v) => v,
            None => unreachable!("{} produces a value", ty),
        }
    }

    // ── Memory ──

    pub fn alloca(&mut self) -> ValueRef {
        self.push_value_inst(Opcode::Alloca, vec![], Type::Ptr)
    }

    pub fn load(&mut self, ptr: ValueRef) -> ValueRef {
        self.push_value_inst(Opcode::Load, vec![ptr], Type::Double)
    }

    pub fn store(&mut self, value: ValueRef, ptr: ValueRef) {
        self.push(Opcode::Store, vec![value, ptr], Type::Void, None, None);
    }

    /// Address of element `offset` of `base`.
    pub fn gep(&mut self, base: ValueRef, offset: u64) -> ValueRef {
        let index = self.iconst(64, offset);
        self.push_value_inst(Opcode::GetElementPtr, vec![base, index], Type::Ptr)
    }

    // ── Arithmetic ──

    pub fn fadd(&mut self, a: ValueRef, b: ValueRef) -> ValueRef {
        self.push_value_inst(Opcode::FAdd, vec![a, b], Type::Double)
    }

    pub fn fsub(&mut self, a: ValueRef, b: ValueRef) -> ValueRef {
        self.push_value_inst(Opcode::FSub, vec![a, b], Type::Double)
    }

    pub fn fmul(&mut self, a: ValueRef, b: ValueRef) -> ValueRef {
        self.push_value_inst(Opcode::FMul, vec![a, b], Type::Double)
    }

    pub fn fdiv(&mut self, a: ValueRef, b: ValueRef) -> ValueRef {
        self.push_value_inst(Opcode::FDiv, vec![a, b], Type::Double)
    }

    pub fn fneg(&mut self, a: ValueRef) -> ValueRef {
        self.push_value_inst(Opcode::FNeg, vec![a], Type::Double)
    }

    // ── Comparison and selection ──

    pub fn fcmp(&mut self, pred: FloatPredicate, a: ValueRef, b: ValueRef) -> ValueRef {
        let v = self.push(
            Opcode::FCmp,
            vec![a, b],
            Type::Int(1),
            Some(Predicate::Float(pred)),
            None,
        );
        v.unwrap_or_else(|| unreachable!("fcmp produces a value"))
    }

    pub fn icmp(&mut self, pred: IntPredicate, a: ValueRef, b: ValueRef) -> ValueRef {
        let v = self.push(
            Opcode::ICmp,
            vec![a, b],
            Type::Int(1),
            Some(Predicate::Int(pred)),
            None,
        );
        v.unwrap_or_else(|| unreachable!("icmp produces a value"))
    }

    pub fn zext(&mut self, value: ValueRef, bits: u32) -> ValueRef {
        self.push_value_inst(Opcode::ZExt, vec![value], Type::Int(bits))
    }

    pub fn or(&mut self, a: ValueRef, b: ValueRef) -> ValueRef {
        let ty = self.func.ty(a).clone();
        self.push_value_inst(Opcode::Or, vec![a, b], ty)
    }

    pub fn select(&mut self, cond: ValueRef, if_true: ValueRef, if_false: ValueRef) -> ValueRef {
        let ty = self.func.ty(if_true).clone();
        self.push_value_inst(Opcode::Select, vec![cond, if_true, if_false], ty)
    }

    // ── Calls ──

    /// Call `callee` with `args`; returns the result unless `ret` is `Void`.
    pub fn call(&mut self, callee: &str, args: &[ValueRef], ret: Type) -> Option<ValueRef> {
        let callee = self.symbol(callee);
        let mut operands = args.to_vec();
        operands.push(callee);
        self.push(Opcode::Call, operands, ret, None, None)
    }

    /// Call a `double` function of one or two `double` arguments.
    pub fn call_math(&mut self, callee: &str, args: &[ValueRef]) -> ValueRef {
        self.call(callee, args, Type::Double)
            .unwrap_or_else(|| unreachable!("double call produces a value"))
    }

    /// Call an atomic function: `callee(n_arg, args, n_result, results, 0, msg)`.
    pub fn call_atomic(
        &mut self,
        callee: &str,
        n_arg: u64,
        args: ValueRef,
        n_result: u64,
        results: ValueRef,
    ) -> ValueRef {
        let n_arg = self.iconst(64, n_arg);
        let n_result = self.iconst(64, n_result);
        let len_msg = self.iconst(64, 0);
        let msg = self.message();
        self.call(
            callee,
            &[n_arg, args, n_result, results, len_msg, msg],
            Type::Int(32),
        )
        .unwrap_or_else(|| unreachable!("atomic call returns an error code"))
    }

    // ── Control flow ──

    pub fn br(&mut self, cond: ValueRef, then_label: &str, else_label: &str) {
        let then_block = self.label(then_label);
        let else_block = self.label(else_label);
        self.push(
            Opcode::Br,
            vec![cond, then_block, else_block],
            Type::Void,
            None,
            None,
        );
    }

    pub fn jump(&mut self, target: &str) {
        let target = self.label(target);
        self.push(Opcode::Br, vec![target], Type::Void, None, None);
    }

    pub fn ret(&mut self, value: ValueRef) {
        self.push(Opcode::Ret, vec![value], Type::Void, None, None);
    }

    /// Return the conventional success code `i32 0`.
    pub fn ret_ok(&mut self) {
        let zero = self.iconst(32, 0);
        self.ret(zero);
    }

    /// An instruction outside the supported subset.
    pub fn other(&mut self, opcode: &str, operands: Vec<ValueRef>, ty: Type) -> Option<ValueRef> {
        self.push(Opcode::Other(opcode.to_string()), operands, ty, None, None)
    }
}
