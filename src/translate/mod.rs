//! Lowering of an IR function into a graph.
//!
//! Two passes over the instructions. The first pools float literals into
//! constant nodes and registers the argument buffers of atomic calls; the
//! second walks the instructions in program order and emits operators.
//! Node ids are handed out strictly increasing, one per emitted result.
//!
//! Comparisons are not emitted where they appear. They are remembered and
//! materialized by the `zext`/`or` or `select` that consumes them, and
//! addresses into scattered buffers are remembered until a store writes
//! through them.

mod context;
mod deferred;
pub mod names;
mod tables;

#[cfg(test)]
mod tests;

use tracing::{debug, trace};

use crate::error::{Result, TranslateError};
use crate::graph::{
    intern_atomic_name, intern_discrete_name, Graph, GraphOp, GraphSink, NodeId, MAX_NODE_ID,
};
use crate::ir::{CallingConvention, Function, Instruction, Opcode, Type, ValueRef};

pub use context::TranslationContext;
pub use deferred::{DeferredCompare, ElementRef};
pub use tables::Layout;

use deferred::Deferred;
use tables::Tables;

/// Translate `func` into `sink`.
///
/// The sink is initialized first. On error its content is partial and must
/// be discarded.
pub fn translate<S: GraphSink + ?Sized>(
    func: &Function,
    ctx: &TranslationContext,
    sink: &mut S,
) -> Result<()> {
    Translator::new(func, ctx, sink).run()
}

/// Translate `func` into a fresh [`Graph`].
pub fn translate_to_graph(func: &Function, ctx: &TranslationContext) -> Result<Graph> {
    let mut graph = Graph::new();
    translate(func, ctx, &mut graph)?;
    Ok(graph)
}

struct Translator<'a, S: ?Sized> {
    func: &'a Function,
    ctx: &'a TranslationContext,
    sink: &'a mut S,
    tables: Tables,
    deferred: Deferred,
    /// Last node id handed out.
    result_node: NodeId,
    /// Index of the instruction being lowered, for error reports.
    inst: usize,
    seen_zext: bool,
}

impl<'a, S: GraphSink + ?Sized> Translator<'a, S> {
    fn new(func: &'a Function, ctx: &'a TranslationContext, sink: &'a mut S) -> Self {
        Self {
            func,
            ctx,
            sink,
            tables: Tables::new(),
            deferred: Deferred::new(),
            result_node: 0,
            inst: 0,
            seen_zext: false,
        }
    }

    fn run(mut self) -> Result<()> {
        self.sink.initialize();
        self.sink.set_function_name(&self.ctx.function_name);
        self.sink.set_n_dynamic_ind(self.ctx.n_dynamic_ind);
        self.sink.set_n_variable_ind(self.ctx.n_variable_ind);

        let (input, output) = self.buffer_arguments()?;
        self.discover()?;
        self.bind_buffers(input, output)?;

        self.inst = 0;
        self.result_node = self.ctx.n_independent();
        self.reserve(self.sink.constant_count())?;
        let func = self.func;
        for (index, inst) in func.instructions().iter().enumerate() {
            self.inst = index;
            self.lower(inst)?;
        }
        debug!(
            function = %self.ctx.function_name,
            nodes = self.result_node,
            "graph built"
        );

        self.finish(output)
    }

    /// Input and output buffer arguments of the calling convention.
    fn buffer_arguments(&self) -> Result<(ValueRef, ValueRef)> {
        let args = self.func.args();
        if args.len() != CallingConvention::ARITY {
            return Err(self.malformed(format!(
                "function takes {} arguments, expected {}",
                args.len(),
                CallingConvention::ARITY
            )));
        }
        let input = args[CallingConvention::INPUT];
        let output = args[CallingConvention::OUTPUT];
        for (arg, what) in [(input, "input"), (output, "output")] {
            if !self.func.ty(arg).is_ptr() {
                return Err(self.malformed(format!("{} buffer argument is not a pointer", what)));
            }
        }
        Ok((input, output))
    }

    // --- Pass 1 ---

    /// Pool float literals and register atomic-call argument buffers.
    fn discover(&mut self) -> Result<()> {
        let func = self.func;
        let n_independent = self.ctx.n_independent();
        if n_independent >= MAX_NODE_ID {
            return Err(self.malformed(format!(
                "{} independent variables exceed the node limit {}",
                n_independent, MAX_NODE_ID
            )));
        }
        let first_constant = 1 + n_independent;
        let mut atomic_buffers = 0usize;

        for (index, inst) in func.instructions().iter().enumerate() {
            self.inst = index;
            for &operand in &inst.operands {
                let Some(value) = func.float_constant(operand) else {
                    continue;
                };
                if self.tables.has_value(operand) {
                    continue;
                }
                let node = first_constant + self.sink.constant_count();
                self.sink.push_constant(value);
                self.tables.bind_value(operand, node);
            }

            // Shape errors are reported when pass 2 reaches the call
            if is_atomic_shape(inst) && func.ty(inst.operands[1]).is_ptr() {
                let Some(n_arg) = func
                    .int_constant(inst.operands[0])
                    .and_then(|n| usize::try_from(n).ok())
                else {
                    continue;
                };
                let base = inst.operands[1];
                self.tables
                    .register_scattered(base, n_arg)
                    .map_err(|reason| self.malformed(reason))?;
                self.deferred
                    .record_element(base, ElementRef { base, offset: 0 });
                atomic_buffers += 1;
            }
        }

        debug!(
            constants = self.sink.constant_count(),
            atomic_buffers, "pass 1 complete"
        );
        Ok(())
    }

    fn bind_buffers(&mut self, input: ValueRef, output: ValueRef) -> Result<()> {
        self.inst = 0;
        self.tables
            .bind_contiguous(input, 1, self.ctx.n_independent())
            .map_err(|reason| self.malformed(format!("input buffer: {}", reason)))?;
        self.tables
            .register_scattered(output, self.ctx.n_dependent)
            .map_err(|reason| self.malformed(format!("output buffer: {}", reason)))?;
        self.deferred.record_element(
            output,
            ElementRef {
                base: output,
                offset: 0,
            },
        );
        Ok(())
    }

    // --- Pass 2 ---

    fn lower(&mut self, inst: &Instruction) -> Result<()> {
        match &inst.opcode {
            Opcode::Alloca => Ok(()),
            Opcode::Load => self.lower_load(inst),
            Opcode::GetElementPtr => self.lower_gep(inst),
            Opcode::Store => self.lower_store(inst),
            Opcode::FAdd => self.lower_binary(inst, GraphOp::Add),
            Opcode::FSub => self.lower_binary(inst, GraphOp::Sub),
            Opcode::FMul => self.lower_binary(inst, GraphOp::Mul),
            Opcode::FDiv => self.lower_binary(inst, GraphOp::Div),
            Opcode::FNeg => self.lower_neg(inst),
            Opcode::FCmp | Opcode::ICmp => self.record_compare(inst),
            Opcode::ZExt => {
                // The single zext defines the return value
                if self.seen_zext {
                    return Err(self.malformed("more than one zext instruction"));
                }
                self.seen_zext = true;
                self.lower_combine(inst)
            }
            Opcode::Or => self.lower_combine(inst),
            Opcode::Select => self.lower_select(inst),
            Opcode::Call => self.lower_call(inst),
            Opcode::Br => self.check_branch(inst),
            Opcode::Ret => self.check_return(inst),
            Opcode::Other(name) => Err(TranslateError::UnsupportedOpcode {
                opcode: name.clone(),
            }),
        }
    }

    fn lower_load(&mut self, inst: &Instruction) -> Result<()> {
        let [ptr] = self.operands::<1>(inst)?;
        self.expect_type(ptr, Type::is_ptr, "pointer")?;
        let node = self.tables.pointer_node(ptr).ok_or_else(|| {
            self.malformed(format!(
                "load through {}, which is not an input or result element",
                self.func.display_value(ptr)
            ))
        })?;
        let result = self.result(inst)?;
        self.tables.bind_value(result, node);
        Ok(())
    }

    fn lower_gep(&mut self, inst: &Instruction) -> Result<()> {
        let (base, offset) = match inst.operands.as_slice() {
            &[base, index] => (base, self.int_operand(index)?),
            // Array-typed form: `[N x double], ptr %a, i64 0, i64 k`
            &[base, first, index] if self.func.int_constant(first) == Some(0) => {
                (base, self.int_operand(index)?)
            }
            _ => {
                return Err(self.malformed(
                    "getelementptr expects a base pointer and one constant offset",
                ));
            }
        };
        self.expect_type(base, Type::is_ptr, "pointer")?;
        let result = self.result(inst)?;

        let contiguous = match self.tables.layout(base) {
            Some(layout) => match *layout {
                Layout::Contiguous { first, .. } => Some((first, layout.len())),
                Layout::Scattered { .. } => None,
            },
            None => {
                return Err(self.malformed(format!(
                    "getelementptr base {} is not a known buffer",
                    self.func.display_value(base)
                )));
            }
        };
        match contiguous {
            None => {
                self.deferred
                    .record_element(result, ElementRef { base, offset });
            }
            Some((first, len)) => {
                if offset >= len {
                    return Err(self.malformed(format!(
                        "offset {} is out of bounds for {} with {} elements",
                        offset,
                        self.func.display_value(base),
                        len
                    )));
                }
                let node = first.checked_add(offset).ok_or_else(|| {
                    self.malformed(format!("offset {} overflows the node ids", offset))
                })?;
                self.tables.bind_pointer(result, node);
            }
        }
        Ok(())
    }

    fn lower_store(&mut self, inst: &Instruction) -> Result<()> {
        let [value, dest] = self.operands::<2>(inst)?;
        if self.func.arg(CallingConvention::MESSAGE) == Some(dest) {
            return Ok(());
        }
        self.expect_type(value, Type::is_double, "double")?;
        self.expect_type(dest, Type::is_ptr, "pointer")?;
        let node = self.node(value)?;
        let element = self.deferred.element(dest).ok_or_else(|| {
            self.malformed(format!(
                "store through {}, which is not an output or argument element",
                self.func.display_value(dest)
            ))
        })?;
        self.tables
            .store(element.base, element.offset, node)
            .map_err(|reason| self.malformed(reason))
    }

    fn lower_binary(&mut self, inst: &Instruction, op: GraphOp) -> Result<()> {
        let [lhs, rhs] = self.operands::<2>(inst)?;
        self.expect_type(lhs, Type::is_double, "double")?;
        self.expect_type(rhs, Type::is_double, "double")?;
        let args = [self.node(lhs)?, self.node(rhs)?];
        self.emit_result(inst, op, &args)
    }

    fn lower_neg(&mut self, inst: &Instruction) -> Result<()> {
        let [operand] = self.operands::<1>(inst)?;
        self.expect_type(operand, Type::is_double, "double")?;
        let arg = self.node(operand)?;
        self.emit_result(inst, GraphOp::Neg, &[arg])
    }

    fn record_compare(&mut self, inst: &Instruction) -> Result<()> {
        let [left, right] = self.operands::<2>(inst)?;
        for operand in [left, right] {
            if inst.opcode == Opcode::FCmp {
                self.expect_type(operand, Type::is_double, "double")?;
            } else {
                self.expect_type(operand, Type::is_int, "integer")?;
            }
        }
        let predicate = inst
            .predicate
            .ok_or_else(|| self.malformed("comparison without a predicate"))?;
        let result = self.result(inst)?;
        self.deferred.record_compare(
            result,
            DeferredCompare {
                predicate,
                left,
                right,
            },
        );
        Ok(())
    }

    /// `zext`/`or` over recorded comparisons. Each comparison operand is
    /// emitted as a comparison operator; no node is allocated for it.
    fn lower_combine(&mut self, inst: &Instruction) -> Result<()> {
        if inst.operands.len() > 2 {
            return Err(self.malformed(format!(
                "{} with {} operands",
                inst.opcode,
                inst.operands.len()
            )));
        }
        for &operand in &inst.operands {
            let Some(compare) = self.deferred.compare(operand) else {
                continue;
            };
            let op = compare.comparison_op().ok_or_else(|| {
                self.malformed(format!(
                    "predicate {} cannot be combined into a comparison",
                    compare.predicate
                ))
            })?;
            let args = [self.node(compare.right)?, self.node(compare.left)?];
            self.emit(op, &args);
        }
        Ok(())
    }

    fn lower_select(&mut self, inst: &Instruction) -> Result<()> {
        let [cond, if_true, if_false] = self.operands::<3>(inst)?;
        let compare = self.deferred.compare(cond).ok_or_else(|| {
            self.malformed(format!(
                "select condition {} is not a comparison",
                self.func.display_value(cond)
            ))
        })?;
        if !self.func.ty(if_true).is_double() {
            // Selection between error codes, not part of the graph
            return Ok(());
        }
        self.expect_type(if_false, Type::is_double, "double")?;
        self.expect_type(compare.left, Type::is_double, "double")?;
        self.expect_type(compare.right, Type::is_double, "double")?;
        let op = compare.conditional_op().ok_or_else(|| {
            self.malformed(format!(
                "predicate {} cannot drive a conditional expression",
                compare.predicate
            ))
        })?;
        let args = [
            self.node(compare.left)?,
            self.node(compare.right)?,
            self.node(if_true)?,
            self.node(if_false)?,
        ];
        self.emit_result(inst, op, &args)
    }

    fn lower_call(&mut self, inst: &Instruction) -> Result<()> {
        let func = self.func;
        let callee = inst
            .callee()
            .ok_or_else(|| self.malformed("call without a callee"))?;
        let name = func.symbol_name(callee).ok_or_else(|| {
            self.malformed(format!(
                "indirect call through {}",
                func.display_value(callee)
            ))
        })?;
        let args = inst.call_args();

        match args.len() {
            1 | 2 => {
                for &arg in args {
                    self.expect_type(arg, Type::is_double, "double")?;
                }
                if let Some(discrete) = names::strip_reserved(name, names::DISCRETE_PREFIX) {
                    if args.len() != 1 {
                        return Err(self.malformed(format!(
                            "discrete function {} takes one argument",
                            discrete
                        )));
                    }
                    let index = intern_discrete_name(self.sink, discrete);
                    let arg = self.node(args[0])?;
                    return self.emit_result(inst, GraphOp::Discrete, &[index, arg]);
                }
                let op = names::lookup(name).ok_or_else(|| TranslateError::UnresolvedCallee {
                    name: name.to_string(),
                })?;
                let nodes = args
                    .iter()
                    .map(|&arg| self.node(arg))
                    .collect::<Result<Vec<_>>>()?;
                self.emit_result(inst, op, &nodes)
            }
            CallingConvention::ARITY => self.lower_atomic_call(name, args),
            n => Err(self.malformed(format!("call to {} with {} arguments", name, n))),
        }
    }

    /// `atomic_<name>(n_arg, args, n_result, results, len_msg, msg)`.
    fn lower_atomic_call(&mut self, name: &str, args: &[ValueRef]) -> Result<()> {
        let atomic = names::strip_reserved(name, names::ATOMIC_PREFIX).ok_or_else(|| {
            TranslateError::UnresolvedCallee {
                name: name.to_string(),
            }
        })?;
        for (&arg, ty) in args.iter().zip(CallingConvention::argument_types()) {
            let matches = matches!(
                (self.func.ty(arg), &ty),
                (Type::Int(_), Type::Int(_)) | (Type::Ptr, Type::Ptr)
            );
            if !matches {
                return Err(self.malformed(format!(
                    "atomic call argument {} has type {}, expected {}",
                    self.func.display_value(arg),
                    self.func.ty(arg),
                    ty
                )));
            }
        }
        let n_arg = self.int_operand(args[0])?;
        let n_result = self.int_operand(args[2])?;
        let (arg_base, result_base) = (args[1], args[3]);

        let slots = self.tables.scattered(arg_base).ok_or_else(|| {
            self.malformed(format!(
                "atomic argument buffer {} was not registered",
                self.func.display_value(arg_base)
            ))
        })?;
        if slots.len() != n_arg {
            return Err(self.malformed(format!(
                "atomic argument buffer has {} slots, call passes {}",
                slots.len(),
                n_arg
            )));
        }
        let mut operator_args = slots.filled().map_err(|i| {
            self.malformed(format!(
                "argument {} of atomic function {} was never stored",
                i, atomic
            ))
        })?;

        let index = intern_atomic_name(self.sink, atomic);
        let mut full_args = vec![index, n_result, n_arg];
        full_args.append(&mut operator_args);
        self.emit(GraphOp::Atom, &full_args);

        let first = self.reserve(n_result)?;
        self.tables
            .bind_contiguous(result_base, first, n_result)
            .map_err(|reason| self.malformed(format!("atomic result buffer: {}", reason)))
    }

    fn check_branch(&self, inst: &Instruction) -> Result<()> {
        let ok = match inst.operands.as_slice() {
            &[target] => self.func.ty(target).is_label(),
            &[cond, then_block, else_block] => {
                self.func.ty(cond).is_int()
                    && self.func.ty(then_block).is_label()
                    && self.func.ty(else_block).is_label()
            }
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(self.malformed("br expects (i1, label, label) or (label)"))
        }
    }

    fn check_return(&self, inst: &Instruction) -> Result<()> {
        match inst.operands.as_slice() {
            &[value] if self.func.ty(value).is_int() => Ok(()),
            _ => Err(self.malformed("ret expects one integer operand")),
        }
    }

    // --- Finalizer ---

    fn finish(mut self, output: ValueRef) -> Result<()> {
        let dependents = self
            .tables
            .scattered(output)
            .ok_or_else(|| self.malformed("output buffer is not registered"))?
            .filled()
            .map_err(|index| TranslateError::IncompleteOutput { index })?;
        for node in dependents {
            self.sink.push_dependent(node);
        }
        Ok(())
    }

    // --- Helpers ---

    /// Emit an operator that produces one node and bind the instruction's
    /// result to it.
    fn emit_result(&mut self, inst: &Instruction, op: GraphOp, args: &[NodeId]) -> Result<()> {
        let result = self.result(inst)?;
        let node = self.reserve(1)?;
        self.tables.bind_value(result, node);
        self.emit(op, args);
        Ok(())
    }

    /// Hand out `count` fresh node ids and return the first one.
    fn reserve(&mut self, count: usize) -> Result<NodeId> {
        match self.result_node.checked_add(count) {
            Some(last) if last <= MAX_NODE_ID => {
                let first = self.result_node + 1;
                self.result_node = last;
                Ok(first)
            }
            _ => Err(self.malformed(format!(
                "{} more nodes after node {} exceed the node limit {}",
                count, self.result_node, MAX_NODE_ID
            ))),
        }
    }

    fn emit(&mut self, op: GraphOp, args: &[usize]) {
        trace!(inst = self.inst, %op, ?args, node = self.result_node, "emit");
        self.sink.push_operator(op);
        for &arg in args {
            self.sink.push_operator_arg(arg);
        }
    }

    fn node(&self, value: ValueRef) -> Result<NodeId> {
        self.tables.value_node(value).ok_or_else(|| {
            self.malformed(format!(
                "{} has no node",
                self.func.display_value(value)
            ))
        })
    }

    fn result(&self, inst: &Instruction) -> Result<ValueRef> {
        inst.result
            .ok_or_else(|| self.malformed(format!("{} has no result value", inst.opcode)))
    }

    fn operands<const N: usize>(&self, inst: &Instruction) -> Result<[ValueRef; N]> {
        <[ValueRef; N]>::try_from(inst.operands.as_slice()).map_err(|_| {
            self.malformed(format!(
                "{} expects {} operands, found {}",
                inst.opcode,
                N,
                inst.operands.len()
            ))
        })
    }

    fn int_operand(&self, value: ValueRef) -> Result<usize> {
        self.func
            .int_constant(value)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                self.malformed(format!(
                    "{} is not a non-negative integer constant",
                    self.func.display_value(value)
                ))
            })
    }

    fn expect_type(&self, value: ValueRef, check: fn(&Type) -> bool, expected: &str) -> Result<()> {
        let ty = self
            .func
            .try_value(value)
            .map(|data| &data.ty)
            .ok_or_else(|| self.malformed(format!("unknown value {}", value.index())))?;
        if check(ty) {
            Ok(())
        } else {
            Err(self.malformed(format!(
                "{} has type {}, expected {}",
                self.func.display_value(value),
                ty,
                expected
            )))
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> TranslateError {
        TranslateError::MalformedInput {
            inst: self.inst,
            reason: reason.into(),
        }
    }
}

/// A call with six arguments plus the callee.
fn is_atomic_shape(inst: &Instruction) -> bool {
    inst.opcode == Opcode::Call && inst.operands.len() == CallingConvention::ARITY + 1
}
