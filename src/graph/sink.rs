//! The append-only contract a translator writes through.

use super::GraphOp;

/// Receives graph structure in construction order.
///
/// Implementations only ever append; nothing emitted through this trait is
/// edited afterwards. `push_operator` starts a new operator and every
/// following `push_operator_arg` belongs to it until the next operator.
pub trait GraphSink {
    /// Drop all content and return to the empty state.
    fn initialize(&mut self);

    fn set_function_name(&mut self, name: &str);
    fn set_n_dynamic_ind(&mut self, n: usize);
    fn set_n_variable_ind(&mut self, n: usize);

    fn constant_count(&self) -> usize;
    fn push_constant(&mut self, value: f64);

    fn push_operator(&mut self, op: GraphOp);
    fn push_operator_arg(&mut self, arg: usize);

    fn atomic_name_count(&self) -> usize;
    fn atomic_name(&self, index: usize) -> &str;
    fn push_atomic_name(&mut self, name: &str);

    fn discrete_name_count(&self) -> usize;
    fn discrete_name(&self, index: usize) -> &str;
    fn push_discrete_name(&mut self, name: &str);

    fn push_dependent(&mut self, node: usize);
}

/// Index of `name` in the atomic name table, appending it on first sight.
pub fn intern_atomic_name<S: GraphSink + ?Sized>(sink: &mut S, name: &str) -> usize {
    let count = sink.atomic_name_count();
    if let Some(index) = (0..count).find(|&i| sink.atomic_name(i) == name) {
        return index;
    }
    sink.push_atomic_name(name);
    count
}

/// Index of `name` in the discrete name table, appending it on first sight.
pub fn intern_discrete_name<S: GraphSink + ?Sized>(sink: &mut S, name: &str) -> usize {
    let count = sink.discrete_name_count();
    if let Some(index) = (0..count).find(|&i| sink.discrete_name(i) == name) {
        return index;
    }
    sink.push_discrete_name(name);
    count
}
