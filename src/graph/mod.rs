//! Flat, node-indexed computational graph.
//!
//! Node 0 is never used. Nodes `1..=D` are dynamic parameters, the next `V`
//! are independent variables, the next `C` are pooled constants and the
//! rest are operator results in operator order. An operator that produces
//! `k` results owns the next `k` node ids.

mod hash;
mod op;
mod sink;
mod view;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use hash::GraphHash;
pub use op::{GraphOp, NUM_GRAPH_OPS};
pub use sink::{intern_atomic_name, intern_discrete_name, GraphSink};
pub use view::{DataflowView, ViewNode};

/// Index of a node in the graph.
pub type NodeId = usize;

/// Largest node id a graph may use.
pub const MAX_NODE_ID: NodeId = u32::MAX as NodeId;

/// What a node id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Dynamic parameter, zero-based index.
    Dynamic(usize),
    /// Independent variable, zero-based index.
    Variable(usize),
    /// Constant pool entry, zero-based index.
    Constant(usize),
    /// Result `result` of operator `op`.
    Result { op: usize, result: usize },
}

/// A borrowed operator with its argument list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operator<'a> {
    pub op: GraphOp,
    pub args: &'a [usize],
}

impl Operator<'_> {
    /// Arguments that are node ids (skips name indices and counts).
    pub fn node_args(&self) -> &[usize] {
        let skip = self.op.non_node_args().min(self.args.len());
        &self.args[skip..]
    }

    pub fn result_count(&self) -> usize {
        self.op.result_count(self.args)
    }
}

/// Append-only graph container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    function_name: String,
    n_dynamic_ind: usize,
    n_variable_ind: usize,
    constants: Vec<f64>,
    operators: Vec<GraphOp>,
    /// Offset of each operator's first argument in `operator_args`.
    arg_start: Vec<usize>,
    operator_args: Vec<usize>,
    atomic_names: Vec<String>,
    discrete_names: Vec<String>,
    dependents: Vec<NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn n_dynamic_ind(&self) -> usize {
        self.n_dynamic_ind
    }

    pub fn n_variable_ind(&self) -> usize {
        self.n_variable_ind
    }

    pub fn constants(&self) -> &[f64] {
        &self.constants
    }

    pub fn atomic_names(&self) -> &[String] {
        &self.atomic_names
    }

    pub fn discrete_names(&self) -> &[String] {
        &self.discrete_names
    }

    pub fn dependents(&self) -> &[NodeId] {
        &self.dependents
    }

    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }

    /// The `index`-th operator, or `None` past the end.
    pub fn operator(&self, index: usize) -> Option<Operator<'_>> {
        let op = *self.operators.get(index)?;
        let start = *self.arg_start.get(index)?;
        let end = self
            .arg_start
            .get(index + 1)
            .copied()
            .unwrap_or(self.operator_args.len());
        Some(Operator {
            op,
            args: self.operator_args.get(start..end)?,
        })
    }

    pub fn operators(&self) -> impl Iterator<Item = Operator<'_>> + '_ {
        (0..self.operators.len()).filter_map(move |i| self.operator(i))
    }

    /// Number of nodes before the first operator result.
    pub fn n_leaf(&self) -> usize {
        self.n_dynamic_ind + self.n_variable_ind + self.constants.len()
    }

    /// Highest node id in use (0 for an empty graph).
    pub fn n_node(&self) -> usize {
        self.n_leaf()
            + self
                .operators()
                .map(|operator| operator.result_count())
                .sum::<usize>()
    }

    /// First result node of every operator, `None` for operators that
    /// produce no node.
    pub fn first_results(&self) -> Vec<Option<NodeId>> {
        let mut next = self.n_leaf() + 1;
        self.operators()
            .map(|operator| {
                let count = operator.result_count();
                let first = (count > 0).then_some(next);
                next += count;
                first
            })
            .collect()
    }

    /// Classify a node id. Returns `None` for 0 and ids past `n_node()`.
    pub fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        if node == 0 {
            return None;
        }
        let mut index = node - 1;
        if index < self.n_dynamic_ind {
            return Some(NodeKind::Dynamic(index));
        }
        index -= self.n_dynamic_ind;
        if index < self.n_variable_ind {
            return Some(NodeKind::Variable(index));
        }
        index -= self.n_variable_ind;
        if index < self.constants.len() {
            return Some(NodeKind::Constant(index));
        }
        index -= self.constants.len();
        for (op, operator) in self.operators().enumerate() {
            let count = operator.result_count();
            if index < count {
                return Some(NodeKind::Result { op, result: index });
            }
            index -= count;
        }
        None
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON, rejecting graphs whose operator layout or
    /// node count is inconsistent.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let graph: Graph = serde_json::from_str(text)?;
        graph.check_layout().map_err(serde::de::Error::custom)?;
        Ok(graph)
    }

    fn check_layout(&self) -> Result<(), String> {
        if self.arg_start.len() != self.operators.len() {
            return Err(format!(
                "{} operators but {} argument offsets",
                self.operators.len(),
                self.arg_start.len()
            ));
        }
        let mut previous = 0;
        for &start in &self.arg_start {
            if start < previous || start > self.operator_args.len() {
                return Err(format!("argument offset {} is out of order or range", start));
            }
            previous = start;
        }
        let mut nodes = self
            .n_dynamic_ind
            .checked_add(self.n_variable_ind)
            .and_then(|n| n.checked_add(self.constants.len()));
        for operator in self.operators() {
            nodes = nodes.and_then(|n| n.checked_add(operator.result_count()));
        }
        match nodes {
            Some(n) if n <= MAX_NODE_ID => Ok(()),
            _ => Err(format!("graph exceeds the node limit {}", MAX_NODE_ID)),
        }
    }
}

impl GraphSink for Graph {
    fn initialize(&mut self) {
        *self = Graph::default();
    }

    fn set_function_name(&mut self, name: &str) {
        self.function_name = name.to_string();
    }

    fn set_n_dynamic_ind(&mut self, n: usize) {
        self.n_dynamic_ind = n;
    }

    fn set_n_variable_ind(&mut self, n: usize) {
        self.n_variable_ind = n;
    }

    fn constant_count(&self) -> usize {
        self.constants.len()
    }

    fn push_constant(&mut self, value: f64) {
        self.constants.push(value);
    }

    fn push_operator(&mut self, op: GraphOp) {
        self.operators.push(op);
        self.arg_start.push(self.operator_args.len());
    }

    fn push_operator_arg(&mut self, arg: usize) {
        debug_assert!(!self.operators.is_empty(), "argument before any operator");
        self.operator_args.push(arg);
    }

    fn atomic_name_count(&self) -> usize {
        self.atomic_names.len()
    }

    fn atomic_name(&self, index: usize) -> &str {
        &self.atomic_names[index]
    }

    fn push_atomic_name(&mut self, name: &str) {
        self.atomic_names.push(name.to_string());
    }

    fn discrete_name_count(&self) -> usize {
        self.discrete_names.len()
    }

    fn discrete_name(&self, index: usize) -> &str {
        &self.discrete_names[index]
    }

    fn push_discrete_name(&mut self, name: &str) {
        self.discrete_names.push(name.to_string());
    }

    fn push_dependent(&mut self, node: usize) {
        self.dependents.push(node);
    }
}

// ─── Display ──────────────────────────────────────────────────────

fn join(nodes: &[usize]) -> String {
    nodes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "graph {}: dynamic={} variable={} constant={}",
            self.function_name,
            self.n_dynamic_ind,
            self.n_variable_ind,
            self.constants.len()
        )?;
        let first_constant = self.n_dynamic_ind + self.n_variable_ind + 1;
        for (i, value) in self.constants.iter().enumerate() {
            writeln!(f, "  {} = const {:?}", first_constant + i, value)?;
        }
        for (operator, first) in self.operators().zip(self.first_results()) {
            let name = match operator.op {
                GraphOp::Atom | GraphOp::Atom4 => operator
                    .args
                    .first()
                    .and_then(|&i| self.atomic_names.get(i))
                    .map(|s| format!("{}[{}]", operator.op, s)),
                GraphOp::Discrete => operator
                    .args
                    .first()
                    .and_then(|&i| self.discrete_names.get(i))
                    .map(|s| format!("{}[{}]", operator.op, s)),
                _ => None,
            }
            .unwrap_or_else(|| operator.op.to_string());
            let args = join(operator.node_args());
            match (first, operator.result_count()) {
                (Some(node), 1) => writeln!(f, "  {} = {}({})", node, name, args)?,
                (Some(node), count) => {
                    writeln!(f, "  {}..{} = {}({})", node, node + count - 1, name, args)?
                }
                (None, _) => writeln!(f, "  {}({})", name, args)?,
            }
        }
        write!(f, "dependent: {}", join(&self.dependents))
    }
}
