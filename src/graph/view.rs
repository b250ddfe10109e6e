//! Dataflow view of a graph for inspection and DOT export.
//!
//! Every graph node becomes a vertex; operators that produce no node
//! (comparisons) get a vertex of their own so their inputs stay visible.
//! Edges run from argument to consumer and are labeled with the argument
//! position.

use std::collections::HashMap;
use std::fmt;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::{Graph, NodeId};

/// A vertex of the dataflow view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    Dynamic(usize),
    Variable(usize),
    Constant(f64),
    /// Result of an operator; `result` is 0 except for multi-result calls.
    Result { op: String, node: NodeId, result: usize },
    /// Operator without a result node.
    Effect { op: String },
}

impl fmt::Display for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewNode::Dynamic(i) => write!(f, "p{}", i),
            ViewNode::Variable(i) => write!(f, "x{}", i),
            ViewNode::Constant(v) => write!(f, "{:?}", v),
            ViewNode::Result { op, node, result: 0 } => write!(f, "{} = {}", node, op),
            ViewNode::Result { op, node, result } => write!(f, "{} = {}#{}", node, op, result),
            ViewNode::Effect { op } => write!(f, "{}", op),
        }
    }
}

/// Dataflow graph built from a [`Graph`].
pub struct DataflowView {
    pub graph: DiGraph<ViewNode, usize>,
    nodes: HashMap<NodeId, NodeIndex>,
}

impl DataflowView {
    pub fn from_graph(source: &Graph) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        let mut next: NodeId = 1;

        for i in 0..source.n_dynamic_ind() {
            nodes.insert(next, graph.add_node(ViewNode::Dynamic(i)));
            next += 1;
        }
        for i in 0..source.n_variable_ind() {
            nodes.insert(next, graph.add_node(ViewNode::Variable(i)));
            next += 1;
        }
        for &value in source.constants() {
            nodes.insert(next, graph.add_node(ViewNode::Constant(value)));
            next += 1;
        }

        for operator in source.operators() {
            let op = operator.op.to_string();
            let count = operator.result_count();
            let targets: Vec<NodeIndex> = if count == 0 {
                vec![graph.add_node(ViewNode::Effect { op })]
            } else {
                (0..count)
                    .map(|result| {
                        let index = graph.add_node(ViewNode::Result {
                            op: op.clone(),
                            node: next,
                            result,
                        });
                        nodes.insert(next, index);
                        next += 1;
                        index
                    })
                    .collect()
            };
            for (position, arg) in operator.node_args().iter().enumerate() {
                if let Some(&from) = nodes.get(arg) {
                    for &to in &targets {
                        graph.add_edge(from, to, position);
                    }
                }
            }
        }

        Self { graph, nodes }
    }

    /// Vertex of a graph node id, if it exists.
    pub fn vertex(&self, node: NodeId) -> Option<NodeIndex> {
        self.nodes.get(&node).copied()
    }

    /// Node ids feeding `node`, ordered by argument position.
    pub fn inputs_of(&self, node: NodeId) -> Vec<NodeId> {
        let Some(index) = self.vertex(node) else {
            return Vec::new();
        };
        let mut inputs: Vec<(usize, NodeId)> = self
            .graph
            .edges_directed(index, petgraph::Direction::Incoming)
            .filter_map(|edge| {
                let source = edge.source();
                self.nodes
                    .iter()
                    .find(|(_, v)| **v == source)
                    .map(|(id, _)| (*edge.weight(), *id))
            })
            .collect();
        inputs.sort();
        inputs.into_iter().map(|(_, id)| id).collect()
    }

    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Render as Graphviz DOT.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphOp, GraphSink};

    fn sample() -> Graph {
        let mut g = Graph::new();
        g.set_n_variable_ind(2);
        g.push_constant(1.5);
        g.push_operator(GraphOp::Sub);
        g.push_operator_arg(3);
        g.push_operator_arg(1);
        g.push_operator(GraphOp::CompLe);
        g.push_operator_arg(2);
        g.push_operator_arg(4);
        g.push_dependent(4);
        g
    }

    #[test]
    fn view_has_vertex_per_node_and_effect() {
        let view = DataflowView::from_graph(&sample());
        // x0, x1, const, sub result, comp_le effect
        assert_eq!(view.graph.node_count(), 5);
        assert_eq!(view.graph.edge_count(), 4);
        assert!(view.is_acyclic());
    }

    #[test]
    fn inputs_follow_argument_order() {
        let view = DataflowView::from_graph(&sample());
        assert_eq!(view.inputs_of(4), vec![3, 1]);
        assert!(view.inputs_of(1).is_empty());
    }

    #[test]
    fn dot_output_names_operators() {
        let dot = DataflowView::from_graph(&sample()).to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("4 = sub"));
        assert!(dot.contains("comp_le"));
    }
}
