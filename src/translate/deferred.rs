//! State recorded by one instruction and consumed by a later one.

use std::collections::HashMap;

use crate::graph::GraphOp;
use crate::ir::{FloatPredicate, Predicate, ValueRef};

/// A comparison seen but not yet turned into an operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeferredCompare {
    pub predicate: Predicate,
    pub left: ValueRef,
    pub right: ValueRef,
}

impl DeferredCompare {
    /// Comparison operator for a compare consumed by `zext`/`or`. The
    /// operands are emitted swapped, hence the inverted names.
    pub fn comparison_op(&self) -> Option<GraphOp> {
        match self.predicate {
            Predicate::Float(FloatPredicate::One) => Some(GraphOp::CompEq),
            Predicate::Float(FloatPredicate::Olt) => Some(GraphOp::CompLe),
            Predicate::Float(FloatPredicate::Ole) => Some(GraphOp::CompLt),
            Predicate::Float(FloatPredicate::Oeq) => Some(GraphOp::CompNe),
            _ => None,
        }
    }

    /// Conditional-expression operator for a compare driving a `select`.
    pub fn conditional_op(&self) -> Option<GraphOp> {
        match self.predicate {
            Predicate::Float(FloatPredicate::Oeq) => Some(GraphOp::CexpEq),
            Predicate::Float(FloatPredicate::Ole) => Some(GraphOp::CexpLe),
            Predicate::Float(FloatPredicate::Olt) => Some(GraphOp::CexpLt),
            _ => None,
        }
    }
}

/// Element `offset` of the scattered buffer `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRef {
    pub base: ValueRef,
    pub offset: usize,
}

#[derive(Debug, Default)]
pub struct Deferred {
    compares: HashMap<ValueRef, DeferredCompare>,
    elements: HashMap<ValueRef, ElementRef>,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_compare(&mut self, result: ValueRef, compare: DeferredCompare) {
        self.compares.insert(result, compare);
    }

    pub fn compare(&self, value: ValueRef) -> Option<DeferredCompare> {
        self.compares.get(&value).copied()
    }

    pub fn record_element(&mut self, address: ValueRef, element: ElementRef) {
        self.elements.insert(address, element);
    }

    pub fn element(&self, address: ValueRef) -> Option<ElementRef> {
        self.elements.get(&address).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::IntPredicate;

    fn compare(predicate: Predicate) -> DeferredCompare {
        DeferredCompare {
            predicate,
            left: ValueRef(1),
            right: ValueRef(2),
        }
    }

    #[test]
    fn combine_table() {
        let cases = [
            (FloatPredicate::One, GraphOp::CompEq),
            (FloatPredicate::Olt, GraphOp::CompLe),
            (FloatPredicate::Ole, GraphOp::CompLt),
            (FloatPredicate::Oeq, GraphOp::CompNe),
        ];
        for (pred, op) in cases {
            assert_eq!(compare(Predicate::Float(pred)).comparison_op(), Some(op));
        }
        assert_eq!(
            compare(Predicate::Float(FloatPredicate::Ogt)).comparison_op(),
            None
        );
    }

    #[test]
    fn select_table() {
        let cases = [
            (FloatPredicate::Oeq, GraphOp::CexpEq),
            (FloatPredicate::Ole, GraphOp::CexpLe),
            (FloatPredicate::Olt, GraphOp::CexpLt),
        ];
        for (pred, op) in cases {
            assert_eq!(compare(Predicate::Float(pred)).conditional_op(), Some(op));
        }
        assert_eq!(
            compare(Predicate::Float(FloatPredicate::One)).conditional_op(),
            None
        );
        assert_eq!(
            compare(Predicate::Int(IntPredicate::Slt)).conditional_op(),
            None
        );
    }

    #[test]
    fn lookups_are_by_identity() {
        let mut deferred = Deferred::new();
        deferred.record_element(
            ValueRef(5),
            ElementRef {
                base: ValueRef(3),
                offset: 2,
            },
        );
        assert_eq!(deferred.element(ValueRef(5)).map(|e| e.offset), Some(2));
        assert!(deferred.element(ValueRef(3)).is_none());
        assert!(deferred.compare(ValueRef(5)).is_none());
    }
}
