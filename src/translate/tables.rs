//! Value and address resolution tables.

use std::collections::HashMap;

use crate::graph::NodeId;
use crate::ir::ValueRef;

/// How offsets into a buffer resolve to nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// Offset `k` is node `first + k`.
    Contiguous { first: NodeId, len: usize },
    /// Offset `k` is whatever node was last stored into slot `k`. Slots
    /// are allocated as they are written; `len` bounds the offsets.
    Scattered {
        len: usize,
        written: Vec<Option<NodeId>>,
    },
}

impl Layout {
    pub fn len(&self) -> usize {
        match self {
            Layout::Contiguous { len, .. } | Layout::Scattered { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read view of a scattered buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slots<'a> {
    len: usize,
    written: &'a [Option<NodeId>],
}

impl Slots<'_> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn get(&self, offset: usize) -> Option<NodeId> {
        self.written.get(offset).copied().flatten()
    }

    /// Nodes of every slot in order, or the first offset never written.
    pub fn filled(&self) -> Result<Vec<NodeId>, usize> {
        (0..self.len)
            .map(|offset| self.get(offset).ok_or(offset))
            .collect()
    }
}

/// Side tables of one translation, keyed by value identity.
#[derive(Debug, Default)]
pub struct Tables {
    values: HashMap<ValueRef, NodeId>,
    pointers: HashMap<ValueRef, NodeId>,
    layouts: HashMap<ValueRef, Layout>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_value(&mut self, value: ValueRef, node: NodeId) {
        self.values.insert(value, node);
    }

    pub fn value_node(&self, value: ValueRef) -> Option<NodeId> {
        self.values.get(&value).copied()
    }

    pub fn has_value(&self, value: ValueRef) -> bool {
        self.values.contains_key(&value)
    }

    /// Record that loading through `ptr` yields `node`.
    pub fn bind_pointer(&mut self, ptr: ValueRef, node: NodeId) {
        self.pointers.insert(ptr, node);
    }

    pub fn pointer_node(&self, ptr: ValueRef) -> Option<NodeId> {
        self.pointers.get(&ptr).copied()
    }

    pub fn layout(&self, base: ValueRef) -> Option<&Layout> {
        self.layouts.get(&base)
    }

    /// Bind `base` to `len` consecutive nodes starting at `first`. The base
    /// pointer itself loads element 0, so an empty buffer cannot be loaded
    /// through. A later binding of the same base replaces an earlier
    /// contiguous one.
    pub fn bind_contiguous(
        &mut self,
        base: ValueRef,
        first: NodeId,
        len: usize,
    ) -> Result<(), String> {
        if let Some(Layout::Scattered { .. }) = self.layouts.get(&base) {
            return Err("buffer is already written element by element".to_string());
        }
        if first.checked_add(len).is_none() {
            return Err(format!("{} nodes starting at {} overflow the node ids", len, first));
        }
        let layout = Layout::Contiguous { first, len };
        if layout.is_empty() {
            self.pointers.remove(&base);
        } else {
            self.pointers.insert(base, first);
        }
        self.layouts.insert(base, layout);
        Ok(())
    }

    /// Register `base` as a scattered buffer of `len` slots. Registering
    /// the same base again is allowed only with the same length.
    pub fn register_scattered(&mut self, base: ValueRef, len: usize) -> Result<(), String> {
        match self.layouts.get(&base) {
            None => {
                self.layouts.insert(
                    base,
                    Layout::Scattered {
                        len,
                        written: Vec::new(),
                    },
                );
                Ok(())
            }
            Some(Layout::Scattered { len: existing, .. }) if *existing == len => Ok(()),
            Some(Layout::Scattered { len: existing, .. }) => Err(format!(
                "buffer registered with {} slots is reused with {}",
                existing, len
            )),
            Some(Layout::Contiguous { .. }) => {
                Err("buffer already holds consecutive nodes".to_string())
            }
        }
    }

    /// Slots of a scattered buffer.
    pub fn scattered(&self, base: ValueRef) -> Option<Slots<'_>> {
        match self.layouts.get(&base)? {
            Layout::Scattered { len, written } => Some(Slots {
                len: *len,
                written,
            }),
            Layout::Contiguous { .. } => None,
        }
    }

    /// Write `node` into slot `offset` of the scattered buffer `base`.
    pub fn store(&mut self, base: ValueRef, offset: usize, node: NodeId) -> Result<(), String> {
        match self.layouts.get_mut(&base) {
            Some(Layout::Scattered { len, written }) => {
                if offset >= *len {
                    return Err(format!(
                        "store to element {} of a buffer with {} slots",
                        offset, len
                    ));
                }
                if written.len() <= offset {
                    written.resize(offset + 1, None);
                }
                written[offset] = Some(node);
                Ok(())
            }
            _ => Err("store into a buffer that is not written element by element".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_binds_base_pointer() {
        let mut tables = Tables::new();
        tables.bind_contiguous(ValueRef(1), 1, 3).unwrap();
        assert_eq!(tables.pointer_node(ValueRef(1)), Some(1));
        assert_eq!(
            tables.layout(ValueRef(1)),
            Some(&Layout::Contiguous { first: 1, len: 3 })
        );
        assert!(tables.scattered(ValueRef(1)).is_none());
    }

    #[test]
    fn scattered_store_and_bounds() {
        let mut tables = Tables::new();
        tables.register_scattered(ValueRef(3), 2).unwrap();
        tables.store(ValueRef(3), 1, 7).unwrap();
        let slots = tables.scattered(ValueRef(3)).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.get(0), None);
        assert_eq!(slots.get(1), Some(7));
        assert_eq!(slots.filled(), Err(0));
        assert!(tables.store(ValueRef(3), 2, 7).is_err());
        assert!(tables.store(ValueRef(9), 0, 7).is_err());
    }

    #[test]
    fn layouts_are_exclusive() {
        let mut tables = Tables::new();
        tables.register_scattered(ValueRef(3), 2).unwrap();
        assert!(tables.register_scattered(ValueRef(3), 2).is_ok());
        assert!(tables.register_scattered(ValueRef(3), 4).is_err());
        assert!(tables.bind_contiguous(ValueRef(3), 5, 1).is_err());

        tables.bind_contiguous(ValueRef(4), 5, 1).unwrap();
        assert!(tables.register_scattered(ValueRef(4), 1).is_err());
        // results of a later call replace earlier ones
        tables.bind_contiguous(ValueRef(4), 9, 2).unwrap();
        assert_eq!(tables.pointer_node(ValueRef(4)), Some(9));
    }

    #[test]
    fn huge_scattered_buffers_allocate_lazily() {
        let mut tables = Tables::new();
        tables.register_scattered(ValueRef(3), usize::MAX).unwrap();
        tables.store(ValueRef(3), 1, 4).unwrap();
        let slots = tables.scattered(ValueRef(3)).unwrap();
        assert_eq!(slots.len(), usize::MAX);
        assert_eq!(slots.filled(), Err(0));
    }

    #[test]
    fn empty_contiguous_buffer_has_no_element_zero() {
        let mut tables = Tables::new();
        tables.bind_contiguous(ValueRef(4), 5, 1).unwrap();
        tables.bind_contiguous(ValueRef(4), 6, 0).unwrap();
        assert_eq!(tables.pointer_node(ValueRef(4)), None);
        assert!(tables.layout(ValueRef(4)).unwrap().is_empty());
        assert!(tables.bind_contiguous(ValueRef(5), usize::MAX, 1).is_err());
    }
}
