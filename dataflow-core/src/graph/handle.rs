//! Node Handles
//!
//! Nodes live in their graph's arena and callers only ever hold handles to
//! them. A handle records which graph created it, which generation of that
//! graph it was created in, and the node's arena slot. The graph checks all
//! three before touching a node, so a handle from another graph or from
//! before a `clear()` is rejected instead of dereferenced.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier of a [`Dataflow`](super::Dataflow) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataflowId(u64);

impl DataflowId {
    /// Generate a new process-unique graph ID.
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Untyped handle to any node of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) dag: DataflowId,
    pub(crate) generation: u32,
    pub(crate) index: u32,
}

impl NodeId {
    pub(crate) fn new(dag: DataflowId, generation: u32, index: usize) -> Self {
        Self {
            dag,
            generation,
            index: index as u32,
        }
    }

    /// The graph that created this node.
    pub fn dag(&self) -> DataflowId {
        self.dag
    }

    /// Position of the node in its graph's creation order.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node_{}", self.index)
    }
}

/// Handle to a variable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable(pub(crate) NodeId);

/// Handle to a binary operator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryOp(pub(crate) NodeId);

impl Variable {
    pub fn id(&self) -> NodeId {
        self.0
    }
}

impl BinaryOp {
    pub fn id(&self) -> NodeId {
        self.0
    }
}

impl From<Variable> for NodeId {
    fn from(var: Variable) -> Self {
        var.0
    }
}

impl From<BinaryOp> for NodeId {
    fn from(op: BinaryOp) -> Self {
        op.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataflow_ids_are_unique() {
        let id1 = DataflowId::next();
        let id2 = DataflowId::next();
        assert_ne!(id1, id2);
        assert!(id2.raw() > id1.raw());
    }

    #[test]
    fn typed_handles_convert_to_node_id() {
        let dag = DataflowId::next();
        let node = NodeId::new(dag, 0, 3);

        assert_eq!(NodeId::from(Variable(node)), node);
        assert_eq!(NodeId::from(BinaryOp(node)), node);
        assert_eq!(node.index(), 3);
        assert_eq!(node.dag(), dag);
        assert_eq!(node.to_string(), "Node_3");
    }

    #[test]
    fn generation_is_part_of_identity() {
        let dag = DataflowId::next();
        assert_ne!(NodeId::new(dag, 0, 1), NodeId::new(dag, 1, 1));
    }
}
