//! Dataflow Graph
//!
//! This module implements the integer dataflow DAG.
//!
//! # Overview
//!
//! A [`Dataflow`] is a directed acyclic graph where:
//!
//! - Nodes are named integer variables or binary operators (`+ - * /`)
//! - Edges run from each operand to the operator that consumes it
//!
//! Nodes are created only through the graph, which owns them in an arena
//! and hands out `Copy` handles ([`Variable`], [`BinaryOp`], [`NodeId`]).
//! Evaluation is lazy and uncached: asking for a node's value walks its
//! operands depth-first using the variables' current values.
//!
//! # Design Decisions
//!
//! 1. Operands are arena slots rather than references, so an operator can
//!    only point at nodes created before it and the graph stays acyclic.
//!
//! 2. Handles carry the owning graph's ID and a generation counter. Mixing
//!    graphs and using handles across `clear()` are reported as errors.
//!
//! 3. The node model is a closed enum, so export and evaluation match
//!    exhaustively on it.

mod dataflow;
mod graphviz;
mod handle;
mod node;

pub use dataflow::Dataflow;
pub use handle::{BinaryOp, DataflowId, NodeId, Variable};
pub use node::{BinaryOpNode, Node, Op, Value, VariableNode};
