//! Dataflow Core
//!
//! This crate provides a small in-memory computation graph: a DAG of named
//! integer variables and binary arithmetic operators that can be built
//! incrementally, reassigned, evaluated on demand and exported to Graphviz.
//!
//! The crate is designed to be used both as a native Rust library and, with
//! the `python` feature, as a Python extension module via PyO3.
//!
//! # Architecture
//!
//! - `graph`: node model, the owning `Dataflow` container and `dot` export
//! - `error`: the error taxonomy shared by every operation
//! - `python`: PyO3 classes mirroring the Rust API (feature `python`)
//!
//! # Example
//!
//! ```rust
//! use dataflow_core::graph::Dataflow;
//!
//! let mut dag = Dataflow::new();
//! let a = dag.declare_variable("a")?;
//! let b = dag.declare_variable("b")?;
//! let sum = dag.create_binary_op('+', a, b)?;
//!
//! dag.assign(a, 1)?;
//! dag.assign(b, 5)?;
//! assert_eq!(dag.eval(sum)?, 6);
//!
//! // Values are pulled at evaluation time, nothing is cached.
//! dag.assign(b, 10)?;
//! assert_eq!(dag.eval(sum)?, 11);
//! # Ok::<(), dataflow_core::DataflowError>(())
//! ```

pub mod error;
pub mod graph;

#[cfg(feature = "python")]
pub mod python;

pub use error::{DataflowError, Result};
pub use graph::{BinaryOp, Dataflow, NodeId, Op, Value, Variable};
