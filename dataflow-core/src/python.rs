//! Python Bindings
//!
//! Thin PyO3 layer over [`Dataflow`]. Every Python node object shares its
//! graph through `Arc<Mutex<Dataflow>>` and keeps a handle into it, so node
//! objects stay usable after the `Dataflow` object itself is collected.
//! Errors surface as `RuntimeError`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use pyo3::exceptions::{PyRuntimeError, PyTypeError};
use pyo3::prelude::*;
use pyo3::PyClassInitializer;

use crate::error::DataflowError;
use crate::graph::{self, Dataflow, Node, NodeId, Op, Value};

type SharedDag = Arc<Mutex<Dataflow>>;

impl From<DataflowError> for PyErr {
    fn from(err: DataflowError) -> Self {
        PyRuntimeError::new_err(err.to_string())
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn extract_node(obj: &Bound<'_, PyAny>) -> PyResult<NodeId> {
    let node = obj
        .downcast::<PyNode>()
        .map_err(|_| PyTypeError::new_err("expected a dataflow node"))?;
    let id = node.borrow().id;
    Ok(id)
}

fn new_variable(py: Python<'_>, dag: &SharedDag, handle: graph::Variable) -> PyResult<Py<PyVariable>> {
    let base = PyNode {
        dag: Arc::clone(dag),
        id: handle.id(),
    };
    let init = PyClassInitializer::from(base).add_subclass(PyVariable {
        dag: Arc::clone(dag),
        handle,
    });
    Py::new(py, init)
}

fn new_binary_op(py: Python<'_>, dag: &SharedDag, handle: graph::BinaryOp) -> PyResult<Py<PyBinaryOp>> {
    let base = PyNode {
        dag: Arc::clone(dag),
        id: handle.id(),
    };
    let init = PyClassInitializer::from(base).add_subclass(PyBinaryOp {
        dag: Arc::clone(dag),
        handle,
    });
    Py::new(py, init)
}

/// Wrap an untyped handle in the matching Python class.
fn wrap_node(py: Python<'_>, dag: &SharedDag, id: NodeId) -> PyResult<PyObject> {
    let is_variable = matches!(dag.lock().node(id)?, Node::Variable(_));
    if is_variable {
        Ok(new_variable(py, dag, graph::Variable(id))?.into_py(py))
    } else {
        Ok(new_binary_op(py, dag, graph::BinaryOp(id))?.into_py(py))
    }
}

fn combine(
    py: Python<'_>,
    dag: &SharedDag,
    op: Op,
    lhs: NodeId,
    rhs: &Bound<'_, PyAny>,
) -> PyResult<Py<PyBinaryOp>> {
    let rhs = extract_node(rhs)?;
    let handle = dag.lock().binary_op(op, lhs, rhs)?;
    new_binary_op(py, dag, handle)
}

// ----------------------------------------------------------------------------
// Node
// ----------------------------------------------------------------------------

/// Base class of `Variable` and `BinaryOp`.
#[pyclass(subclass, name = "Node")]
pub struct PyNode {
    dag: SharedDag,
    id: NodeId,
}

#[pymethods]
impl PyNode {
    fn eval(&self) -> PyResult<Value> {
        Ok(self.dag.lock().eval(self.id)?)
    }

    /// The dataflow owning this node.
    fn dag(&self) -> PyDataflow {
        PyDataflow {
            inner: Arc::clone(&self.dag),
        }
    }

    fn __repr__(&self) -> &'static str {
        "Node"
    }

    fn __eq__(&self, other: &Bound<'_, PyAny>) -> bool {
        extract_node(other).is_ok_and(|id| id == self.id)
    }

    fn __hash__(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.id.hash(&mut hasher);
        hasher.finish()
    }

    fn __add__(&self, py: Python<'_>, other: &Bound<'_, PyAny>) -> PyResult<Py<PyBinaryOp>> {
        combine(py, &self.dag, Op::Add, self.id, other)
    }

    fn __sub__(&self, py: Python<'_>, other: &Bound<'_, PyAny>) -> PyResult<Py<PyBinaryOp>> {
        combine(py, &self.dag, Op::Sub, self.id, other)
    }

    fn __mul__(&self, py: Python<'_>, other: &Bound<'_, PyAny>) -> PyResult<Py<PyBinaryOp>> {
        combine(py, &self.dag, Op::Mul, self.id, other)
    }

    fn __truediv__(&self, py: Python<'_>, other: &Bound<'_, PyAny>) -> PyResult<Py<PyBinaryOp>> {
        combine(py, &self.dag, Op::Div, self.id, other)
    }
}

// ----------------------------------------------------------------------------
// Variable
// ----------------------------------------------------------------------------

#[pyclass(extends = PyNode, name = "Variable")]
pub struct PyVariable {
    dag: SharedDag,
    handle: graph::Variable,
}

#[pymethods]
impl PyVariable {
    #[getter]
    fn name(&self) -> PyResult<String> {
        Ok(self.dag.lock().variable_name(self.handle)?.to_string())
    }

    #[getter]
    fn has_value(&self) -> PyResult<bool> {
        Ok(self.dag.lock().has_value(self.handle)?)
    }

    fn assign(&self, value: Value) -> PyResult<()> {
        Ok(self.dag.lock().assign(self.handle, value)?)
    }

    fn reset(&self) -> PyResult<()> {
        Ok(self.dag.lock().reset(self.handle)?)
    }

    fn __repr__(&self) -> PyResult<String> {
        let dag = self.dag.lock();
        let var = dag.variable(self.handle)?;
        Ok(match var.value() {
            Some(value) => format!("Var '{}'={}", var.name(), value),
            None => format!("Var '{}'", var.name()),
        })
    }
}

// ----------------------------------------------------------------------------
// BinaryOp
// ----------------------------------------------------------------------------

#[pyclass(extends = PyNode, name = "BinaryOp")]
pub struct PyBinaryOp {
    dag: SharedDag,
    handle: graph::BinaryOp,
}

#[pymethods]
impl PyBinaryOp {
    #[getter]
    fn op(&self) -> PyResult<String> {
        Ok(self.dag.lock().op(self.handle)?.to_string())
    }

    #[getter]
    fn lhs(&self, py: Python<'_>) -> PyResult<PyObject> {
        let id = self.dag.lock().lhs(self.handle)?;
        wrap_node(py, &self.dag, id)
    }

    #[getter]
    fn rhs(&self, py: Python<'_>) -> PyResult<PyObject> {
        let id = self.dag.lock().rhs(self.handle)?;
        wrap_node(py, &self.dag, id)
    }

    fn __repr__(&self) -> PyResult<String> {
        Ok(format!("Op '{}'", self.dag.lock().op(self.handle)?))
    }
}

// ----------------------------------------------------------------------------
// Dataflow
// ----------------------------------------------------------------------------

#[pyclass(name = "Dataflow")]
pub struct PyDataflow {
    inner: SharedDag,
}

#[pymethods]
impl PyDataflow {
    #[new]
    fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Dataflow::new())),
        }
    }

    fn declare_variable(&self, py: Python<'_>, name: &str) -> PyResult<Py<PyVariable>> {
        let handle = self.inner.lock().declare_variable(name)?;
        new_variable(py, &self.inner, handle)
    }

    fn create_binary_op(
        &self,
        py: Python<'_>,
        op: &str,
        lhs: &Bound<'_, PyAny>,
        rhs: &Bound<'_, PyAny>,
    ) -> PyResult<Py<PyBinaryOp>> {
        let op: Op = op.parse()?;
        combine(py, &self.inner, op, extract_node(lhs)?, rhs)
    }

    fn lookup_variable(&self, py: Python<'_>, name: &str) -> PyResult<Option<Py<PyVariable>>> {
        let handle = self.inner.lock().lookup_variable(name);
        handle.map(|h| new_variable(py, &self.inner, h)).transpose()
    }

    /// Declared variables, sorted by name.
    #[getter]
    fn variables(&self, py: Python<'_>) -> PyResult<Vec<Py<PyVariable>>> {
        let handles = self.inner.lock().variables();
        handles
            .into_iter()
            .map(|h| new_variable(py, &self.inner, h))
            .collect()
    }

    /// Two `Dataflow` objects are equal when they wrap the same graph.
    fn __eq__(&self, other: &Bound<'_, PyAny>) -> bool {
        other
            .downcast::<PyDataflow>()
            .is_ok_and(|other| self.same_graph(&other.borrow()))
    }

    fn __hash__(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        Arc::as_ptr(&self.inner).hash(&mut hasher);
        hasher.finish()
    }

    fn dump_to_graphviz(&self) -> PyResult<String> {
        Ok(self.inner.lock().dump_to_graphviz()?)
    }

    fn clear(&self) {
        self.inner.lock().clear();
    }

    fn add(&self, py: Python<'_>, lhs: &Bound<'_, PyAny>, rhs: &Bound<'_, PyAny>) -> PyResult<Py<PyBinaryOp>> {
        combine(py, &self.inner, Op::Add, extract_node(lhs)?, rhs)
    }

    fn sub(&self, py: Python<'_>, lhs: &Bound<'_, PyAny>, rhs: &Bound<'_, PyAny>) -> PyResult<Py<PyBinaryOp>> {
        combine(py, &self.inner, Op::Sub, extract_node(lhs)?, rhs)
    }

    fn mul(&self, py: Python<'_>, lhs: &Bound<'_, PyAny>, rhs: &Bound<'_, PyAny>) -> PyResult<Py<PyBinaryOp>> {
        combine(py, &self.inner, Op::Mul, extract_node(lhs)?, rhs)
    }

    fn div(&self, py: Python<'_>, lhs: &Bound<'_, PyAny>, rhs: &Bound<'_, PyAny>) -> PyResult<Py<PyBinaryOp>> {
        combine(py, &self.inner, Op::Div, extract_node(lhs)?, rhs)
    }
}

impl PyDataflow {
    fn same_graph(&self, other: &PyDataflow) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Python module definition.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNode>()?;
    m.add_class::<PyVariable>()?;
    m.add_class::<PyBinaryOp>()?;
    m.add_class::<PyDataflow>()?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
