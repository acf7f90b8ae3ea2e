//! Dataflow Container
//!
//! The [`Dataflow`] owns every node of one logical computation. Nodes are
//! stored in creation order in a flat arena and handed out as handles; the
//! variable name index maps names to arena slots.
//!
//! # Handle validation
//!
//! Every operation that takes a handle first checks that it was issued by
//! this graph and in the current generation. `clear()` bumps the
//! generation, so handles obtained before it are rejected with
//! [`DataflowError::StaleNode`] instead of silently aliasing new nodes.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::handle::{BinaryOp, DataflowId, NodeId, Variable};
use super::node::{BinaryOpNode, Node, Op, Value, VariableNode};
use crate::error::{DataflowError, Result};

/// A dataflow DAG of integer variables and binary operators.
#[derive(Debug)]
pub struct Dataflow {
    pub(super) id: DataflowId,
    pub(super) generation: u32,
    /// All nodes, in creation order.
    pub(super) nodes: Vec<Node>,
    /// Variable name -> arena slot. Ordered, so listing is sorted by name.
    variables: BTreeMap<String, usize>,
}

impl Dataflow {
    /// Create a new empty dataflow.
    pub fn new() -> Self {
        let id = DataflowId::next();
        debug!(dag = id.raw(), "created dataflow");
        Self {
            id,
            generation: 0,
            nodes: Vec::new(),
            variables: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> DataflowId {
        self.id
    }

    /// Total number of nodes (variables and operators).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handles of every node, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|index| self.handle(index))
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Declare a new, unassigned variable.
    ///
    /// The name must be non-empty and unique within this dataflow.
    pub fn declare_variable(&mut self, name: &str) -> Result<Variable> {
        let node = VariableNode::new(name)?;
        if self.variables.contains_key(name) {
            return Err(DataflowError::DuplicateName {
                name: name.to_string(),
            });
        }

        let index = self.nodes.len();
        self.variables.insert(name.to_string(), index);
        self.nodes.push(Node::Variable(node));
        debug!(dag = self.id.raw(), name, index, "declared variable");

        Ok(Variable(self.handle(index)))
    }

    /// Create a binary operator from one of the symbols `+ - * /`.
    pub fn create_binary_op(
        &mut self,
        symbol: char,
        lhs: impl Into<NodeId>,
        rhs: impl Into<NodeId>,
    ) -> Result<BinaryOp> {
        let op = Op::from_symbol(symbol)?;
        self.binary_op(op, lhs, rhs)
    }

    /// Create a binary operator over two nodes of this dataflow.
    pub fn binary_op(
        &mut self,
        op: Op,
        lhs: impl Into<NodeId>,
        rhs: impl Into<NodeId>,
    ) -> Result<BinaryOp> {
        let lhs = self.operand_slot(lhs.into())?;
        let rhs = self.operand_slot(rhs.into())?;

        let index = self.nodes.len();
        self.nodes.push(Node::BinaryOp(BinaryOpNode::new(op, lhs, rhs)));
        debug!(dag = self.id.raw(), op = %op, lhs, rhs, index, "created binary op");

        Ok(BinaryOp(self.handle(index)))
    }

    pub fn add(&mut self, lhs: impl Into<NodeId>, rhs: impl Into<NodeId>) -> Result<BinaryOp> {
        self.binary_op(Op::Add, lhs, rhs)
    }

    pub fn sub(&mut self, lhs: impl Into<NodeId>, rhs: impl Into<NodeId>) -> Result<BinaryOp> {
        self.binary_op(Op::Sub, lhs, rhs)
    }

    pub fn mul(&mut self, lhs: impl Into<NodeId>, rhs: impl Into<NodeId>) -> Result<BinaryOp> {
        self.binary_op(Op::Mul, lhs, rhs)
    }

    pub fn div(&mut self, lhs: impl Into<NodeId>, rhs: impl Into<NodeId>) -> Result<BinaryOp> {
        self.binary_op(Op::Div, lhs, rhs)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Find a variable by exact name.
    pub fn lookup_variable(&self, name: &str) -> Option<Variable> {
        self.variables
            .get(name)
            .map(|&index| Variable(self.handle(index)))
    }

    /// All declared variables, sorted by name.
    pub fn variables(&self) -> Vec<Variable> {
        self.variables
            .values()
            .map(|&index| Variable(self.handle(index)))
            .collect()
    }

    /// Read-only view of any node.
    pub fn node(&self, id: impl Into<NodeId>) -> Result<&Node> {
        let slot = self.slot(id.into())?;
        Ok(&self.nodes[slot])
    }

    pub fn variable(&self, var: Variable) -> Result<&VariableNode> {
        let slot = self.slot(var.0)?;
        self.nodes[slot]
            .as_variable()
            .ok_or(DataflowError::StaleNode)
    }

    pub fn variable_mut(&mut self, var: Variable) -> Result<&mut VariableNode> {
        let slot = self.slot(var.0)?;
        match &mut self.nodes[slot] {
            Node::Variable(node) => Ok(node),
            Node::BinaryOp(_) => Err(DataflowError::StaleNode),
        }
    }

    fn binary_op_node(&self, op: BinaryOp) -> Result<&BinaryOpNode> {
        let slot = self.slot(op.0)?;
        self.nodes[slot]
            .as_binary_op()
            .ok_or(DataflowError::StaleNode)
    }

    // ------------------------------------------------------------------
    // Variable operations
    // ------------------------------------------------------------------

    pub fn variable_name(&self, var: Variable) -> Result<&str> {
        Ok(self.variable(var)?.name())
    }

    pub fn has_value(&self, var: Variable) -> Result<bool> {
        Ok(self.variable(var)?.has_value())
    }

    /// Assign a value to a variable, replacing any previous value.
    pub fn assign(&mut self, var: Variable, value: Value) -> Result<()> {
        self.variable_mut(var)?.assign(value);
        Ok(())
    }

    /// Reset a variable to "unassigned".
    pub fn reset(&mut self, var: Variable) -> Result<()> {
        self.variable_mut(var)?.reset();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Operator accessors
    // ------------------------------------------------------------------

    pub fn op(&self, op: BinaryOp) -> Result<Op> {
        Ok(self.binary_op_node(op)?.op())
    }

    pub fn lhs(&self, op: BinaryOp) -> Result<NodeId> {
        let slot = self.binary_op_node(op)?.lhs_slot();
        Ok(self.handle(slot))
    }

    pub fn rhs(&self, op: BinaryOp) -> Result<NodeId> {
        let slot = self.binary_op_node(op)?.rhs_slot();
        Ok(self.handle(slot))
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Evaluate a node from the current variable values.
    ///
    /// The whole subtree is re-evaluated on every call.
    ///
    /// # Stack usage
    ///
    /// Evaluation recurses once per level of the subtree, so its depth is
    /// bounded by the calling thread's stack. Chains hundreds of thousands
    /// of operators deep overflow a default 8 MiB stack and abort the
    /// process; evaluate such graphs on a thread with a larger stack.
    pub fn eval(&self, id: impl Into<NodeId>) -> Result<Value> {
        let slot = self.slot(id.into())?;
        let value = self.nodes[slot].eval(&self.nodes)?;
        trace!(dag = self.id.raw(), slot, value, "evaluated node");
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Lifetime
    // ------------------------------------------------------------------

    /// Remove every node and variable.
    ///
    /// Handles obtained before this call are invalidated.
    pub fn clear(&mut self) {
        debug!(
            dag = self.id.raw(),
            nodes = self.nodes.len(),
            variables = self.variables.len(),
            "clearing dataflow"
        );
        for (slot, node) in self.nodes.drain(..).enumerate() {
            match node {
                Node::Variable(var) => trace!(slot, name = var.name(), "dropped variable"),
                Node::BinaryOp(op) => trace!(slot, op = %op.op(), "dropped binary op"),
            }
        }
        self.variables.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    // ------------------------------------------------------------------
    // Handle plumbing
    // ------------------------------------------------------------------

    pub(super) fn handle(&self, index: usize) -> NodeId {
        NodeId::new(self.id, self.generation, index)
    }

    /// Validate a handle passed to a non-constructing operation.
    fn slot(&self, id: NodeId) -> Result<usize> {
        if id.dag != self.id {
            return Err(DataflowError::ForeignNode);
        }
        if id.generation != self.generation || id.index() >= self.nodes.len() {
            return Err(DataflowError::StaleNode);
        }
        Ok(id.index())
    }

    /// Validate an operand passed to operator creation.
    fn operand_slot(&self, id: NodeId) -> Result<usize> {
        match self.slot(id) {
            Err(DataflowError::ForeignNode) => Err(DataflowError::CrossGraphOperand),
            other => other,
        }
    }
}

impl Default for Dataflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Dataflow {
    fn drop(&mut self) {
        trace!(dag = self.id.raw(), nodes = self.nodes.len(), "dropping dataflow");
    }
}
