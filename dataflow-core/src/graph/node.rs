//! Graph Nodes
//!
//! This module defines the node types that live in a dataflow arena.
//!
//! A node is either a named integer [`VariableNode`] or a [`BinaryOpNode`]
//! combining two earlier nodes. Operator nodes refer to their operands by
//! arena slot; since an operator can only reference nodes that already exist,
//! operand slots are always lower than the operator's own slot and the arena
//! can never contain a cycle.

use std::fmt;
use std::str::FromStr;

use crate::error::{DataflowError, Result};

/// Integer type carried by variables and produced by evaluation.
pub type Value = i64;

/// Arithmetic operator of a binary op node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    /// All supported operators.
    pub const ALL: [Op; 4] = [Op::Add, Op::Sub, Op::Mul, Op::Div];

    /// Parse one of `+ - * /`.
    pub fn from_symbol(symbol: char) -> Result<Self> {
        match symbol {
            '+' => Ok(Op::Add),
            '-' => Ok(Op::Sub),
            '*' => Ok(Op::Mul),
            '/' => Ok(Op::Div),
            _ => Err(DataflowError::UnsupportedOperator { symbol }),
        }
    }

    /// The operator's symbol.
    pub fn symbol(&self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
        }
    }

    /// Apply the operator to two evaluated operands.
    ///
    /// Overflow wraps; division truncates toward zero.
    pub fn apply(&self, lhs: Value, rhs: Value) -> Result<Value> {
        match self {
            Op::Add => Ok(lhs.wrapping_add(rhs)),
            Op::Sub => Ok(lhs.wrapping_sub(rhs)),
            Op::Mul => Ok(lhs.wrapping_mul(rhs)),
            Op::Div => {
                if rhs == 0 {
                    return Err(DataflowError::DivisionByZero);
                }
                Ok(lhs.wrapping_div(rhs))
            }
        }
    }
}

impl TryFrom<char> for Op {
    type Error = DataflowError;

    fn try_from(symbol: char) -> Result<Self> {
        Op::from_symbol(symbol)
    }
}

impl FromStr for Op {
    type Err = DataflowError;

    /// Parse a one-symbol token such as `"+"`.
    fn from_str(token: &str) -> Result<Self> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Op::from_symbol(symbol),
            _ => Err(DataflowError::UnknownOperator {
                token: token.to_string(),
            }),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A named integer variable.
///
/// Variables start unassigned and can be assigned or reset any number of
/// times. The name never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableNode {
    name: String,
    value: Option<Value>,
}

impl VariableNode {
    pub(crate) fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(DataflowError::InvalidName);
        }
        Ok(Self {
            name: name.to_string(),
            value: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if a value has been assigned.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<Value> {
        self.value
    }

    /// Assign a value, replacing any previous one.
    pub fn assign(&mut self, value: Value) {
        self.value = Some(value);
    }

    /// Reset to "unassigned".
    pub fn reset(&mut self) {
        self.value = None;
    }

    /// Returns the assigned value, or an error naming the variable.
    pub fn eval(&self) -> Result<Value> {
        self.value.ok_or_else(|| DataflowError::UnassignedVariable {
            name: self.name.clone(),
        })
    }
}

/// A binary operator over two earlier nodes of the same arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOpNode {
    op: Op,
    lhs: usize,
    rhs: usize,
}

impl BinaryOpNode {
    pub(crate) fn new(op: Op, lhs: usize, rhs: usize) -> Self {
        Self { op, lhs, rhs }
    }

    pub fn op(&self) -> Op {
        self.op
    }

    /// Arena slot of the left operand.
    pub fn lhs_slot(&self) -> usize {
        self.lhs
    }

    /// Arena slot of the right operand.
    pub fn rhs_slot(&self) -> usize {
        self.rhs
    }

    /// Evaluate both operands (left first), then apply the operator.
    ///
    /// Nothing is cached, so the result always reflects the current
    /// variable values.
    pub(crate) fn eval(&self, arena: &[Node]) -> Result<Value> {
        let lhs = arena[self.lhs].eval(arena)?;
        let rhs = arena[self.rhs].eval(arena)?;
        self.op.apply(lhs, rhs)
    }
}

/// A node in the dataflow arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Variable(VariableNode),
    BinaryOp(BinaryOpNode),
}

impl Node {
    /// Evaluate this node against the arena that owns it.
    pub(crate) fn eval(&self, arena: &[Node]) -> Result<Value> {
        match self {
            Node::Variable(var) => var.eval(),
            Node::BinaryOp(op) => op.eval(arena),
        }
    }

    pub fn as_variable(&self) -> Option<&VariableNode> {
        match self {
            Node::Variable(var) => Some(var),
            Node::BinaryOp(_) => None,
        }
    }

    pub fn as_binary_op(&self) -> Option<&BinaryOpNode> {
        match self {
            Node::BinaryOp(op) => Some(op),
            Node::Variable(_) => None,
        }
    }
}
