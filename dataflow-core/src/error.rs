//! Error types for dataflow construction and evaluation.

/// Everything that can go wrong while building, evaluating or exporting a
/// [`Dataflow`](crate::graph::Dataflow).
///
/// Each operation reports the first precondition it finds violated and
/// leaves the graph untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DataflowError {
    /// Variable declared with an empty name.
    #[error("Invalid variable name (empty)")]
    InvalidName,

    /// Variable name already taken in this graph.
    #[error("Duplicate variable name ('{name}')")]
    DuplicateName { name: String },

    /// Operator symbol outside `+ - * /`.
    #[error("Unsupported operator '{symbol}'")]
    UnsupportedOperator { symbol: char },

    /// Operator token that is not a single symbol at all.
    #[error("Unknown op '{token}'")]
    UnknownOperator { token: String },

    /// An operand passed to operator creation belongs to another graph.
    #[error("Can't mix operands from different dataflows")]
    CrossGraphOperand,

    /// Evaluation reached a variable with no value.
    #[error("Attempting to use unassigned variable '{name}'")]
    UnassignedVariable { name: String },

    /// Right operand of `/` evaluated to zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Handle was obtained before the graph was cleared.
    #[error("Node handle is stale (the dataflow has been cleared)")]
    StaleNode,

    /// Handle of another graph passed to a non-constructing operation.
    #[error("Node belongs to a different dataflow")]
    ForeignNode,

    /// Writer failed during Graphviz export.
    #[error("Graphviz export failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = DataflowError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = DataflowError::DuplicateName { name: "foo".into() };
        assert_eq!(err.to_string(), "Duplicate variable name ('foo')");

        let err = DataflowError::UnassignedVariable { name: "a".into() };
        assert_eq!(err.to_string(), "Attempting to use unassigned variable 'a'");

        let err = DataflowError::UnsupportedOperator { symbol: '%' };
        assert_eq!(err.to_string(), "Unsupported operator '%'");
    }

    #[test]
    fn fmt_errors_convert() {
        let err: DataflowError = std::fmt::Error.into();
        assert!(matches!(err, DataflowError::Format(_)));
    }
}
