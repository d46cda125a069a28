//! Error types for ruleset-core.

use thiserror::Error;

use crate::graph::{DelegateId, NodeId};
use crate::rules::Arity;

/// Result type for ruleset-core operations.
pub type Result<T> = std::result::Result<T, RulesetError>;

/// Errors that can occur while building or driving a ruleset.
#[derive(Debug, Error)]
pub enum RulesetError {
    /// The handle does not belong to this ruleset.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The delegate handle does not belong to this ruleset.
    #[error("unknown delegate {0}")]
    UnknownDelegate(DelegateId),

    /// No cell carries this name.
    #[error("no cell named `{0}`")]
    UnknownName(String),

    /// A cell with this name already exists.
    #[error("a cell named `{0}` already exists")]
    DuplicateName(String),

    /// Only cells accept external assignments.
    #[error("node {0} is derived and cannot be assigned")]
    NotACell(NodeId),

    /// A combinator received the wrong number of inputs.
    #[error("{combinator} expects {expected} input(s), got {actual}")]
    Arity {
        combinator: &'static str,
        expected: Arity,
        actual: usize,
    },

    /// An operation was applied to values of incompatible types.
    #[error("cannot {op} {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// Bulk assignment input was not a JSON object of values.
    #[error("invalid assignment document: {0}")]
    Json(#[from] serde_json::Error),
}
