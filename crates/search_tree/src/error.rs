use std::error::Error;
use std::fmt;

/// Convenience alias for fallible tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors reported by the trees in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The tree has no nodes, or a strict removal would take away its last node.
    Empty,
    /// The key required by the operation is not stored in the tree.
    KeyNotFound,
    /// A balancing invariant does not hold. This always indicates a bug in a fix-up pass.
    InvariantViolation(&'static str),
}

impl TreeError {
    pub fn is_empty(&self) -> bool {
        matches!(self, TreeError::Empty)
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Empty => write!(f, "tree is empty or would be left empty"),
            TreeError::KeyNotFound => write!(f, "key not found"),
            TreeError::InvariantViolation(what) => write!(f, "invariant violated: {}", what),
        }
    }
}

impl Error for TreeError {}
