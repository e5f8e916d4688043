//! Error types for ID validation.

use thiserror::Error;

/// Errors that can occur when validating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty.
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },

    /// The ID contains a character that can't appear in a path segment.
    #[error("{kind} contains invalid character {character:?}: {value:?}")]
    InvalidCharacter {
        kind: &'static str,
        character: char,
        value: String,
    },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty { .. })
    }
}
