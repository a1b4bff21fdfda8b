//! Error types.
//!
//! Parsing, tokenizing and rendering cannot fail. The only fallible
//! surface is reading store blocks from JSON.

use thiserror::Error;

/// Failure while reading store blocks from JSON.
#[derive(Debug, Error)]
pub enum WireError {
    /// The input is not JSON at all.
    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a list of blocks.
    #[error("expected a JSON array of blocks, found {found}")]
    NotAnArray { found: &'static str },

    /// One element of the list does not have the shape of a block.
    #[error("invalid block at index {index}")]
    Block {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl WireError {
    /// Index of the offending block, when the failure is tied to one.
    pub fn block_index(&self) -> Option<usize> {
        match self {
            WireError::Block { index, .. } => Some(*index),
            _ => None,
        }
    }
}
