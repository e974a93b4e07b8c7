//! Error types for roster parsing.

use thiserror::Error;

/// Whole-document failures. Any of these aborts the parse with no partial roster.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The anchor text does not appear in the document
    #[error("Anchor \"{anchor}\" not found")]
    AnchorNotFound { anchor: String },

    /// The anchor text appears more than once
    #[error("Expected 1 element for anchor \"{anchor}\", {count} found")]
    AnchorAmbiguous { anchor: String, count: usize },

    /// The anchor was found but the table layout around it is not the expected one
    #[error("Could not locate the data table following anchor \"{anchor}\"")]
    TableNotFound { anchor: String },
}

impl ParseError {
    /// Returns true if the document structure itself is unusable.
    ///
    /// Callers should keep their previous roster when this is the case.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ParseError::AnchorNotFound { .. }
                | ParseError::AnchorAmbiguous { .. }
                | ParseError::TableNotFound { .. }
        )
    }

    /// The anchor text involved in the failure.
    pub fn anchor(&self) -> &str {
        match self {
            ParseError::AnchorNotFound { anchor }
            | ParseError::AnchorAmbiguous { anchor, .. }
            | ParseError::TableNotFound { anchor } => anchor,
        }
    }
}
