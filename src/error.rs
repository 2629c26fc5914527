//! # Error Types
//!
//! This module defines all error types for the etude engine.
//!
//! The reconstruction pipeline itself never fails: malformed timing is
//! recovered with documented defaults so a student always gets *something*
//! playable. Errors exist only at the edges:
//! - `DocumentError` - the decoded event document could not be read
//! - `SemanticError` - a measure's flattened durations don't add up to the
//!   nominal measure length (reported with the measure number)
//!
//! ## Usage
//! ```rust
//! use etude::EtudeError;
//!
//! let err = EtudeError::SemanticError {
//!     measure: 3,
//!     message: "right hand sums to 3.5 beats, expected 4".to_string(),
//! };
//! assert_eq!(
//!     err.to_string(),
//!     "Semantic error at measure 3: right hand sums to 3.5 beats, expected 4"
//! );
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtudeError {
    /// Invalid event document.
    ///
    /// Occurs when the YAML event document handed over by the notation
    /// decoder cannot be deserialized into the event shapes.
    #[error("Invalid score document: {0}")]
    DocumentError(String),

    /// Structural validation error with measure information.
    ///
    /// Occurs when a hand's flattened durations don't sum to the nominal
    /// beats-per-measure. The pipeline never raises this on its own;
    /// callers opt in through [`crate::validate`].
    #[error("Semantic error at measure {measure}: {message}")]
    SemanticError { measure: usize, message: String },
}
