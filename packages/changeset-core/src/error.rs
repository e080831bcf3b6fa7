//! Change handling error types.

use thiserror::Error;

use crate::change::RowChangeKind;

/// Result type for change handling operations.
pub type Result<T> = std::result::Result<T, ChangeError>;

/// Errors raised at the ingestion boundary.
///
/// Both variants are caller protocol violations surfaced synchronously at
/// the call site; no event is stored when a record call fails. Query-time
/// misses (deleted or inserted indexes) are `None` returns, never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangeError {
    /// A raw row callback carried addresses inconsistent with its kind
    #[error("Invalid {kind:?} event: {reason}")]
    InvalidArgument {
        /// Kind of the rejected row event
        kind: RowChangeKind,
        /// Which address requirement was violated
        reason: &'static str,
    },

    /// A call arrived outside the begin/end cycle protocol
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),
}
