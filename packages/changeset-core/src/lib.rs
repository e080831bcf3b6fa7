//! Consolidation of raw snapshot-change notifications into queryable change sets.
//!
//! Provides the per-cycle accumulator, the finalized change set with
//! bidirectional index translation, and the shared error types.

pub mod accumulator;
pub mod address;
pub mod change;
pub mod changeset;
pub mod error;

pub use accumulator::ChangeAccumulator;
pub use address::RowAddress;
pub use change::{RowChange, RowChangeKind, RowMove, SectionChange, SectionChangeKind};
pub use changeset::ChangeSet;
pub use error::{ChangeError, Result};
