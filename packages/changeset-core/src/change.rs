//! Raw change events as reported by the upstream snapshot source.

use serde::{Deserialize, Serialize};

use crate::address::RowAddress;

/// Kind of a raw section change, as named by the upstream callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionChangeKind {
    /// Section present only after the update
    Inserted,
    /// Section present only before the update
    Deleted,
}

/// Kind of a raw row change, as named by the upstream callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowChangeKind {
    /// Row present only after the update
    Inserted,
    /// Row present only before the update
    Deleted,
    /// Row content changed in place
    Updated,
    /// Row relocated between or within sections
    Moved,
}

/// A single section-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionChange {
    /// Section inserted at this index in the post-update snapshot
    Inserted {
        /// Post-update section index
        new_index: usize,
    },
    /// Section deleted from this index in the pre-update snapshot
    Deleted {
        /// Pre-update section index
        old_index: usize,
    },
}

/// A single row-level change.
///
/// Deletes and updates carry pre-update addresses, inserts carry post-update
/// addresses, and moves carry one of each. The address requirements are
/// encoded in the variants, so a move missing one of its two addresses is
/// unrepresentable here; validation of the raw optional-address callback
/// form happens at the handler boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowChange {
    /// Row inserted at a post-update address
    Inserted(RowAddress),
    /// Row deleted from a pre-update address
    Deleted(RowAddress),
    /// Row content changed at a pre-update address
    Updated(RowAddress),
    /// Row relocated from a pre-update address to a post-update address
    Moved {
        /// Pre-update address
        from: RowAddress,
        /// Post-update address
        to: RowAddress,
    },
}

/// A reconciled row move in a finalized change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMove {
    /// Address before the update
    pub from: RowAddress,
    /// Address after the update
    pub to: RowAddress,
}
