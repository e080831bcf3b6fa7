//! Row addressing within a sectioned snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a row within one coordinate space (pre-update or post-update).
///
/// An address is only meaningful within the space it was reported in:
/// deletes and updates carry pre-update addresses, inserts carry post-update
/// addresses. Ordering is lexicographic by (section, row), which is the
/// order consumers need for batched deletes (descending) and inserts
/// (ascending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowAddress {
    /// Section index within the snapshot
    pub section: usize,
    /// Row index within the section
    pub row: usize,
}

impl RowAddress {
    /// Creates an address from section and row indexes.
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for RowAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.row)
    }
}

impl From<(usize, usize)> for RowAddress {
    fn from((section, row): (usize, usize)) -> Self {
        Self { section, row }
    }
}
