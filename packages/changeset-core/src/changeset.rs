//! Finalized, query-only change sets with bidirectional index translation.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::address::RowAddress;
use crate::change::RowMove;

/// An immutable set of changes consolidated from one update cycle.
///
/// All indexes associated with deletes and updates are from before the
/// update; all indexes associated with inserts are from after it. Inserted
/// row addresses include the rows of newly inserted sections, so consumers
/// batching section and row operations together must filter those out
/// themselves.
///
/// Instances are produced by
/// [`ChangeAccumulator::finish`](crate::ChangeAccumulator::finish) and never
/// mutated afterwards; every query method is pure, so a finalized set may be
/// shared and queried from any number of threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Pre-update indexes, ascending
    deleted_sections: Vec<usize>,
    /// Post-update indexes, ascending
    inserted_sections: Vec<usize>,
    /// Pre-update addresses, arrival order
    updated: Vec<RowAddress>,
    /// Pre-update addresses, strictly descending
    deleted: Vec<RowAddress>,
    /// Post-update addresses, strictly ascending
    inserted: Vec<RowAddress>,
    /// Reconciled moves, arrival order
    moves: Vec<RowMove>,
}

impl ChangeSet {
    /// Assembles a change set from collections already reconciled and sorted
    /// by the accumulator.
    pub(crate) fn from_parts(
        deleted_sections: Vec<usize>,
        inserted_sections: Vec<usize>,
        updated: Vec<RowAddress>,
        deleted: Vec<RowAddress>,
        inserted: Vec<RowAddress>,
        moves: Vec<RowMove>,
    ) -> Self {
        Self {
            deleted_sections,
            inserted_sections,
            updated,
            deleted,
            inserted,
            moves,
        }
    }

    /// Pre-update indexes of deleted sections, ascending.
    pub fn deleted_sections(&self) -> &[usize] {
        &self.deleted_sections
    }

    /// Post-update indexes of inserted sections, ascending.
    pub fn inserted_sections(&self) -> &[usize] {
        &self.inserted_sections
    }

    /// Pre-update addresses of updated rows, in arbitrary order.
    pub fn updated_addresses(&self) -> &[RowAddress] {
        &self.updated
    }

    /// Pre-update addresses of deleted rows, strictly descending.
    ///
    /// Descending order lets a consumer delete top-down from a live
    /// collection without invalidating the remaining indexes.
    pub fn deleted_addresses(&self) -> &[RowAddress] {
        &self.deleted
    }

    /// Post-update addresses of inserted rows, strictly ascending.
    ///
    /// Includes rows that belong to newly inserted sections.
    pub fn inserted_addresses(&self) -> &[RowAddress] {
        &self.inserted
    }

    /// Reconciled row moves, in arbitrary order.
    pub fn moves(&self) -> &[RowMove] {
        &self.moves
    }

    /// True when the cycle produced no changes at all.
    pub fn is_empty(&self) -> bool {
        self.deleted_sections.is_empty()
            && self.inserted_sections.is_empty()
            && self.updated.is_empty()
            && self.deleted.is_empty()
            && self.inserted.is_empty()
            && self.moves.is_empty()
    }

    /// Returns the post-update index of the section at `old_section` before
    /// the update, or `None` if that section was deleted.
    pub fn new_section_for_old_section(&self, old_section: usize) -> Option<usize> {
        if self.deleted_sections.binary_search(&old_section).is_ok() {
            return None;
        }
        let removed_before = self.deleted_sections.partition_point(|&s| s < old_section);
        let mut new_section = old_section - removed_before;
        // One ascending pass is the fixed point: each bump can only be
        // matched by a later, larger inserted index.
        for &inserted in &self.inserted_sections {
            if inserted <= new_section {
                new_section += 1;
            } else {
                break;
            }
        }
        Some(new_section)
    }

    /// Returns the pre-update index of the section at `new_section` after
    /// the update, or `None` if that section was inserted.
    ///
    /// Inverse of [`new_section_for_old_section`] on the
    /// non-deleted/non-inserted domain.
    ///
    /// [`new_section_for_old_section`]: ChangeSet::new_section_for_old_section
    pub fn old_section_for_new_section(&self, new_section: usize) -> Option<usize> {
        if self.inserted_sections.binary_search(&new_section).is_ok() {
            return None;
        }
        let inserted_before = self.inserted_sections.partition_point(|&s| s < new_section);
        let mut old_section = new_section - inserted_before;
        for &deleted in &self.deleted_sections {
            if deleted <= old_section {
                old_section += 1;
            } else {
                break;
            }
        }
        Some(old_section)
    }

    /// Returns the post-update address of the row at `old_address` before
    /// the update.
    ///
    /// A moved row reports the address its move was recorded with, even when
    /// its pre-update section was deleted. Returns `None` if the row or its
    /// containing pre-update section was deleted. An unchanged row gets its
    /// section index translated and its row index adjusted for rows deleted
    /// earlier in the same pre-update section and rows inserted at or before
    /// it in the translated section.
    pub fn new_index_path_for_old_index_path(&self, old_address: RowAddress) -> Option<RowAddress> {
        if let Some(row_move) = self.moves.iter().find(|m| m.from == old_address) {
            return Some(row_move.to);
        }
        if self.row_deleted(old_address) {
            return None;
        }
        let new_section = self.new_section_for_old_section(old_address.section)?;

        let removed_before = self
            .deleted
            .iter()
            .filter(|a| a.section == old_address.section && a.row < old_address.row)
            .count();
        let mut new_row = old_address.row - removed_before;
        // `inserted` ascends, so the section's rows arrive in ascending order.
        for address in self.inserted.iter().filter(|a| a.section == new_section) {
            if address.row <= new_row {
                new_row += 1;
            } else {
                break;
            }
        }
        Some(RowAddress::new(new_section, new_row))
    }

    /// Returns the pre-update address of the row at `new_address` after the
    /// update.
    ///
    /// Structural inverse of [`new_index_path_for_old_index_path`]: a moved
    /// row reports its recorded pre-update address (even when that section
    /// was deleted), and `None` is returned if the row or its containing
    /// post-update section was inserted.
    ///
    /// [`new_index_path_for_old_index_path`]: ChangeSet::new_index_path_for_old_index_path
    pub fn old_index_path_for_new_index_path(&self, new_address: RowAddress) -> Option<RowAddress> {
        if let Some(row_move) = self.moves.iter().find(|m| m.to == new_address) {
            return Some(row_move.from);
        }
        if self.inserted.binary_search(&new_address).is_ok() {
            return None;
        }
        let old_section = self.old_section_for_new_section(new_address.section)?;

        let inserted_before = self
            .inserted
            .iter()
            .filter(|a| a.section == new_address.section && a.row < new_address.row)
            .count();
        let mut old_row = new_address.row - inserted_before;
        // `deleted` descends; walk the section's entries back-to-front to
        // visit them in ascending row order.
        for address in self.deleted.iter().rev().filter(|a| a.section == old_section) {
            if address.row <= old_row {
                old_row += 1;
            } else {
                break;
            }
        }
        Some(RowAddress::new(old_section, old_row))
    }

    /// Invokes `f` once per move, in arbitrary order, until it returns
    /// [`ControlFlow::Break`] or the moves are exhausted.
    ///
    /// Each call enumerates from the beginning; there is no way to resume a
    /// broken-off enumeration.
    pub fn enumerate_moves<F>(&self, mut f: F)
    where
        F: FnMut(RowAddress, RowAddress) -> ControlFlow<()>,
    {
        for row_move in &self.moves {
            if f(row_move.from, row_move.to).is_break() {
                break;
            }
        }
    }

    /// Membership test against the descending deleted-address list.
    fn row_deleted(&self, address: RowAddress) -> bool {
        self.deleted
            .binary_search_by(|probe| address.cmp(probe))
            .is_ok()
    }
}
