//! Mutable accumulation of raw change events for one update cycle.

use std::collections::BTreeSet;

use crate::address::RowAddress;
use crate::change::{RowChange, RowMove, SectionChange};
use crate::changeset::ChangeSet;

/// Collects raw change events and finalizes them into a [`ChangeSet`].
///
/// One accumulator serves exactly one update cycle: create it when the cycle
/// begins, feed it events in arrival order, and consume it with
/// [`finish`](ChangeAccumulator::finish). Because `finish` takes the
/// accumulator by value, recording after finalization or finalizing twice is
/// a compile error rather than a runtime assertion. A cycle is abandoned by
/// dropping the accumulator; nothing is observable outside it until `finish`
/// returns.
///
/// The accumulator is mutated by a single producer and provides no internal
/// locking.
#[derive(Debug, Default)]
pub struct ChangeAccumulator {
    deleted_sections: Vec<usize>,
    inserted_sections: Vec<usize>,
    updated: Vec<RowAddress>,
    deleted: Vec<RowAddress>,
    inserted: Vec<RowAddress>,
    moves: Vec<RowMove>,
}

impl ChangeAccumulator {
    /// Creates an empty accumulator for a new update cycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a section insertion or deletion.
    ///
    /// Section changes may arrive in any order relative to each other, but
    /// the upstream source guarantees they all arrive before row changes.
    /// The accumulator does not depend on that guarantee.
    pub fn record_section_change(&mut self, change: SectionChange) {
        match change {
            SectionChange::Inserted { new_index } => self.inserted_sections.push(new_index),
            SectionChange::Deleted { old_index } => self.deleted_sections.push(old_index),
        }
    }

    /// Records a row change in arrival order.
    pub fn record_row_change(&mut self, change: RowChange) {
        match change {
            RowChange::Inserted(address) => self.inserted.push(address),
            RowChange::Deleted(address) => self.deleted.push(address),
            RowChange::Updated(address) => self.updated.push(address),
            RowChange::Moved { from, to } => self.moves.push(RowMove { from, to }),
        }
    }

    /// True if no event has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.deleted_sections.is_empty()
            && self.inserted_sections.is_empty()
            && self.updated.is_empty()
            && self.deleted.is_empty()
            && self.inserted.is_empty()
            && self.moves.is_empty()
    }

    /// Consumes the accumulator and produces the finalized, sorted change set.
    ///
    /// Reconciliation happens here, before sorting:
    /// - An update and a move reported for the same pre-update address
    ///   collapse into the move alone. The upstream source sometimes reports
    ///   one logical relocation as update+move or move+update.
    /// - A delete supersedes any update or move recorded for the same
    ///   pre-update address.
    ///
    /// Section indexes are deduplicated and sorted ascending. Deleted row
    /// addresses are sorted strictly descending so a consumer can delete
    /// top-down from a live collection; inserted row addresses are sorted
    /// strictly ascending for bottom-up insertion. Updated addresses and
    /// moves keep arrival order.
    pub fn finish(self) -> ChangeSet {
        let Self {
            mut deleted_sections,
            mut inserted_sections,
            mut updated,
            mut deleted,
            mut inserted,
            mut moves,
        } = self;

        deleted.sort_unstable();
        deleted.dedup();

        // A delete wins over any other pending event for the same old address.
        moves.retain(|m| deleted.binary_search(&m.from).is_err());

        // update+move on one address is a single logical move.
        let move_origins: BTreeSet<RowAddress> = moves.iter().map(|m| m.from).collect();
        updated.retain(|address| {
            deleted.binary_search(address).is_err() && !move_origins.contains(address)
        });

        // Descending for top-down deletion from a live collection.
        deleted.reverse();

        inserted.sort_unstable();
        inserted.dedup();

        deleted_sections.sort_unstable();
        deleted_sections.dedup();
        inserted_sections.sort_unstable();
        inserted_sections.dedup();

        tracing::debug!(
            "Finalized change set: {} section deletes, {} section inserts, {} updates, {} deletes, {} inserts, {} moves",
            deleted_sections.len(),
            inserted_sections.len(),
            updated.len(),
            deleted.len(),
            inserted.len(),
            moves.len(),
        );

        ChangeSet::from_parts(
            deleted_sections,
            inserted_sections,
            updated,
            deleted,
            inserted,
            moves,
        )
    }
}
