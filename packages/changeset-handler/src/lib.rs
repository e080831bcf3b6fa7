//! Cycle-driving change handler and observer fan-out.
//!
//! Receives the upstream snapshot source's raw callbacks in cycle order
//! (begin, section changes, row changes, end), validates them, drives one
//! [`ChangeAccumulator`] per cycle, and delivers each finalized
//! [`ChangeSet`] to an optional typed callback and any number of registered
//! observers. The most recent set is also published through an
//! [`arc_swap::ArcSwapOption`] so readers on other threads can query it
//! without synchronization.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use changeset_core::{
    ChangeAccumulator, ChangeError, ChangeSet, Result, RowAddress, RowChange, RowChangeKind,
    SectionChange, SectionChangeKind,
};

/// Observer callback invoked synchronously with each finalized change set.
pub type ChangeObserver = Box<dyn Fn(&Arc<ChangeSet>) + Send + Sync>;

/// Identifier returned by [`ChangeHandler::subscribe`] for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Drives the per-cycle accumulation protocol and fans finalized change
/// sets out to observers.
///
/// The handler is mutated by a single producer, the upstream source's
/// callback thread. Cycle state errors (an event outside a cycle, a nested
/// begin, an end without a begin) surface as
/// [`ChangeError::InvalidState`]; malformed row events surface as
/// [`ChangeError::InvalidArgument`] with the cycle left untouched.
pub struct ChangeHandler {
    /// Accumulator for the open cycle, if any
    in_progress: Option<ChangeAccumulator>,
    /// Registered observers in subscription order
    observers: Vec<(ObserverId, ChangeObserver)>,
    /// Next observer id to hand out
    next_observer_id: u64,
    /// Optional typed callback, invoked before the observers
    on_change: Option<ChangeObserver>,
    /// Most recently finalized change set
    latest: ArcSwapOption<ChangeSet>,
}

impl ChangeHandler {
    /// Creates a handler with no open cycle and no observers.
    pub fn new() -> Self {
        Self {
            in_progress: None,
            observers: Vec::new(),
            next_observer_id: 0,
            on_change: None,
            latest: ArcSwapOption::empty(),
        }
    }

    /// Sets the typed callback invoked with each finalized change set.
    ///
    /// Replaces any previously set callback.
    pub fn set_on_change<F>(&mut self, callback: F)
    where
        F: Fn(&Arc<ChangeSet>) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
    }

    /// Removes the typed callback.
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    /// Registers an observer; returns an id accepted by [`unsubscribe`].
    ///
    /// Observers are invoked synchronously during [`end_cycle`], in
    /// subscription order, though the order is not part of the contract.
    ///
    /// [`unsubscribe`]: ChangeHandler::unsubscribe
    /// [`end_cycle`]: ChangeHandler::end_cycle
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: Fn(&Arc<ChangeSet>) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes a previously registered observer.
    ///
    /// Returns false if the id was never subscribed or already removed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// True while a cycle is open.
    pub fn cycle_in_progress(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Starts a new update cycle.
    ///
    /// # Errors
    ///
    /// `InvalidState` if a cycle is already open.
    pub fn begin_cycle(&mut self) -> Result<()> {
        if self.in_progress.is_some() {
            return Err(ChangeError::InvalidState(
                "begin_cycle while a cycle is already in progress",
            ));
        }
        self.in_progress = Some(ChangeAccumulator::new());
        tracing::debug!("Update cycle started");
        Ok(())
    }

    /// Records a raw section change for the open cycle.
    ///
    /// # Errors
    ///
    /// `InvalidState` if no cycle is open.
    pub fn section_changed(&mut self, kind: SectionChangeKind, index: usize) -> Result<()> {
        let change = match kind {
            SectionChangeKind::Inserted => SectionChange::Inserted { new_index: index },
            SectionChangeKind::Deleted => SectionChange::Deleted { old_index: index },
        };
        let accumulator = self.in_progress.as_mut().ok_or(ChangeError::InvalidState(
            "section change outside an update cycle",
        ))?;
        accumulator.record_section_change(change);
        Ok(())
    }

    /// Records a raw row change for the open cycle.
    ///
    /// The upstream callback reports both addresses as optional; which one
    /// must be present depends on the kind: inserts carry only the new
    /// address, deletes and updates only the old address, moves both.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the addresses do not match the kind; the open
    ///   cycle is left unchanged.
    /// - `InvalidState` if no cycle is open.
    pub fn row_changed(
        &mut self,
        kind: RowChangeKind,
        old_address: Option<RowAddress>,
        new_address: Option<RowAddress>,
    ) -> Result<()> {
        let change = match (kind, old_address, new_address) {
            (RowChangeKind::Inserted, None, Some(address)) => RowChange::Inserted(address),
            (RowChangeKind::Deleted, Some(address), None) => RowChange::Deleted(address),
            (RowChangeKind::Updated, Some(address), None) => RowChange::Updated(address),
            (RowChangeKind::Moved, Some(from), Some(to)) => RowChange::Moved { from, to },
            (RowChangeKind::Inserted, ..) => {
                return Err(ChangeError::InvalidArgument {
                    kind,
                    reason: "requires a new address and no old address",
                })
            }
            (RowChangeKind::Deleted | RowChangeKind::Updated, ..) => {
                return Err(ChangeError::InvalidArgument {
                    kind,
                    reason: "requires an old address and no new address",
                })
            }
            (RowChangeKind::Moved, ..) => {
                return Err(ChangeError::InvalidArgument {
                    kind,
                    reason: "requires both an old and a new address",
                })
            }
        };
        let accumulator = self.in_progress.as_mut().ok_or(ChangeError::InvalidState(
            "row change outside an update cycle",
        ))?;
        accumulator.record_row_change(change);
        Ok(())
    }

    /// Ends the open cycle: finalizes the accumulator, publishes the result
    /// as [`latest`](ChangeHandler::latest), notifies the typed callback and
    /// every observer, and returns the finalized set.
    ///
    /// # Errors
    ///
    /// `InvalidState` if no cycle is open.
    pub fn end_cycle(&mut self) -> Result<Arc<ChangeSet>> {
        let accumulator = self
            .in_progress
            .take()
            .ok_or(ChangeError::InvalidState("end_cycle without begin_cycle"))?;
        let change_set = Arc::new(accumulator.finish());
        self.latest.store(Some(change_set.clone()));

        if let Some(callback) = &self.on_change {
            callback(&change_set);
        }
        for (_, observer) in &self.observers {
            observer(&change_set);
        }
        tracing::debug!(
            "Update cycle finished, change set delivered to {} observers",
            self.observers.len(),
        );
        Ok(change_set)
    }

    /// Discards the open cycle without producing a change set.
    ///
    /// Returns false if no cycle was open. Nothing is published and no
    /// observer is notified.
    pub fn abandon_cycle(&mut self) -> bool {
        let abandoned = self.in_progress.take().is_some();
        if abandoned {
            tracing::debug!("Update cycle abandoned");
        }
        abandoned
    }

    /// The most recently finalized change set, if any cycle has completed.
    ///
    /// Lock-free; safe to call from any thread holding a shared reference.
    pub fn latest(&self) -> Option<Arc<ChangeSet>> {
        self.latest.load_full()
    }
}

impl Default for ChangeHandler {
    fn default() -> Self {
        Self::new()
    }
}
