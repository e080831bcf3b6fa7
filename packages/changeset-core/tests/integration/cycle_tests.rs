//! Full-cycle scenarios: reconciliation and canonical collection contents.

use changeset_core::{ChangeAccumulator, RowAddress, RowChange, RowMove, SectionChange};

fn addr(section: usize, row: usize) -> RowAddress {
    RowAddress::new(section, row)
}

/// A realistic batch: one section removed, one added, and a mix of row
/// events, all checked against the canonical output orders.
#[test]
fn test_mixed_cycle_produces_canonical_collections() {
    let mut accumulator = ChangeAccumulator::new();
    accumulator.record_section_change(SectionChange::Deleted { old_index: 2 });
    accumulator.record_section_change(SectionChange::Inserted { new_index: 0 });

    accumulator.record_row_change(RowChange::Deleted(addr(1, 4)));
    accumulator.record_row_change(RowChange::Deleted(addr(0, 0)));
    accumulator.record_row_change(RowChange::Updated(addr(1, 1)));
    accumulator.record_row_change(RowChange::Inserted(addr(0, 2)));
    accumulator.record_row_change(RowChange::Inserted(addr(0, 0)));
    accumulator.record_row_change(RowChange::Moved {
        from: addr(1, 0),
        to: addr(2, 3),
    });

    let change_set = accumulator.finish();

    assert_eq!(change_set.deleted_sections(), &[2]);
    assert_eq!(change_set.inserted_sections(), &[0]);
    assert_eq!(change_set.deleted_addresses(), &[addr(1, 4), addr(0, 0)]);
    assert_eq!(change_set.inserted_addresses(), &[addr(0, 0), addr(0, 2)]);
    assert_eq!(change_set.updated_addresses(), &[addr(1, 1)]);
    assert_eq!(
        change_set.moves(),
        &[RowMove {
            from: addr(1, 0),
            to: addr(2, 3),
        }]
    );
}

#[test]
fn test_update_and_move_on_same_address_is_one_move() {
    let mut accumulator = ChangeAccumulator::new();
    accumulator.record_row_change(RowChange::Updated(addr(1, 2)));
    accumulator.record_row_change(RowChange::Moved {
        from: addr(1, 2),
        to: addr(1, 4),
    });
    let change_set = accumulator.finish();

    assert!(!change_set.updated_addresses().contains(&addr(1, 2)));
    assert_eq!(
        change_set.moves(),
        &[RowMove {
            from: addr(1, 2),
            to: addr(1, 4),
        }]
    );
}

/// ASSUMPTION, not an observed upstream guarantee: when a delete and an
/// update (or move) arrive for the same pre-update address, the delete
/// wins. The upstream source is not documented to ever emit this pairing.
#[test]
fn test_delete_supersedes_update_on_same_address() {
    let mut accumulator = ChangeAccumulator::new();
    accumulator.record_row_change(RowChange::Updated(addr(0, 3)));
    accumulator.record_row_change(RowChange::Deleted(addr(0, 3)));
    let change_set = accumulator.finish();

    assert!(change_set.updated_addresses().is_empty());
    assert_eq!(change_set.deleted_addresses(), &[addr(0, 3)]);
}

/// Same assumption as above, for move+delete.
#[test]
fn test_delete_supersedes_move_on_same_address() {
    let mut accumulator = ChangeAccumulator::new();
    accumulator.record_row_change(RowChange::Moved {
        from: addr(0, 3),
        to: addr(2, 0),
    });
    accumulator.record_row_change(RowChange::Deleted(addr(0, 3)));
    let change_set = accumulator.finish();

    assert!(change_set.moves().is_empty());
    assert_eq!(change_set.deleted_addresses(), &[addr(0, 3)]);
}

#[test]
fn test_inserted_section_rows_appear_in_inserted_addresses() {
    // New section at index 1 arrives with two rows of its own.
    let mut accumulator = ChangeAccumulator::new();
    accumulator.record_section_change(SectionChange::Inserted { new_index: 1 });
    accumulator.record_row_change(RowChange::Inserted(addr(1, 0)));
    accumulator.record_row_change(RowChange::Inserted(addr(1, 1)));
    let change_set = accumulator.finish();

    assert_eq!(change_set.inserted_sections(), &[1]);
    assert_eq!(change_set.inserted_addresses(), &[addr(1, 0), addr(1, 1)]);
}
