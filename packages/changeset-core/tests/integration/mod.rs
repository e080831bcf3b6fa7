//! Integration test suite for full update cycles.
//!
//! Tests drive the accumulator with complete event sequences in the order
//! the upstream source emits them (section changes, then row changes) and
//! check the finalized change set end to end.

pub mod cycle_tests;
