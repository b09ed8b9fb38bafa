//! Property-based tests for snapshot, dedup, and revert guarantees

mod round_trip;
