// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Custom assertion helpers for integration tests.

use recurcal_core::RecurrenceIterator;

/// Asserts that the iterator holds exactly `expected`, in order.
///
/// # Panics
///
/// Panics if the occurrences differ.
pub fn assert_occurrences(iter: &RecurrenceIterator, expected: &[&str]) {
    assert_eq!(iter.occurrences(), expected, "Occurrence mismatch");
}

/// Asserts that keys are strictly ascending.
///
/// # Panics
///
/// Panics on the first pair out of order or repeated.
pub fn assert_sorted_unique(keys: &[&str]) {
    for pair in keys.windows(2) {
        assert!(pair[0] < pair[1], "{} should come before {}", pair[0], pair[1]);
    }
}
