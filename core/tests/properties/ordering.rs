// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::date;
use recurcal_core::ViewWindow;

use super::RULES;
use crate::common::{assert_sorted_unique, floating, iter, iter_with_window};

#[test]
fn occurrences_are_sorted_and_unique() {
    for rule in RULES {
        let it = iter(rule, floating(date(2024, 1, 10), 8, 0));
        assert!(!it.is_empty(), "{rule} produced nothing");
        assert_sorted_unique(&it.occurrences());
    }
}

#[test]
fn stays_sorted_after_edits() {
    for rule in RULES {
        let mut it = iter_with_window(
            rule,
            date(2024, 1, 10),
            ViewWindow::between(date(2024, 1, 1), date(2024, 3, 31)),
        );
        for day in [5, 12, 20] {
            it.add(&date(2024, 2, day).into(), None).unwrap();
        }
        it.remove(&date(2024, 1, 15).into()).unwrap();
        assert_sorted_unique(&it.occurrences());
    }
}

#[test]
fn cursor_walks_every_occurrence_in_order() {
    let mut it = iter("FREQ=WEEKLY;BYDAY=MO,WE,FR;COUNT=9", date(2024, 1, 1));
    let mut seen = Vec::new();
    while it.valid() {
        seen.push(it.current().unwrap().to_string());
        it.next();
    }
    assert_eq!(seen, it.occurrences());

    it.end();
    let mut backwards = Vec::new();
    loop {
        backwards.push(it.current_key().unwrap().to_string());
        if it.key() == 0 {
            break;
        }
        it.prev();
    }
    backwards.reverse();
    assert_eq!(backwards, seen);
}
