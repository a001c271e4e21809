// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::date;
use recurcal_core::{Error, LooseDateTime, RecurrenceRule, ViewWindow};

use super::RULES;
use crate::common::{floating, iter, iter_with_window, test_event};

#[test]
fn occurrences_stay_in_view_and_within_limits() {
    let (from, to) = (date(2024, 3, 1), date(2024, 5, 31));
    for rule in RULES {
        let it = iter_with_window(
            rule,
            floating(date(2024, 1, 10), 8, 0),
            ViewWindow::between(from, to),
        );
        for i in 0..it.len() {
            let at = it.get(i).unwrap();
            assert!(at.date() >= from && at.date() <= to, "{rule}: {at} outside view");
            assert!(it.limit(&at), "{rule}: {at} outside limits");
        }
    }
}

#[test]
fn count_caps_occurrences() {
    for rule in RULES {
        let parsed = RecurrenceRule::parse(rule).unwrap();
        if let Some(count) = parsed.count() {
            let it = iter(rule, floating(date(2024, 1, 10), 8, 0));
            assert_eq!(it.len(), usize::try_from(count).unwrap(), "{rule}");
        }
    }
}

#[test]
fn until_bounds_the_last_occurrence() {
    let it = iter("FREQ=DAILY;UNTIL=20240110", date(2024, 1, 1));
    assert_eq!(it.len(), 10);
    assert_eq!(it.occurrences().last(), Some(&"20240110"));

    let it = iter("FREQ=DAILY;UNTIL=20231231", date(2024, 1, 1));
    assert!(it.is_empty());
}

#[test]
fn lookups_report_not_found() {
    let it = iter("FREQ=DAILY;COUNT=2", date(2024, 1, 1));
    assert_eq!(it.get(2), Err(Error::NotFound));
    assert_eq!(it.search("20240103"), None);
}

#[test]
fn change_until_rejects_bounds_before_start() {
    let mut event = test_event("FREQ=WEEKLY;COUNT=4", floating(date(2024, 1, 1), 9, 0));
    let rule_before = event.rule_text();
    let occurrences_before: Vec<String> = event
        .iterator()
        .unwrap()
        .occurrences()
        .iter()
        .map(ToString::to_string)
        .collect();

    let early = floating(date(2023, 12, 31), 9, 0);
    assert!(matches!(
        event.change_until(&early),
        Err(Error::InvalidBound { .. })
    ));
    assert_eq!(event.rule_text(), rule_before);
    assert_eq!(event.iterator().unwrap().occurrences(), occurrences_before);
}

#[test]
fn change_until_on_the_start_keeps_one_occurrence() {
    let start = floating(date(2024, 1, 1), 9, 0);
    let mut event = test_event("FREQ=WEEKLY;COUNT=4", start.clone());
    event.change_until(&start).unwrap();
    assert_eq!(
        event.rule_text().as_deref(),
        Some("FREQ=WEEKLY;UNTIL=20240101T090000")
    );
    assert_eq!(event.iterator().unwrap().occurrences(), vec!["20240101T090000"]);
    assert_eq!(
        event.recurrence_end().unwrap(),
        LooseDateTime::Floating(jiff::civil::datetime(2024, 1, 1, 8, 59, 59, 0))
    );
}
