// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::SignedDuration;
use jiff::civil::date;
use recurcal_core::ViewWindow;

use super::RULES;
use crate::common::{floating, iter_with_window, test_event};

fn window() -> ViewWindow {
    ViewWindow::between(date(2024, 1, 1), date(2024, 6, 30))
}

#[test]
fn adding_twice_changes_nothing() {
    for rule in RULES {
        let mut it = iter_with_window(rule, floating(date(2024, 1, 10), 8, 0), window());
        let extra = floating(date(2024, 2, 29), 23, 59);
        let first = it.add(&extra, None).unwrap();
        let after_first = it.occurrences().iter().map(ToString::to_string).collect::<Vec<_>>();
        assert!(!it.add(&extra, None).unwrap(), "{rule}");
        assert_eq!(it.occurrences(), after_first, "{rule}");
        assert!(first || after_first.contains(&"20240229T235900".to_string()));
    }
}

#[test]
fn removing_twice_changes_nothing() {
    for rule in RULES {
        let mut it = iter_with_window(rule, floating(date(2024, 1, 10), 8, 0), window());
        let Ok(victim) = it.get(it.len() / 2) else {
            continue;
        };
        assert!(it.remove(&victim).unwrap(), "{rule}");
        let after_first = it.occurrences().iter().map(ToString::to_string).collect::<Vec<_>>();
        assert!(!it.remove(&victim).unwrap(), "{rule}");
        assert_eq!(it.occurrences(), after_first, "{rule}");
    }
}

#[test]
fn remove_then_add_restores_rule_occurrences() {
    for rule in RULES {
        let mut it = iter_with_window(rule, floating(date(2024, 1, 10), 8, 0), window());
        let before = it.occurrences().iter().map(ToString::to_string).collect::<Vec<_>>();
        let Ok(victim) = it.get(0) else {
            continue;
        };

        it.remove(&victim).unwrap();
        assert_eq!(it.excluded_dates().len(), 1, "{rule}");
        it.add(&victim, None).unwrap();

        assert_eq!(it.occurrences(), before, "{rule}");
        assert!(it.explicit_dates().is_empty(), "{rule}");
        assert!(it.excluded_dates().is_empty(), "{rule}");
    }
}

#[test]
fn edits_rewind_the_cursor() {
    let mut it = iter_with_window("FREQ=DAILY", date(2024, 1, 1), window());
    it.next();
    it.next();
    it.add(&date(2024, 1, 1).into(), None).unwrap();
    assert_eq!(it.key(), 0);
}

#[test]
fn event_edits_flow_into_occurrences() {
    let mut event = test_event("FREQ=WEEKLY;COUNT=3", floating(date(2024, 1, 1), 9, 0));
    let extra = floating(date(2024, 1, 3), 14, 0);
    assert!(event.add_date(&extra, Some(SignedDuration::from_mins(30))).unwrap());
    assert!(event.remove_date(&floating(date(2024, 1, 8), 9, 0)).unwrap());

    let resolved: Vec<(String, SignedDuration)> = event
        .occurrences()
        .unwrap()
        .iter()
        .map(|o| (o.recurrence_id().to_string(), o.duration()))
        .collect();
    assert_eq!(
        resolved,
        vec![
            ("20240101T090000".to_string(), SignedDuration::from_hours(1)),
            ("20240103T140000".to_string(), SignedDuration::from_mins(30)),
            ("20240115T090000".to_string(), SignedDuration::from_hours(1)),
        ]
    );
    let it = event.iterator().unwrap();
    assert_eq!(it.explicit_dates_value(), "20240103T140000/PT30M");
    assert_eq!(it.excluded_dates_value(), "20240108T090000");
}

#[test]
fn view_changes_keep_edits() {
    let mut event = test_event("FREQ=DAILY", date(2024, 1, 1));
    event.remove_date(&date(2024, 1, 2).into()).unwrap();
    event
        .set_view_window(ViewWindow::between(date(2024, 1, 1), date(2024, 1, 4)))
        .unwrap();
    assert_eq!(
        event.iterator().unwrap().occurrences(),
        vec!["20240101", "20240103", "20240104"]
    );
    assert!(!event
        .set_view_window(ViewWindow::between(date(2024, 1, 1), date(2024, 1, 4)))
        .unwrap());
}

#[test]
fn removing_absent_dates_changes_nothing() {
    for rule in RULES {
        let mut it = iter_with_window(rule, floating(date(2024, 1, 10), 8, 0), window());
        let before = it.occurrences().iter().map(ToString::to_string).collect::<Vec<_>>();
        let absent = floating(date(2025, 6, 1), 7, 13);
        assert!(!it.remove(&absent).unwrap(), "{rule}");
        assert!(it.excluded_dates().is_empty(), "{rule}");
        assert!(it.explicit_dates().is_empty(), "{rule}");
        assert_eq!(it.occurrences(), before, "{rule}");
    }
}
