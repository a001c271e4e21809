// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::SignedDuration;
use jiff::civil::date;
use recurcal_core::{Config, OccurrenceOverride};

use crate::common::{floating, test_event, test_event_draft};

#[test]
fn this_and_future_duration_change() {
    let mut event = test_event("FREQ=DAILY;COUNT=5", floating(date(2024, 1, 1), 9, 0));
    let mut o = OccurrenceOverride::new("20240103T090000");
    o.affects_future = true;
    o.duration = Some(SignedDuration::from_hours(2));
    event.set_override(o).unwrap();

    let durations: Vec<(String, SignedDuration)> = event
        .occurrences()
        .unwrap()
        .iter()
        .map(|o| (o.recurrence_id().to_string(), o.duration()))
        .collect();
    let hour = SignedDuration::from_hours(1);
    let two = SignedDuration::from_hours(2);
    assert_eq!(
        durations,
        vec![
            ("20240101T090000".to_string(), hour),
            ("20240102T090000".to_string(), hour),
            ("20240103T090000".to_string(), two),
            ("20240104T090000".to_string(), two),
            ("20240105T090000".to_string(), two),
        ]
    );
}

#[test]
fn own_override_shadows_carried_one() {
    let mut event = test_event("FREQ=DAILY;COUNT=5", floating(date(2024, 1, 1), 9, 0));
    let mut future = OccurrenceOverride::new("20240102T090000");
    future.affects_future = true;
    future.title = Some("Renamed sync".to_string());
    event.set_override(future).unwrap();

    let mut single = OccurrenceOverride::new("20240104T090000");
    single.offset = Some(SignedDuration::from_mins(30));
    event.set_override(single).unwrap();

    let fourth = event.get_occurrence("20240104T090000").unwrap();
    assert_eq!(fourth.title(), "Weekly sync");
    assert_eq!(*fourth.start(), floating(date(2024, 1, 4), 9, 30));
    assert_eq!(*fourth.unadjusted_start(), floating(date(2024, 1, 4), 9, 0));
    assert_eq!(fourth.end().unwrap(), floating(date(2024, 1, 4), 10, 30));
    assert!(fourth.is_overridden());

    let fifth = event.get_occurrence("20240105T090000").unwrap();
    assert_eq!(fifth.title(), "Renamed sync");
    assert_eq!(fifth.location(), Some("Room 42"));
    assert_eq!(*fifth.start(), floating(date(2024, 1, 5), 9, 0));

    let first = event.get_occurrence("20240101T090000").unwrap();
    assert!(!first.is_overridden());
    assert_eq!(first.title(), "Weekly sync");
}

#[test]
fn zoned_recurrence_ids_are_normalized() {
    let tz = jiff::tz::TimeZone::get("Europe/Berlin").unwrap();
    let start = jiff::civil::datetime(2024, 1, 1, 9, 0, 0, 0).to_zoned(tz).unwrap();
    let mut event = test_event("FREQ=DAILY;COUNT=3", start);

    let mut o = OccurrenceOverride::new("TZID=Europe/Berlin:20240102T090000");
    o.location = Some("Room 7".to_string());
    event.set_override(o).unwrap();

    let second = event.get_occurrence("20240102T080000Z").unwrap();
    assert_eq!(second.location(), Some("Room 7"));
    assert_eq!(event.remove_override("20240102T080000Z").map(|o| o.affects_future), Some(false));
}

#[test]
fn normalizing_keeps_overrides_that_restore_base_values() {
    let mut event = test_event("FREQ=DAILY;COUNT=5", floating(date(2024, 1, 1), 9, 0));
    let mut future = OccurrenceOverride::new("20240102T090000");
    future.affects_future = true;
    future.title = Some("Renamed".to_string());
    event.set_override(future).unwrap();

    let mut restore = OccurrenceOverride::new("20240104T090000");
    restore.title = Some("Weekly sync".to_string());
    event.set_override(restore).unwrap();

    // repeats the carried title, so it is redundant
    let mut repeat = OccurrenceOverride::new("20240103T090000");
    repeat.title = Some("Renamed".to_string());
    event.set_override(repeat).unwrap();

    let titles = |event: &recurcal_core::RecurringEvent| {
        event
            .occurrences()
            .unwrap()
            .iter()
            .map(|o| o.title().to_string())
            .collect::<Vec<_>>()
    };
    let before = titles(&event);
    event.normalize_overrides().unwrap();
    assert_eq!(titles(&event), before);
    assert_eq!(before[3], "Weekly sync");

    let keys: Vec<&str> = event.overrides().map(|o| o.recurrence_id.as_str()).collect();
    assert_eq!(keys, vec!["20240102T090000", "20240104T090000"]);
}

#[test]
fn normalizing_keeps_overrides_of_explicit_durations() {
    let mut draft = test_event_draft("FREQ=DAILY;COUNT=5", floating(date(2024, 1, 1), 9, 0));
    draft.rdate = Some("20240110T090000/PT2H".to_string());
    let mut event = draft.build(Config::default()).unwrap();
    let hour = SignedDuration::from_hours(1);

    let extra = event.get_occurrence("20240110T090000").unwrap();
    assert_eq!(extra.duration(), SignedDuration::from_hours(2));

    let mut o = OccurrenceOverride::new("20240110T090000");
    o.duration = Some(hour);
    event.set_override(o).unwrap();
    event.normalize_overrides().unwrap();

    let extra = event.get_occurrence("20240110T090000").unwrap();
    assert_eq!(extra.duration(), hour);
    assert_eq!(event.overrides().count(), 1);

    // a plain occurrence already lasts an hour
    let mut o = OccurrenceOverride::new("20240102T090000");
    o.duration = Some(hour);
    event.set_override(o).unwrap();
    event.normalize_overrides().unwrap();
    assert_eq!(event.overrides().count(), 1);
}
