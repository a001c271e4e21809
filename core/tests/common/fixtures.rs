// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.

use jiff::civil::{Date, datetime};
use recurcal_core::{
    Config, LooseDateTime, RecurrenceIterator, RecurrenceRule, RecurringEvent,
    RecurringEventDraft, ViewWindow,
};

/// Creates an iterator over an open window with the default configuration.
///
/// # Panics
///
/// Panics if the rule does not parse.
#[must_use]
pub fn iter(rule: &str, anchor: impl Into<LooseDateTime>) -> RecurrenceIterator {
    iter_with_window(rule, anchor, ViewWindow::default())
}

/// Creates an iterator over the given window.
///
/// # Panics
///
/// Panics if the rule does not parse.
#[must_use]
pub fn iter_with_window(
    rule: &str,
    anchor: impl Into<LooseDateTime>,
    window: ViewWindow,
) -> RecurrenceIterator {
    let rule = RecurrenceRule::parse(rule).expect("rule should parse");
    RecurrenceIterator::new(rule, anchor.into(), window, Config::default())
        .expect("iterator should build")
}

/// A floating date-time.
#[must_use]
pub fn floating(date: Date, hour: i8, minute: i8) -> LooseDateTime {
    LooseDateTime::Floating(datetime(date.year(), date.month(), date.day(), hour, minute, 0, 0))
}

/// Creates a one hour draft titled "Weekly sync" recurring by `rule`.
#[must_use]
pub fn test_event_draft(rule: &str, start: impl Into<LooseDateTime>) -> RecurringEventDraft {
    let mut draft = RecurringEventDraft::new(start);
    draft.title = "Weekly sync".to_string();
    draft.location = Some("Room 42".to_string());
    draft.duration = Some(jiff::SignedDuration::from_hours(1));
    draft.rule = Some(rule.to_string());
    draft
}

/// Builds the event of [`test_event_draft`].
///
/// # Panics
///
/// Panics if the draft does not build.
#[must_use]
pub fn test_event(rule: &str, start: impl Into<LooseDateTime>) -> RecurringEvent {
    test_event_draft(rule, start)
        .build(Config::default())
        .expect("event should build")
}
