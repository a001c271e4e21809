// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::date;
use recurcal_core::ViewWindow;

use crate::common::{assert_occurrences, iter, iter_with_window};

#[test]
fn daily_count_from_new_year() {
    let it = iter("FREQ=DAILY;COUNT=5", date(2024, 1, 1));
    assert_occurrences(
        &it,
        &["20240101", "20240102", "20240103", "20240104", "20240105"],
    );
}

#[test]
fn monthly_31st_skips_short_months() {
    let it = iter_with_window(
        "FREQ=MONTHLY;BYMONTHDAY=31",
        date(2024, 1, 31),
        ViewWindow::between(date(2024, 1, 1), date(2024, 4, 30)),
    );
    assert_occurrences(&it, &["20240131", "20240331"]);
}

#[test]
fn monthly_without_day_parts_skips_short_months() {
    let it = iter_with_window(
        "FREQ=MONTHLY",
        date(2024, 1, 31),
        ViewWindow::between(date(2024, 1, 1), date(2024, 6, 30)),
    );
    assert_occurrences(&it, &["20240131", "20240331", "20240531"]);
}

#[test]
fn yearly_leap_day() {
    let it = iter_with_window(
        "FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=29",
        date(2020, 2, 29),
        ViewWindow::between(date(2020, 1, 1), date(2025, 12, 31)),
    );
    assert_occurrences(&it, &["20200229", "20240229"]);
}

#[test]
fn monthly_last_friday() {
    let it = iter_with_window(
        "FREQ=MONTHLY;BYDAY=-1FR",
        date(2024, 1, 1),
        ViewWindow {
            start: None,
            end: recurcal_core::ViewEnd::At(date(2024, 3, 31).into()),
        },
    );
    assert_occurrences(&it, &["20240126", "20240223", "20240329"]);
}

#[test]
fn impossible_rule_terminates_empty() {
    let it = iter("FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=30;COUNT=3", date(2024, 1, 1));
    assert!(it.is_empty());
    assert!(!it.valid());
}

#[test]
fn window_after_a_length() {
    let it = iter_with_window(
        "FREQ=DAILY",
        date(2024, 1, 1),
        ViewWindow {
            start: Some(date(2024, 6, 1).into()),
            end: recurcal_core::ViewEnd::After(jiff::SignedDuration::from_hours(48)),
        },
    );
    assert_occurrences(&it, &["20240601", "20240602", "20240603"]);
}
