// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Span;
use jiff::civil::{Date, Time, Weekday};

/// NOTE: Used as recurrence ids and RDATE/EXDATE values, so it must be
/// stable across different runs.
pub const STABLE_FORMAT_DATEONLY: &str = "%Y%m%d";
pub const STABLE_FORMAT_FLOATING: &str = "%Y%m%dT%H%M%S";
pub const STABLE_FORMAT_UTC: &str = "%Y%m%dT%H%M%SZ";

pub const fn start_of_day() -> Time {
    Time::midnight()
}

/// The last representable instant of a day.
pub const fn end_of_day() -> Time {
    Time::MAX
}

/// Number of whole days from `from` to `to`, negative if `to` is earlier.
pub fn days_between(from: Date, to: Date) -> i64 {
    let from = from.to_datetime(start_of_day());
    let to = to.to_datetime(start_of_day());
    to.duration_since(from).as_secs() / 86_400
}

pub fn add_days(date: Date, days: i64) -> Option<Date> {
    let span = Span::new().try_days(days).ok()?;
    date.checked_add(span).ok()
}

/// The first day of the week containing `date`, for weeks starting on
/// `wkst`.
pub fn week_start(date: Date, wkst: Weekday) -> Option<Date> {
    let offset = weekday_offset(date.weekday(), wkst);
    add_days(date, -offset)
}

/// Days from `wkst` forward to `day`, in `0..7`.
pub fn weekday_offset(day: Weekday, wkst: Weekday) -> i64 {
    i64::from(day.to_monday_zero_offset() - wkst.to_monday_zero_offset()).rem_euclid(7)
}

/// Start of week 1 of `year`: the week, starting on `wkst`, that contains
/// January 4th and so has at least four days in the year.
pub fn first_week_start(year: i16, wkst: Weekday) -> Option<Date> {
    let jan4 = Date::new(year, 1, 4).ok()?;
    week_start(jan4, wkst)
}

/// Week number of `date` and the number of weeks in its week-numbering
/// year.
pub fn week_number(date: Date, wkst: Weekday) -> Option<(i64, i64)> {
    let year = date.year();
    for week_year in [year.checked_add(1), Some(year), year.checked_sub(1)] {
        let Some(start) = week_year.and_then(|y| first_week_start(y, wkst)) else {
            continue;
        };
        if start <= date {
            let next = week_year
                .and_then(|y| y.checked_add(1))
                .and_then(|y| first_week_start(y, wkst))?;
            let weeks = days_between(start, next) / 7;
            let number = days_between(start, date) / 7 + 1;
            return Some((number, weeks));
        }
    }
    None
}

/// Resolve a possibly negative ordinal against a length, `-1` being the
/// last element. Returns `None` when out of range.
pub fn resolve_ordinal(value: i64, len: i64) -> Option<i64> {
    let pos = if value < 0 { len + value + 1 } else { value };
    (1..=len).contains(&pos).then_some(pos)
}
