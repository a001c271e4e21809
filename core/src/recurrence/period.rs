// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Span;
use jiff::civil::{Date, DateTime, Time, Weekday};
use recurcal_ical::{RecurrenceFrequency, RecurrenceRule};

use crate::datetime::util::{add_days, days_between, first_week_start, resolve_ordinal, week_start};

/// One step of a rule's frequency: a run of whole days, or a single instant
/// for sub-daily rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Period {
    Days { first: Date, len: i64 },
    Instant(DateTime),
}

impl Period {
    /// The `k`-th period of `rule` counted from the one containing `anchor`.
    ///
    /// Returns `None` once the calendar range is exhausted.
    pub fn nth(rule: &RecurrenceRule, anchor: DateTime, k: i64) -> Option<Self> {
        let step = i64::from(rule.interval).checked_mul(k)?;
        let wkst = Weekday::from(rule.wkst);
        let period = match rule.freq {
            RecurrenceFrequency::Yearly => {
                let year = i16::try_from(i64::from(anchor.year()).checked_add(step)?).ok()?;
                if rule.by_week_no.is_empty() {
                    let first = Date::new(year, 1, 1).ok()?;
                    Period::Days {
                        first,
                        len: i64::from(first.days_in_year()),
                    }
                } else {
                    // weeks belong to the year holding most of their days
                    let first = first_week_start(year, wkst)?;
                    let next = first_week_start(year.checked_add(1)?, wkst)?;
                    Period::Days {
                        first,
                        len: days_between(first, next),
                    }
                }
            }
            RecurrenceFrequency::Monthly => {
                let months = i64::from(anchor.year()) * 12 + i64::from(anchor.month() - 1);
                let months = months.checked_add(step)?;
                let year = i16::try_from(months.div_euclid(12)).ok()?;
                let month = i8::try_from(months.rem_euclid(12) + 1).ok()?;
                let first = Date::new(year, month, 1).ok()?;
                Period::Days {
                    first,
                    len: i64::from(first.days_in_month()),
                }
            }
            RecurrenceFrequency::Weekly => {
                let start = week_start(anchor.date(), wkst)?;
                Period::Days {
                    first: add_days(start, step.checked_mul(7)?)?,
                    len: 7,
                }
            }
            RecurrenceFrequency::Daily => Period::Days {
                first: add_days(anchor.date(), step)?,
                len: 1,
            },
            RecurrenceFrequency::Hourly
            | RecurrenceFrequency::Minutely
            | RecurrenceFrequency::Secondly => {
                Period::Instant(add_units(anchor, rule.freq, step)?)
            }
        };
        Some(period)
    }

    /// First instant of the period.
    pub fn start(&self) -> DateTime {
        match self {
            Period::Days { first, .. } => first.to_datetime(Time::midnight()),
            Period::Instant(dt) => *dt,
        }
    }

    /// Every date the period touches.
    pub fn dates(&self) -> impl Iterator<Item = Date> {
        let (first, len) = match self {
            Period::Days { first, len } => (*first, *len),
            Period::Instant(dt) => (dt.date(), 1),
        };
        first
            .series(Span::new().days(1))
            .take(usize::try_from(len).unwrap_or(0))
    }
}

/// Shift `dt` by `n` units of `freq`, `None` on overflow.
pub(crate) fn add_units(dt: DateTime, freq: RecurrenceFrequency, n: i64) -> Option<DateTime> {
    let span = match freq {
        RecurrenceFrequency::Yearly => Span::new().try_years(n),
        RecurrenceFrequency::Monthly => Span::new().try_months(n),
        RecurrenceFrequency::Weekly => Span::new().try_weeks(n),
        RecurrenceFrequency::Daily => Span::new().try_days(n),
        RecurrenceFrequency::Hourly => Span::new().try_hours(n),
        RecurrenceFrequency::Minutely => Span::new().try_minutes(n),
        RecurrenceFrequency::Secondly => Span::new().try_seconds(n),
    }
    .ok()?;
    dt.checked_add(span).ok()
}

/// Whole periods of `rule` between `anchor` and `target`, never negative.
pub(crate) fn estimate_periods(rule: &RecurrenceRule, anchor: DateTime, target: DateTime) -> i64 {
    let units = match rule.freq {
        RecurrenceFrequency::Yearly => i64::from(target.year()) - i64::from(anchor.year()),
        RecurrenceFrequency::Monthly => {
            (i64::from(target.year()) - i64::from(anchor.year())) * 12
                + i64::from(target.month())
                - i64::from(anchor.month())
        }
        RecurrenceFrequency::Weekly => week_start(anchor.date(), rule.wkst.into())
            .map_or(0, |start| days_between(start, target.date()) / 7),
        RecurrenceFrequency::Daily => days_between(anchor.date(), target.date()),
        RecurrenceFrequency::Hourly => target.duration_since(anchor).as_hours(),
        RecurrenceFrequency::Minutely => target.duration_since(anchor).as_mins(),
        RecurrenceFrequency::Secondly => target.duration_since(anchor).as_secs(),
    };
    (units / i64::from(rule.interval.max(1))).max(0)
}

/// Pick the BYSETPOS positions out of one period's sorted candidates.
pub(crate) fn select_positions(candidates: &[DateTime], positions: &[i16]) -> Vec<DateTime> {
    let len = i64::try_from(candidates.len()).unwrap_or(i64::MAX);
    let mut out: Vec<DateTime> = positions
        .iter()
        .filter_map(|p| resolve_ordinal(i64::from(*p), len))
        .filter_map(|pos| usize::try_from(pos - 1).ok())
        .filter_map(|i| candidates.get(i).copied())
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}
