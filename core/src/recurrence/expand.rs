// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::{Date, DateTime, Time, Weekday};
use recurcal_ical::{RecurrenceFrequency, RecurrenceRule, WeekDayNum};

use crate::datetime::util::{resolve_ordinal, week_number};
use crate::recurrence::period::Period;

/// Tests wall-clock instants against the BY parts of a rule.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Matcher<'a> {
    rule: &'a RecurrenceRule,
    wkst: Weekday,
    all_day: bool,
}

impl<'a> Matcher<'a> {
    pub fn new(rule: &'a RecurrenceRule, all_day: bool) -> Self {
        Self {
            rule,
            wkst: rule.wkst.into(),
            all_day,
        }
    }

    pub fn matches(&self, dt: DateTime) -> bool {
        self.date_matches(dt.date()) && (self.all_day || self.time_matches(dt.time()))
    }

    pub fn date_matches(&self, d: Date) -> bool {
        let rule = self.rule;
        if !rule.by_month.is_empty() && !rule.by_month.contains(&d.month()) {
            return false;
        }

        if !rule.by_week_no.is_empty() {
            let Some((number, weeks)) = week_number(d, self.wkst) else {
                return false;
            };
            if !rule
                .by_week_no
                .iter()
                .any(|v| resolve_ordinal(i64::from(*v), weeks) == Some(number))
            {
                return false;
            }
        }

        if !rule.by_year_day.is_empty() {
            let (pos, len) = (i64::from(d.day_of_year()), i64::from(d.days_in_year()));
            if !rule
                .by_year_day
                .iter()
                .any(|v| resolve_ordinal(i64::from(*v), len) == Some(pos))
            {
                return false;
            }
        }

        if !rule.by_month_day.is_empty() {
            let (pos, len) = (i64::from(d.day()), i64::from(d.days_in_month()));
            if !rule
                .by_month_day
                .iter()
                .any(|v| resolve_ordinal(i64::from(*v), len) == Some(pos))
            {
                return false;
            }
        }

        rule.by_day.is_empty() || rule.by_day.iter().any(|wd| self.weekday_matches(*wd, d))
    }

    pub fn time_matches(&self, t: Time) -> bool {
        let rule = self.rule;
        (rule.by_hour.is_empty() || rule.by_hour.contains(&t.hour()))
            && (rule.by_minute.is_empty() || rule.by_minute.contains(&t.minute()))
            && (rule.by_second.is_empty()
                || rule.by_second.iter().any(|s| (*s).min(59) == t.second()))
    }

    fn weekday_matches(&self, wd: WeekDayNum, d: Date) -> bool {
        if Weekday::from(wd.day) != d.weekday() {
            return false;
        }
        let Some(n) = wd.occurrence else {
            return true;
        };

        let (pos, len) = if self.month_scoped() {
            (i64::from(d.day()), i64::from(d.days_in_month()))
        } else {
            (i64::from(d.day_of_year()), i64::from(d.days_in_year()))
        };
        let nth = if n > 0 {
            (pos - 1) / 7 + 1
        } else {
            -((len - pos) / 7 + 1)
        };
        nth == i64::from(n)
    }

    /// Ordinal weekdays count within the month for monthly rules and for
    /// yearly rules narrowed by BYMONTH, within the year otherwise.
    fn month_scoped(&self) -> bool {
        match self.rule.freq {
            RecurrenceFrequency::Monthly => true,
            RecurrenceFrequency::Yearly => !self.rule.by_month.is_empty(),
            _ => false,
        }
    }
}

/// Produces the candidate instants of one period.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Expander<'a> {
    rule: &'a RecurrenceRule,
    matcher: Matcher<'a>,
    anchor: DateTime,
    all_day: bool,
}

impl<'a> Expander<'a> {
    pub fn new(rule: &'a RecurrenceRule, anchor: DateTime, all_day: bool) -> Self {
        Self {
            rule,
            matcher: Matcher::new(rule, all_day),
            anchor,
            all_day,
        }
    }

    /// All instants of `period` allowed by the rule, ascending and unique.
    pub fn candidates(&self, period: &Period) -> Vec<DateTime> {
        let times = self.times(period.start());
        if times.is_empty() {
            return Vec::new();
        }

        let mut out: Vec<DateTime> = period
            .dates()
            .filter(|d| self.matcher.date_matches(*d) && self.anchor_day_matches(*d))
            .flat_map(|d| times.iter().map(move |t| d.to_datetime(*t)))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Without BY parts that pick days, a rule keeps the day of its anchor.
    fn anchor_day_matches(&self, d: Date) -> bool {
        let rule = self.rule;
        let anchor = self.anchor.date();
        match rule.freq {
            RecurrenceFrequency::Yearly => {
                if rule.by_week_no.is_empty()
                    && rule.by_year_day.is_empty()
                    && rule.by_month_day.is_empty()
                    && rule.by_day.is_empty()
                {
                    d.day() == anchor.day()
                        && (!rule.by_month.is_empty() || d.month() == anchor.month())
                } else {
                    true
                }
            }
            RecurrenceFrequency::Monthly => {
                !(rule.by_month_day.is_empty() && rule.by_day.is_empty())
                    || d.day() == anchor.day()
            }
            RecurrenceFrequency::Weekly => {
                !rule.by_day.is_empty() || d.weekday() == anchor.weekday()
            }
            _ => true,
        }
    }

    fn times(&self, at: DateTime) -> Vec<Time> {
        if self.all_day {
            return vec![Time::midnight()];
        }

        let rule = self.rule;
        let hours = self.units(RecurrenceFrequency::Hourly, &rule.by_hour, self.anchor.hour(), at.hour());
        let minutes = self.units(
            RecurrenceFrequency::Minutely,
            &rule.by_minute,
            self.anchor.minute(),
            at.minute(),
        );
        let seconds = self.units(
            RecurrenceFrequency::Secondly,
            &rule.by_second,
            self.anchor.second(),
            at.second(),
        );

        let mut out = Vec::with_capacity(hours.len() * minutes.len() * seconds.len());
        for h in &hours {
            for m in &minutes {
                for s in &seconds {
                    if let Ok(t) = Time::new(*h, *m, *s, 0) {
                        out.push(t);
                    }
                }
            }
        }
        out
    }

    /// Values of one time unit. Coarser rules expand the unit by its BY list
    /// or take it from the anchor, finer rules keep the period's own value
    /// if the BY list allows it.
    fn units(&self, unit: RecurrenceFrequency, by: &[i8], anchor: i8, current: i8) -> Vec<i8> {
        if self.rule.freq > unit {
            if by.is_empty() {
                return vec![anchor];
            }
            let mut values: Vec<i8> = by.iter().map(|v| (*v).min(59)).collect();
            values.sort_unstable();
            values.dedup();
            values
        } else if by.is_empty() || by.iter().any(|v| (*v).min(59) == current) {
            vec![current]
        } else {
            Vec::new()
        }
    }
}
