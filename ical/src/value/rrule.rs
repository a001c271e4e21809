// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rule value (RFC 5545 Section 3.3.10).
//!
//! Parsing is lenient at the field level: unknown parts and out of range
//! list items are dropped. Only a missing or unknown `FREQ` is fatal. Parts
//! that cannot apply to the chosen frequency are pruned, so that
//! [`RecurrenceRule`] always serializes to a canonical form that parses back
//! to an equal value.

use std::fmt::{self, Display};
use std::ops::RangeInclusive;
use std::str::FromStr;

use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use jiff::civil::{DateTime, Time, Weekday};

use crate::keyword::{
    KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE, KW_RRULE_BYDAY,
    KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSECOND,
    KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO, KW_RRULE_BYYEARDAY, KW_RRULE_COUNT, KW_RRULE_FREQ,
    KW_RRULE_FREQ_DAILY, KW_RRULE_FREQ_HOURLY, KW_RRULE_FREQ_MINUTELY, KW_RRULE_FREQ_MONTHLY,
    KW_RRULE_FREQ_SECONDLY, KW_RRULE_FREQ_WEEKLY, KW_RRULE_FREQ_YEARLY, KW_RRULE_INTERVAL,
    KW_RRULE_UNTIL, KW_RRULE_WKST,
};
use crate::parser::{ParseError, run_parser};
use crate::value::datetime::{DateTimeKind, ValueInstant};
use crate::value::miscellaneous::{is_positive, uint};

/// Recurrence rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Frequency of recurrence
    pub freq: RecurrenceFrequency,
    /// Interval between recurrences, at least 1
    pub interval: u32,
    /// How the recurrence ends
    pub bound: RecurrenceBound,
    /// Second specifier, 0 to 60
    pub by_second: Vec<i8>,
    /// Minute specifier, 0 to 59
    pub by_minute: Vec<i8>,
    /// Hour specifier, 0 to 23
    pub by_hour: Vec<i8>,
    /// Day of week specifier
    pub by_day: Vec<WeekDayNum>,
    /// Day of month specifier, -31 to -1 and 1 to 31
    pub by_month_day: Vec<i8>,
    /// Day of year specifier, -366 to -1 and 1 to 366
    pub by_year_day: Vec<i16>,
    /// Week number specifier, -53 to -1 and 1 to 53
    pub by_week_no: Vec<i8>,
    /// Month specifier, 1 to 12
    pub by_month: Vec<i8>,
    /// Position within the frequency period, -366 to -1 and 1 to 366
    pub by_set_pos: Vec<i16>,
    /// Start day of week
    pub wkst: WeekDay,
}

impl RecurrenceRule {
    /// A rule with the given frequency and every other part at its default.
    #[must_use]
    pub fn new(freq: RecurrenceFrequency) -> Self {
        Self {
            freq,
            interval: 1,
            bound: RecurrenceBound::Forever,
            by_second: Vec::new(),
            by_minute: Vec::new(),
            by_hour: Vec::new(),
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
            wkst: WeekDay::Monday,
        }
    }

    /// Parse a rule such as `FREQ=MONTHLY;BYDAY=-1FR` or
    /// `RRULE:FREQ=DAILY;COUNT=5`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingFrequency`] when there is no `FREQ`
    /// part and [`ParseError::InvalidFrequency`] when its value is unknown.
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        let body = strip_rule_name(src.trim());

        let mut freq = None;
        let mut rule = Self::new(RecurrenceFrequency::Yearly);
        let mut until = None;
        let mut count = None;
        for part in body.split(';') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_ascii_uppercase().as_str() {
                KW_RRULE_FREQ => {
                    let f = value
                        .parse()
                        .map_err(|_| ParseError::InvalidFrequency(value.to_owned()))?;
                    freq = Some(f);
                }
                KW_RRULE_INTERVAL => {
                    rule.interval = positive_int(value).unwrap_or(1);
                }
                KW_RRULE_COUNT => count = positive_int(value),
                KW_RRULE_UNTIL => until = parse_until(value),
                KW_RRULE_BYSECOND => rule.by_second = int_list(value, &(0..=60), false),
                KW_RRULE_BYMINUTE => rule.by_minute = int_list(value, &(0..=59), false),
                KW_RRULE_BYHOUR => rule.by_hour = int_list(value, &(0..=23), false),
                KW_RRULE_BYDAY => {
                    rule.by_day = value.split(',').filter_map(WeekDayNum::parse_item).collect();
                }
                KW_RRULE_BYMONTHDAY => rule.by_month_day = int_list(value, &(1..=31), true),
                KW_RRULE_BYYEARDAY => rule.by_year_day = int_list(value, &(1..=366), true),
                KW_RRULE_BYWEEKNO => rule.by_week_no = int_list(value, &(1..=53), true),
                KW_RRULE_BYMONTH => rule.by_month = int_list(value, &(1..=12), false),
                KW_RRULE_BYSETPOS => rule.by_set_pos = int_list(value, &(1..=366), true),
                KW_RRULE_WKST => {
                    if let Ok(day) = value.parse() {
                        rule.wkst = day;
                    }
                }
                _ => {}
            }
        }

        rule.freq = freq.ok_or(ParseError::MissingFrequency)?;
        rule.bound = match (until, count) {
            (Some(until), _) => RecurrenceBound::Until(until),
            (None, Some(count)) => RecurrenceBound::Count(count),
            (None, None) => RecurrenceBound::Forever,
        };
        rule.prune();
        Ok(rule)
    }

    /// The COUNT bound, if any.
    #[must_use]
    pub fn count(&self) -> Option<u32> {
        match self.bound {
            RecurrenceBound::Count(n) => Some(n),
            _ => None,
        }
    }

    /// The UNTIL bound, if any.
    #[must_use]
    pub fn until(&self) -> Option<&RuleUntil> {
        match &self.bound {
            RecurrenceBound::Until(until) => Some(until),
            _ => None,
        }
    }

    /// Whether any BY part other than BYSETPOS is present.
    #[must_use]
    pub fn has_by_parts(&self) -> bool {
        !(self.by_second.is_empty()
            && self.by_minute.is_empty()
            && self.by_hour.is_empty()
            && self.by_day.is_empty()
            && self.by_month_day.is_empty()
            && self.by_year_day.is_empty()
            && self.by_week_no.is_empty()
            && self.by_month.is_empty())
    }

    /// Whether any BY part lists more than one value.
    #[must_use]
    pub fn is_multi_valued(&self) -> bool {
        [
            self.by_second.len(),
            self.by_minute.len(),
            self.by_hour.len(),
            self.by_day.len(),
            self.by_month_day.len(),
            self.by_year_day.len(),
            self.by_week_no.len(),
            self.by_month.len(),
            self.by_set_pos.len(),
        ]
        .into_iter()
        .any(|n| n > 1)
    }

    /// Whether WKST changes the meaning of this rule.
    #[must_use]
    pub fn uses_wkst(&self) -> bool {
        match self.freq {
            RecurrenceFrequency::Weekly => true,
            RecurrenceFrequency::Yearly => {
                !self.by_week_no.is_empty() || !self.by_day.is_empty()
            }
            _ => false,
        }
    }

    /// Drop the parts that do not apply to the frequency.
    fn prune(&mut self) {
        use RecurrenceFrequency::{Daily, Monthly, Weekly, Yearly};

        if self.freq != Yearly {
            self.by_week_no.clear();
        }
        if matches!(self.freq, Daily | Weekly | Monthly) {
            self.by_year_day.clear();
        }
        if self.freq == Weekly {
            self.by_month_day.clear();
        }

        let ordinals_allowed =
            matches!(self.freq, Monthly | Yearly) && self.by_week_no.is_empty();
        if !ordinals_allowed {
            for day in &mut self.by_day {
                day.occurrence = None;
            }
        }

        // negative values sort after every positive value
        let from_end_last = |v: &i8| (*v < 0, *v);
        self.by_month_day.sort_by_key(from_end_last);
        self.by_month_day.dedup();
        self.by_week_no.sort_by_key(from_end_last);
        self.by_week_no.dedup();

        if !self.has_by_parts() {
            self.by_set_pos.clear();
        }
        if !self.uses_wkst() {
            self.wkst = WeekDay::Monday;
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KW_RRULE_FREQ}={}", self.freq)?;
        if self.interval > 1 {
            write!(f, ";{KW_RRULE_INTERVAL}={}", self.interval)?;
        }
        match &self.bound {
            RecurrenceBound::Until(until) => write!(f, ";{KW_RRULE_UNTIL}={until}")?,
            RecurrenceBound::Count(n) => write!(f, ";{KW_RRULE_COUNT}={n}")?,
            RecurrenceBound::Forever => {}
        }
        write_list(f, KW_RRULE_BYMONTH, &self.by_month)?;
        write_list(f, KW_RRULE_BYWEEKNO, &self.by_week_no)?;
        write_list(f, KW_RRULE_BYYEARDAY, &self.by_year_day)?;
        write_list(f, KW_RRULE_BYMONTHDAY, &self.by_month_day)?;
        write_list(f, KW_RRULE_BYDAY, &self.by_day)?;
        write_list(f, KW_RRULE_BYHOUR, &self.by_hour)?;
        write_list(f, KW_RRULE_BYMINUTE, &self.by_minute)?;
        write_list(f, KW_RRULE_BYSECOND, &self.by_second)?;
        write_list(f, KW_RRULE_BYSETPOS, &self.by_set_pos)?;
        if self.uses_wkst() && self.wkst != WeekDay::Monday {
            write!(f, ";{KW_RRULE_WKST}={}", self.wkst)?;
        }
        Ok(())
    }
}

fn write_list<T: Display>(f: &mut fmt::Formatter<'_>, key: &str, values: &[T]) -> fmt::Result {
    if values.is_empty() {
        return Ok(());
    }

    write!(f, ";{key}=")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{v}")?;
    }
    Ok(())
}

/// How a recurrence ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecurrenceBound {
    /// Recurs without end
    #[default]
    Forever,
    /// Recurs until the given instant, inclusive
    Until(RuleUntil),
    /// Recurs the given number of times
    Count(u32),
}

/// The UNTIL bound of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleUntil {
    /// UTC wall-clock time for absolute bounds, the written value otherwise.
    /// All-day bounds are at midnight.
    pub datetime: DateTime,
    /// How `datetime` is to be read
    pub kind: DateTimeKind,
}

impl RuleUntil {
    /// An UNTIL bound of the given kind. All-day bounds drop the time.
    #[must_use]
    pub fn new(datetime: DateTime, kind: DateTimeKind) -> Self {
        let datetime = match kind {
            DateTimeKind::AllDay => datetime.date().to_datetime(Time::midnight()),
            DateTimeKind::Absolute | DateTimeKind::Floating => datetime,
        };
        Self { datetime, kind }
    }
}

impl Display for RuleUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = match self.kind {
            DateTimeKind::Absolute => "%Y%m%dT%H%M%SZ",
            DateTimeKind::Floating => "%Y%m%dT%H%M%S",
            DateTimeKind::AllDay => "%Y%m%d",
        };
        write!(f, "{}", self.datetime.strftime(format))
    }
}

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumString)]
#[strum(ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum RecurrenceFrequency {
    #[strum(serialize = "SECONDLY")]
    Secondly,
    #[strum(serialize = "MINUTELY")]
    Minutely,
    #[strum(serialize = "HOURLY")]
    Hourly,
    #[strum(serialize = "DAILY")]
    Daily,
    #[strum(serialize = "WEEKLY")]
    Weekly,
    #[strum(serialize = "MONTHLY")]
    Monthly,
    #[strum(serialize = "YEARLY")]
    Yearly,
}

impl Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceFrequency::Secondly => write!(f, "{KW_RRULE_FREQ_SECONDLY}"),
            RecurrenceFrequency::Minutely => write!(f, "{KW_RRULE_FREQ_MINUTELY}"),
            RecurrenceFrequency::Hourly => write!(f, "{KW_RRULE_FREQ_HOURLY}"),
            RecurrenceFrequency::Daily => write!(f, "{KW_RRULE_FREQ_DAILY}"),
            RecurrenceFrequency::Weekly => write!(f, "{KW_RRULE_FREQ_WEEKLY}"),
            RecurrenceFrequency::Monthly => write!(f, "{KW_RRULE_FREQ_MONTHLY}"),
            RecurrenceFrequency::Yearly => write!(f, "{KW_RRULE_FREQ_YEARLY}"),
        }
    }
}

/// Day of week with optional occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekDayNum {
    /// Day of the week
    pub day: WeekDay,
    /// Occurrence in the month or year, -53 to -1 and 1 to 53
    pub occurrence: Option<i8>,
}

impl WeekDayNum {
    /// Parse one BYDAY item, e.g. `MO`, `-1FR` or `+2TU`. Case-insensitive.
    fn parse_item(src: &str) -> Option<Self> {
        let src = src.trim().to_ascii_uppercase();
        let (ordinal, day) = run_parser(weekdaynum(), &src).ok()?;
        let occurrence = match ordinal {
            None => None,
            Some((positive, n)) => {
                let n = i8::try_from(n).ok().filter(|n| (1..=53).contains(n))?;
                Some(if positive { n } else { -n })
            }
        };
        Some(Self { day, occurrence })
    }
}

impl Display for WeekDayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.occurrence {
            write!(f, "{n}")?;
        }
        write!(f, "{}", self.day)
    }
}

/// Day of the week
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::EnumString)]
#[strum(ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum WeekDay {
    #[strum(serialize = "SU")]
    Sunday,
    #[default]
    #[strum(serialize = "MO")]
    Monday,
    #[strum(serialize = "TU")]
    Tuesday,
    #[strum(serialize = "WE")]
    Wednesday,
    #[strum(serialize = "TH")]
    Thursday,
    #[strum(serialize = "FR")]
    Friday,
    #[strum(serialize = "SA")]
    Saturday,
}

impl Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekDay::Sunday => write!(f, "{KW_DAY_SU}"),
            WeekDay::Monday => write!(f, "{KW_DAY_MO}"),
            WeekDay::Tuesday => write!(f, "{KW_DAY_TU}"),
            WeekDay::Wednesday => write!(f, "{KW_DAY_WE}"),
            WeekDay::Thursday => write!(f, "{KW_DAY_TH}"),
            WeekDay::Friday => write!(f, "{KW_DAY_FR}"),
            WeekDay::Saturday => write!(f, "{KW_DAY_SA}"),
        }
    }
}

impl From<WeekDay> for Weekday {
    fn from(day: WeekDay) -> Self {
        match day {
            WeekDay::Sunday => Weekday::Sunday,
            WeekDay::Monday => Weekday::Monday,
            WeekDay::Tuesday => Weekday::Tuesday,
            WeekDay::Wednesday => Weekday::Wednesday,
            WeekDay::Thursday => Weekday::Thursday,
            WeekDay::Friday => Weekday::Friday,
            WeekDay::Saturday => Weekday::Saturday,
        }
    }
}

impl From<Weekday> for WeekDay {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Sunday => WeekDay::Sunday,
            Weekday::Monday => WeekDay::Monday,
            Weekday::Tuesday => WeekDay::Tuesday,
            Weekday::Wednesday => WeekDay::Wednesday,
            Weekday::Thursday => WeekDay::Thursday,
            Weekday::Friday => WeekDay::Friday,
            Weekday::Saturday => WeekDay::Saturday,
        }
    }
}

/// Strip a leading rule name such as `RRULE:` or `EXRULE:`.
fn strip_rule_name(src: &str) -> &str {
    match src.split_once(':') {
        Some((name, rest)) if !name.contains('=') => rest,
        _ => src,
    }
}

fn positive_int(src: &str) -> Option<u32> {
    lexical::parse::<u32, _>(src.strip_prefix('+').unwrap_or(src))
        .ok()
        .filter(|n| *n > 0)
}

/// Parse a comma list, keeping the items in `range`. With `signed`, the
/// negated range is accepted too.
fn int_list<T>(src: &str, range: &RangeInclusive<i16>, signed: bool) -> Vec<T>
where
    T: TryFrom<i16>,
{
    src.split(',')
        .filter_map(|item| {
            let item = item.trim();
            let v = lexical::parse::<i16, _>(item.strip_prefix('+').unwrap_or(item)).ok()?;
            let in_range = range.contains(&v) || (signed && v < 0 && range.contains(&-v));
            in_range.then_some(v)
        })
        .filter_map(|v| T::try_from(v).ok())
        .collect()
}

fn parse_until(src: &str) -> Option<RuleUntil> {
    let instant = ValueInstant::parse(src).ok()?;
    let kind = instant.kind();
    let datetime = instant.to_utc().ok()?;
    Some(RuleUntil::new(datetime, kind))
}

/// ```txt
/// weekdaynum  = [[plus / minus] ordwk] weekday
/// plus        = "+"
/// minus       = "-"
/// ```
fn weekdaynum<'src, I, E>() -> impl Parser<'src, I, (Option<(bool, u32)>, WeekDay), E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    is_positive().then(uint()).or_not().then(weekday())
}

/// ```txt
/// weekday     = "SU" / "MO" / "TU" / "WE" / "TH" / "FR" / "SA"
/// ```
fn weekday<'src, I, E>() -> impl Parser<'src, I, WeekDay, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        just(KW_DAY_SU).to(WeekDay::Sunday),
        just(KW_DAY_MO).to(WeekDay::Monday),
        just(KW_DAY_TU).to(WeekDay::Tuesday),
        just(KW_DAY_WE).to(WeekDay::Wednesday),
        just(KW_DAY_TH).to(WeekDay::Thursday),
        just(KW_DAY_FR).to(WeekDay::Friday),
        just(KW_DAY_SA).to(WeekDay::Saturday),
    ))
}
