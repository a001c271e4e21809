// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Date, date-time and date-list values (RFC 5545 Section 3.3.4, 3.3.5).

use std::fmt::{self, Display};

use chumsky::Parser;
use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;

use crate::keyword::KW_TZID;
use crate::parser::{ParseError, run_parser};
use crate::value::duration::{ValueDuration, value_duration};
use crate::value::miscellaneous::{four_digits, two_digits, tzid_prefix};

/// How a date-time value relates to the time line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeKind {
    /// Anchored to an absolute instant, written in UTC or with a `TZID`.
    Absolute,
    /// A wall-clock date-time without a time zone.
    Floating,
    /// A calendar date without a time of day.
    AllDay,
}

/// A single DATE or DATE-TIME value, optionally carrying its `TZID`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueInstant {
    /// `19970714`
    Date(Date),

    /// `19970714T173000`
    Floating(DateTime),

    /// `19970714T173000Z`
    Utc(DateTime),

    /// `TZID=America/New_York:19970714T133000`
    Zoned {
        /// Time zone identifier
        tzid: String,
        /// Wall-clock time in that zone
        datetime: DateTime,
    },
}

impl ValueInstant {
    /// Parse a value such as `20240101`, `20240101T090000Z` or
    /// `TZID=Europe/Berlin:20240101T090000`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] when the text does not look like a
    /// date or date-time and [`ParseError::InvalidDate`] when the fields are
    /// out of range.
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        let raw = run_parser(value_instant(), src.trim()).map_err(ParseError::Syntax)?;
        raw.build(None)
    }

    /// The kind of date-time this value is.
    #[must_use]
    pub fn kind(&self) -> DateTimeKind {
        match self {
            Self::Date(_) => DateTimeKind::AllDay,
            Self::Floating(_) => DateTimeKind::Floating,
            Self::Utc(_) | Self::Zoned { .. } => DateTimeKind::Absolute,
        }
    }

    /// The calendar date of the value, as written.
    #[must_use]
    pub fn date(&self) -> Date {
        match self {
            Self::Date(date) => *date,
            Self::Floating(dt) | Self::Utc(dt) | Self::Zoned { datetime: dt, .. } => dt.date(),
        }
    }

    /// The wall-clock date-time of the value, as written. Dates map to
    /// midnight.
    #[must_use]
    pub fn datetime(&self) -> DateTime {
        match self {
            Self::Date(date) => date.to_datetime(Time::midnight()),
            Self::Floating(dt) | Self::Utc(dt) | Self::Zoned { datetime: dt, .. } => *dt,
        }
    }

    /// Convert an absolute value to its UTC wall-clock date-time.
    ///
    /// Floating values and dates are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownTimeZone`] when the `TZID` is not in the
    /// time zone database.
    pub fn to_utc(&self) -> Result<DateTime, ParseError> {
        match self {
            Self::Zoned { tzid, datetime } => {
                let tz = TimeZone::get(tzid)
                    .map_err(|_| ParseError::UnknownTimeZone(tzid.clone()))?;
                let zoned = datetime
                    .to_zoned(tz)
                    .map_err(|e| ParseError::InvalidDate(e.to_string()))?;
                Ok(zoned.with_time_zone(TimeZone::UTC).datetime())
            }
            _ => Ok(self.datetime()),
        }
    }
}

impl Display for ValueInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.strftime("%Y%m%d")),
            Self::Floating(dt) => write!(f, "{}", dt.strftime("%Y%m%dT%H%M%S")),
            Self::Utc(dt) => write!(f, "{}", dt.strftime("%Y%m%dT%H%M%SZ")),
            Self::Zoned { tzid, datetime } => write!(
                f,
                "{KW_TZID}={tzid}:{}",
                datetime.strftime("%Y%m%dT%H%M%S")
            ),
        }
    }
}

/// An entry of an RDATE or EXDATE list, with an optional duration suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDateListEntry {
    /// The date or date-time
    pub instant: ValueInstant,
    /// Duration written after a `/`, if any
    pub duration: Option<ValueDuration>,
}

/// Parse a comma separated date list, e.g.
/// `20240101T090000Z,20240105T090000Z/PT2H`.
///
/// A leading `TZID=...:` applies to every entry. An empty text yields an
/// empty list.
///
/// # Errors
///
/// Returns an error when any entry is malformed.
pub fn parse_date_list(src: &str) -> Result<Vec<ValueDateListEntry>, ParseError> {
    let src = src.trim();
    if src.is_empty() {
        return Ok(Vec::new());
    }

    let (tzid, entries) = run_parser(value_date_list(), src).map_err(ParseError::Syntax)?;
    entries
        .into_iter()
        .map(|(raw, duration)| {
            Ok(ValueDateListEntry {
                instant: raw.build(tzid.as_deref())?,
                duration,
            })
        })
        .collect()
}

/// Date and time fields as written, not yet range checked.
#[derive(Debug, Clone)]
pub(crate) struct RawInstant {
    tzid: Option<String>,
    date: (i16, i8, i8),
    time: Option<((i8, i8, i8), bool)>,
}

impl RawInstant {
    fn build(self, default_tzid: Option<&str>) -> Result<ValueInstant, ParseError> {
        let (year, month, day) = self.date;
        let date = Date::new(year, month, day).map_err(|e| ParseError::InvalidDate(e.to_string()))?;

        let Some(((hour, minute, second), utc)) = self.time else {
            return Ok(ValueInstant::Date(date));
        };

        // A leap second is folded into the preceding second.
        let time = Time::new(hour, minute, second.min(59), 0)
            .map_err(|e| ParseError::InvalidDate(e.to_string()))?;
        let datetime = date.to_datetime(time);

        let tzid = self.tzid.or_else(|| default_tzid.map(str::to_owned));
        match (utc, tzid) {
            (true, Some(tzid)) => Err(ParseError::Syntax(format!(
                "UTC date-time cannot carry {KW_TZID}={tzid}"
            ))),
            (true, None) => Ok(ValueInstant::Utc(datetime)),
            (false, Some(tzid)) => Ok(ValueInstant::Zoned { tzid, datetime }),
            (false, None) => Ok(ValueInstant::Floating(datetime)),
        }
    }
}

/// ```txt
/// date-value = date-fullyear date-month date-mday
/// ```
fn raw_date<'src, I, E>() -> impl Parser<'src, I, (i16, i8, i8), E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    four_digits()
        .then(two_digits())
        .then(two_digits())
        .map(|((y, m), d)| (y, m, d))
}

/// ```txt
/// time = time-hour time-minute time-second [time-utc]
/// ```
fn raw_time<'src, I, E>() -> impl Parser<'src, I, ((i8, i8, i8), bool), E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    two_digits()
        .then(two_digits())
        .then(two_digits())
        .then(just('Z').or_not())
        .map(|(((h, m), s), z)| ((h, m, s), z.is_some()))
}

fn raw_date_time<'src, I, E>() -> impl Parser<'src, I, RawInstant, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    raw_date()
        .then(just('T').ignore_then(raw_time()).or_not())
        .map(|(date, time)| RawInstant {
            tzid: None,
            date,
            time,
        })
}

fn value_instant<'src, I, E>() -> impl Parser<'src, I, RawInstant, E>
where
    I: chumsky::input::ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    tzid_prefix()
        .or_not()
        .then(raw_date_time())
        .map(|(tzid, raw)| RawInstant { tzid, ..raw })
}

type DateListEntry = (RawInstant, Option<ValueDuration>);

fn value_date_list<'src, I, E>() -> impl Parser<'src, I, (Option<String>, Vec<DateListEntry>), E>
where
    I: chumsky::input::ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    let entry = raw_date_time().then(just('/').ignore_then(value_duration()).or_not());
    tzid_prefix()
        .or_not()
        .then(entry.separated_by(just(',')).at_least(1).collect())
}
