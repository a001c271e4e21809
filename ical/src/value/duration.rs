// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Duration value type parser as defined in RFC 5545 Section 3.3.6.

use std::fmt::{self, Display};

use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use jiff::SignedDuration;

use crate::parser::{ParseError, run_parser};
use crate::value::miscellaneous::{is_positive, uint};

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;
const SECS_PER_WEEK: i64 = 7 * SECS_PER_DAY;

/// Duration Value defined in RFC 5545 Section 3.3.6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueDuration {
    /// Date and Time Duration
    DateTime {
        /// Whether the duration is positive
        positive: bool,
        /// Day Duration
        day: u32,
        /// Hour Duration
        hour: u32,
        /// Minute Duration
        minute: u32,
        /// Second Duration
        second: u32,
    },

    /// Week Duration
    Week {
        /// Whether the duration is positive
        positive: bool,
        /// Week Duration
        week: u32,
    },
}

impl ValueDuration {
    /// Parse a duration such as `PT1H30M` or `-P2W`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidDuration`] when the text is not a valid
    /// duration.
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        let src = src.trim();
        run_parser(value_duration(), src).map_err(|_| ParseError::InvalidDuration(src.to_owned()))
    }

    /// Exact length of the duration. Days count as 24 hours.
    #[must_use]
    pub fn to_signed_duration(self) -> SignedDuration {
        let (positive, secs) = match self {
            Self::DateTime {
                positive,
                day,
                hour,
                minute,
                second,
            } => (
                positive,
                i64::from(day) * SECS_PER_DAY
                    + i64::from(hour) * SECS_PER_HOUR
                    + i64::from(minute) * SECS_PER_MINUTE
                    + i64::from(second),
            ),
            Self::Week { positive, week } => (positive, i64::from(week) * SECS_PER_WEEK),
        };
        SignedDuration::from_secs(if positive { secs } else { -secs })
    }

    /// Express a duration in the shortest form, whole seconds only.
    #[must_use]
    pub fn from_signed_duration(duration: SignedDuration) -> Self {
        let positive = !duration.is_negative();
        let secs = duration.as_secs().unsigned_abs();
        let part = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);

        let week_secs = SECS_PER_WEEK.unsigned_abs();
        if secs > 0 && secs % week_secs == 0 {
            return Self::Week {
                positive,
                week: part(secs / week_secs),
            };
        }

        let day_secs = SECS_PER_DAY.unsigned_abs();
        let rest = secs % day_secs;
        Self::DateTime {
            positive,
            day: part(secs / day_secs),
            hour: part(rest / 3600),
            minute: part(rest % 3600 / 60),
            second: part(rest % 60),
        }
    }
}

impl Display for ValueDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Week { positive, week } => {
                let sign = if positive { "" } else { "-" };
                write!(f, "{sign}P{week}W")
            }
            Self::DateTime {
                positive,
                day,
                hour,
                minute,
                second,
            } => {
                let sign = if positive { "" } else { "-" };
                write!(f, "{sign}P")?;
                if day > 0 {
                    write!(f, "{day}D")?;
                }
                if hour > 0 || minute > 0 || second > 0 {
                    write!(f, "T")?;
                    if hour > 0 {
                        write!(f, "{hour}H")?;
                    }
                    if minute > 0 {
                        write!(f, "{minute}M")?;
                    }
                    if second > 0 {
                        write!(f, "{second}S")?;
                    }
                } else if day == 0 {
                    write!(f, "T0S")?;
                }
                Ok(())
            }
        }
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// dur-value  = (["+"] / "-") "P" (dur-date / dur-time / dur-week)
///
/// dur-date   = dur-day [dur-time]
/// dur-time   = "T" (dur-hour / dur-minute / dur-second)
/// dur-week   = 1*DIGIT "W"
/// dur-hour   = 1*DIGIT "H" [dur-minute]
/// dur-minute = 1*DIGIT "M" [dur-second]
/// dur-second = 1*DIGIT "S"
/// dur-day    = 1*DIGIT "D"
/// ```
pub fn value_duration<'src, I, E>() -> impl Parser<'src, I, ValueDuration, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    let week = designated('W').map(|week| (None, Some(week)));

    let date = designated('D')
        .then(dur_time().or_not())
        .map(|(day, time)| {
            let (hour, minute, second) = time.unwrap_or((0, 0, 0));
            (Some((day, hour, minute, second)), None)
        });

    let time = dur_time().map(|(hour, minute, second)| (Some((0, hour, minute, second)), None));

    is_positive()
        .then_ignore(just('P'))
        .then(choice((week, date, time)))
        .map(|(positive, parts)| match parts {
            (_, Some(week)) => ValueDuration::Week { positive, week },
            (Some((day, hour, minute, second)), None) => ValueDuration::DateTime {
                positive,
                day,
                hour,
                minute,
                second,
            },
            (None, None) => ValueDuration::DateTime {
                positive,
                day: 0,
                hour: 0,
                minute: 0,
                second: 0,
            },
        })
}

/// `1*DIGIT` followed by the given designator, case-sensitive.
fn designated<'src, I, E>(designator: char) -> impl Parser<'src, I, u32, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    uint().then_ignore(just(designator))
}

/// ```txt
/// dur-time   = "T" (dur-hour / dur-minute / dur-second)
/// ```
fn dur_time<'src, I, E>() -> impl Parser<'src, I, (u32, u32, u32), E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    let hour = designated('H')
        .then(designated('M').then(designated('S').or_not()).or_not())
        .map(|(h, ms)| match ms {
            Some((m, s)) => (h, m, s.unwrap_or(0)),
            None => (h, 0, 0),
        });

    let minute = designated('M')
        .then(designated('S').or_not())
        .map(|(m, s)| (0, m, s.unwrap_or(0)));

    let second = designated('S').map(|s| (0, 0, s));

    just('T').ignore_then(choice((hour, minute, second)))
}
