// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Zoned};
use recurcal_ical::{DateTimeKind, ParseError, ValueInstant};

use crate::Error;
use crate::datetime::util::{
    STABLE_FORMAT_DATEONLY, STABLE_FORMAT_FLOATING, STABLE_FORMAT_UTC, end_of_day, start_of_day,
};

/// A date and time that may be in different formats, such as date only,
/// floating time, or a time anchored to a time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LooseDateTime {
    /// Date only without time.
    DateOnly(Date),

    /// Floating date and time without timezone.
    Floating(DateTime),

    /// Date and time in a time zone, one universal instant.
    Zoned(Zoned),
}

impl LooseDateTime {
    /// Returns the date part
    #[must_use]
    pub fn date(&self) -> Date {
        match self {
            LooseDateTime::DateOnly(d) => *d,
            LooseDateTime::Floating(dt) => dt.date(),
            LooseDateTime::Zoned(zoned) => zoned.date(),
        }
    }

    /// Returns the time part, if available.
    #[must_use]
    pub fn time(&self) -> Option<Time> {
        match self {
            LooseDateTime::DateOnly(_) => None,
            LooseDateTime::Floating(dt) => Some(dt.time()),
            LooseDateTime::Zoned(zoned) => Some(zoned.time()),
        }
    }

    /// How this value relates to the time line.
    #[must_use]
    pub fn kind(&self) -> DateTimeKind {
        match self {
            LooseDateTime::DateOnly(_) => DateTimeKind::AllDay,
            LooseDateTime::Floating(_) => DateTimeKind::Floating,
            LooseDateTime::Zoned(_) => DateTimeKind::Absolute,
        }
    }

    /// Converts to a datetime with default start time (00:00:00) if time is missing.
    #[must_use]
    pub fn with_start_of_day(&self) -> DateTime {
        self.date()
            .to_datetime(self.time().unwrap_or_else(start_of_day))
    }

    /// Converts to a datetime with default end time (23:59:59.999999999) if time is missing.
    #[must_use]
    pub fn with_end_of_day(&self) -> DateTime {
        self.date().to_datetime(self.time().unwrap_or_else(end_of_day))
    }

    /// Shift by a duration. Dates move by the days the duration spans from
    /// midnight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when the result leaves the supported
    /// calendar range.
    pub fn checked_add(&self, duration: SignedDuration) -> Result<Self, Error> {
        Ok(match self {
            LooseDateTime::DateOnly(d) => {
                let dt = d.to_datetime(start_of_day()).checked_add(duration)?;
                LooseDateTime::DateOnly(dt.date())
            }
            LooseDateTime::Floating(dt) => LooseDateTime::Floating(dt.checked_add(duration)?),
            LooseDateTime::Zoned(zoned) => LooseDateTime::Zoned(zoned.checked_add(duration)?),
        })
    }

    /// Converts to the stable string form used for recurrence ids and date
    /// lists: `YYYYMMDD`, `YYYYMMDDTHHMMSS` or `YYYYMMDDTHHMMSSZ` in UTC.
    #[must_use]
    pub fn format_stable(&self) -> String {
        match self {
            LooseDateTime::DateOnly(d) => d.strftime(STABLE_FORMAT_DATEONLY).to_string(),
            LooseDateTime::Floating(dt) => dt.strftime(STABLE_FORMAT_FLOATING).to_string(),
            LooseDateTime::Zoned(zoned) => zoned
                .with_time_zone(TimeZone::UTC)
                .strftime(STABLE_FORMAT_UTC)
                .to_string(),
        }
    }

    /// Parses the stable string form, also accepting a `TZID=<zone>:`
    /// prefix.
    #[must_use]
    pub fn parse_stable(s: &str) -> Option<Self> {
        let value = ValueInstant::parse(s).ok()?;
        Self::try_from(&value).ok()
    }
}

impl TryFrom<&ValueInstant> for LooseDateTime {
    type Error = ParseError;

    fn try_from(value: &ValueInstant) -> Result<Self, Self::Error> {
        let zoned = |dt: DateTime, tz: TimeZone| {
            dt.to_zoned(tz)
                .map(LooseDateTime::Zoned)
                .map_err(|e| ParseError::InvalidDate(e.to_string()))
        };

        match value {
            ValueInstant::Date(d) => Ok(LooseDateTime::DateOnly(*d)),
            ValueInstant::Floating(dt) => Ok(LooseDateTime::Floating(*dt)),
            ValueInstant::Utc(dt) => zoned(*dt, TimeZone::UTC),
            ValueInstant::Zoned { tzid, datetime } => {
                let tz = TimeZone::get(tzid)
                    .map_err(|_| ParseError::UnknownTimeZone(tzid.clone()))?;
                zoned(*datetime, tz)
            }
        }
    }
}

impl FromStr for LooseDateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = ValueInstant::parse(s)?;
        Ok(Self::try_from(&value)?)
    }
}

impl fmt::Display for LooseDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_stable())
    }
}

impl From<Date> for LooseDateTime {
    fn from(d: Date) -> Self {
        LooseDateTime::DateOnly(d)
    }
}

impl From<DateTime> for LooseDateTime {
    fn from(dt: DateTime) -> Self {
        LooseDateTime::Floating(dt)
    }
}

impl From<Zoned> for LooseDateTime {
    fn from(zoned: Zoned) -> Self {
        LooseDateTime::Zoned(zoned)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, datetime, time};

    use super::*;

    #[test]
    fn test_date_and_time_methods() {
        let d = date(2024, 7, 18);
        let t = time(12, 30, 45, 0);
        let dt = d.to_datetime(t);
        let zoned = dt.to_zoned(TimeZone::UTC).unwrap();

        let d1 = LooseDateTime::DateOnly(d);
        let d2 = LooseDateTime::Floating(dt);
        let d3 = LooseDateTime::Zoned(zoned);

        assert_eq!(d1.date(), d);
        assert_eq!(d2.date(), d);
        assert_eq!(d3.date(), d);

        assert_eq!(d1.time(), None);
        assert_eq!(d2.time(), Some(t));
        assert_eq!(d3.time(), Some(t));

        assert_eq!(d1.kind(), DateTimeKind::AllDay);
        assert_eq!(d2.kind(), DateTimeKind::Floating);
        assert_eq!(d3.kind(), DateTimeKind::Absolute);
    }

    #[test]
    fn test_with_start_and_end_of_day() {
        let d1 = LooseDateTime::DateOnly(date(2024, 7, 18));
        assert_eq!(d1.with_start_of_day(), datetime(2024, 7, 18, 0, 0, 0, 0));
        assert_eq!(
            d1.with_end_of_day(),
            datetime(2024, 7, 18, 23, 59, 59, 999_999_999)
        );

        let d2 = LooseDateTime::Floating(datetime(2024, 7, 18, 12, 30, 0, 0));
        assert_eq!(d2.with_start_of_day(), datetime(2024, 7, 18, 12, 30, 0, 0));
        assert_eq!(d2.with_end_of_day(), datetime(2024, 7, 18, 12, 30, 0, 0));
    }

    #[test]
    fn test_format_stable() {
        let d1 = LooseDateTime::DateOnly(date(2024, 7, 18));
        assert_eq!(d1.format_stable(), "20240718");

        let d2 = LooseDateTime::Floating(datetime(2024, 7, 18, 12, 30, 0, 0));
        assert_eq!(d2.format_stable(), "20240718T123000");

        let tz = TimeZone::get("Asia/Shanghai").unwrap();
        let d3 = LooseDateTime::Zoned(datetime(2024, 7, 18, 12, 30, 0, 0).to_zoned(tz).unwrap());
        assert_eq!(d3.format_stable(), "20240718T043000Z");
    }

    #[test]
    fn test_parse_stable() {
        for s in ["20240718", "20240718T123000", "20240718T043000Z"] {
            let parsed = LooseDateTime::parse_stable(s).unwrap();
            assert_eq!(parsed.format_stable(), s);
        }

        let zoned = LooseDateTime::parse_stable("TZID=Asia/Shanghai:20240718T123000").unwrap();
        assert_eq!(zoned.kind(), DateTimeKind::Absolute);
        assert_eq!(zoned.format_stable(), "20240718T043000Z");

        assert_eq!(LooseDateTime::parse_stable("2024-07-18"), None);
        assert_eq!(LooseDateTime::parse_stable("TZID=Nowhere:20240718T123000"), None);
    }

    #[test]
    fn test_from_str_reports_errors() {
        assert!(matches!(
            "20240230".parse::<LooseDateTime>(),
            Err(Error::Parse(ParseError::InvalidDate(_)))
        ));
        assert!(matches!(
            "TZID=Nowhere:20240718T123000".parse::<LooseDateTime>(),
            Err(Error::Parse(ParseError::UnknownTimeZone(_)))
        ));
    }

    #[test]
    fn test_checked_add() {
        let d1 = LooseDateTime::DateOnly(date(2024, 2, 28));
        assert_eq!(
            d1.checked_add(SignedDuration::from_hours(24)).unwrap(),
            LooseDateTime::DateOnly(date(2024, 2, 29))
        );

        let d2 = LooseDateTime::Floating(datetime(2024, 2, 28, 23, 0, 0, 0));
        assert_eq!(
            d2.checked_add(SignedDuration::from_hours(2)).unwrap(),
            LooseDateTime::Floating(datetime(2024, 2, 29, 1, 0, 0, 0))
        );
    }
}
