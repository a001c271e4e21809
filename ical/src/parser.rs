// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::str::Chars;

use chumsky::error::Rich;
use chumsky::input::Stream;
use chumsky::prelude::*;

/// Error raised while parsing iCalendar values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The recurrence rule has no `FREQ` part.
    #[error("recurrence rule is missing the FREQ part")]
    MissingFrequency,

    /// The `FREQ` value is not one of the seven frequencies.
    #[error("unknown recurrence frequency: {0}")]
    InvalidFrequency(String),

    /// A date or date-time value is out of range.
    #[error("invalid date or date-time: {0}")]
    InvalidDate(String),

    /// A duration value is malformed.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// A `TZID` names a zone that is not in the time zone database.
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// The text does not follow the value grammar.
    #[error("syntax error: {0}")]
    Syntax(String),
}

/// Run a value parser over the whole of `src`.
///
/// ## Errors
///
/// Returns the rendered parser errors, joined by `; `.
pub(crate) fn run_parser<'src, T, P>(parser: P, src: &'src str) -> Result<T, String>
where
    P: Parser<'src, Stream<Chars<'src>>, T, extra::Err<Rich<'src, char>>>,
{
    parser
        .then_ignore(end())
        .parse(Stream::from_iter(src.chars()))
        .into_result()
        .map_err(|errs| {
            errs.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        })
}
