// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use recurcal_ical::ParseError;

/// Errors raised by the recurrence engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The recurrence rule or a date value could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The requested UNTIL lies before the first occurrence.
    #[error("recurrence cannot end at {until}, before its first occurrence {start}")]
    InvalidBound {
        /// The rejected UNTIL value
        until: String,
        /// The first occurrence of the event
        start: String,
    },

    /// There is no occurrence at the cursor or for the requested key.
    #[error("occurrence not found")]
    NotFound,

    /// A date or duration cannot be placed on the calendar.
    #[error("cannot construct recurrence: {0}")]
    Construction(String),
}

impl From<jiff::Error> for Error {
    fn from(e: jiff::Error) -> Self {
        Error::Construction(e.to_string())
    }
}
