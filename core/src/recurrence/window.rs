// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::{SignedDuration, Zoned};

use crate::LooseDateTime;

/// The range of time a recurrence is expanded over.
///
/// Instants outside the window are never returned. Without a start the
/// window begins at the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewWindow {
    /// First instant of the window, inclusive. A date starts at midnight.
    pub start: Option<LooseDateTime>,

    /// Where the window ends.
    pub end: ViewEnd,
}

/// The end of a [`ViewWindow`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewEnd {
    /// Bounded by the rule itself, or by the default count of its frequency.
    #[default]
    Open,

    /// Last instant of the window, inclusive. A date ends at the end of the
    /// day.
    At(LooseDateTime),

    /// A fixed length after the start of the window.
    After(SignedDuration),
}

impl ViewWindow {
    /// A window from `start` to `end`, both inclusive.
    #[must_use]
    pub fn between(start: impl Into<LooseDateTime>, end: impl Into<LooseDateTime>) -> Self {
        Self {
            start: Some(start.into()),
            end: ViewEnd::At(end.into()),
        }
    }

    /// An open-ended window beginning at `start`.
    #[must_use]
    pub fn starting(start: impl Into<LooseDateTime>) -> Self {
        Self {
            start: Some(start.into()),
            end: ViewEnd::Open,
        }
    }

    /// The calendar month containing `now`, the default window of a calendar
    /// view.
    #[must_use]
    pub fn month_of(now: &Zoned) -> Self {
        let today = now.date();
        Self::between(today.first_of_month(), today.last_of_month())
    }
}
