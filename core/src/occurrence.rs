// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::SignedDuration;

use crate::{Error, LooseDateTime, RecurringEvent};

/// Changes to one occurrence of a recurring event, optionally carried over
/// to every later occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceOverride {
    /// Key of the first occurrence affected.
    pub recurrence_id: String,

    /// Also apply to every later occurrence without an override of its own.
    pub affects_future: bool,

    /// Shift applied to the start.
    pub offset: Option<SignedDuration>,

    /// Replacement duration.
    pub duration: Option<SignedDuration>,

    /// Replacement location.
    pub location: Option<String>,

    /// Replacement title.
    pub title: Option<String>,
}

impl OccurrenceOverride {
    /// An override of the occurrence with `recurrence_id` that changes
    /// nothing yet.
    #[must_use]
    pub fn new(recurrence_id: impl Into<String>) -> Self {
        Self {
            recurrence_id: recurrence_id.into(),
            ..Self::default()
        }
    }

    /// Whether dropping this override leaves every occurrence it covers
    /// resolving the same. `previous` is the nearest earlier override that
    /// affects future occurrences, which takes over once this one is gone.
    pub(crate) fn changes_nothing(
        &self,
        previous: Option<&OccurrenceOverride>,
        base: &Inherited<'_>,
    ) -> bool {
        let duration = |o: Option<&Self>| o.and_then(|o| o.duration);

        // later occurrences may inherit other durations than this one
        let same_duration = if self.affects_future && base.duration_varies {
            duration(Some(self)) == duration(previous)
        } else {
            duration(Some(self)).unwrap_or(base.duration)
                == duration(previous).unwrap_or(base.duration)
        };

        same_duration && shown(Some(self), base) == shown(previous, base)
    }
}

/// Offset, title and location shown under `o`.
fn shown<'s>(
    o: Option<&'s OccurrenceOverride>,
    base: &Inherited<'s>,
) -> (SignedDuration, &'s str, Option<&'s str>) {
    (
        o.and_then(|o| o.offset).unwrap_or(SignedDuration::ZERO),
        o.and_then(|o| o.title.as_deref()).unwrap_or(base.title),
        o.and_then(|o| o.location.as_deref()).or(base.location),
    )
}

/// What an occurrence resolves to without any override.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Inherited<'a> {
    /// Duration of the occurrence the override is keyed on.
    pub duration: SignedDuration,

    /// Whether explicit dates carry durations of their own.
    pub duration_varies: bool,

    pub title: &'a str,
    pub location: Option<&'a str>,
}

/// One occurrence of a [`RecurringEvent`], with its override applied.
///
/// Occurrences are views built on demand and borrow their event.
#[derive(Debug, Clone)]
pub struct Occurrence<'a> {
    pub(crate) event: &'a RecurringEvent,
    pub(crate) recurrence_id: String,
    pub(crate) unadjusted_start: LooseDateTime,
    pub(crate) start: LooseDateTime,
    pub(crate) duration: SignedDuration,
    pub(crate) applied: Option<&'a OccurrenceOverride>,
}

impl<'a> Occurrence<'a> {
    /// The event this occurrence belongs to.
    #[must_use]
    pub fn event(&self) -> &'a RecurringEvent {
        self.event
    }

    /// Key identifying the occurrence.
    #[must_use]
    pub fn recurrence_id(&self) -> &str {
        &self.recurrence_id
    }

    /// Start given by the recurrence, before any offset.
    #[must_use]
    pub fn unadjusted_start(&self) -> &LooseDateTime {
        &self.unadjusted_start
    }

    /// Start after the override's offset.
    #[must_use]
    pub fn start(&self) -> &LooseDateTime {
        &self.start
    }

    /// Length of the occurrence.
    #[must_use]
    pub fn duration(&self) -> SignedDuration {
        self.duration
    }

    /// End of the occurrence, its start plus its duration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] when the end is beyond the calendar.
    pub fn end(&self) -> Result<LooseDateTime, Error> {
        self.start.checked_add(self.duration)
    }

    #[must_use]
    pub fn title(&self) -> &'a str {
        self.applied
            .and_then(|o| o.title.as_deref())
            .unwrap_or_else(|| self.event.title())
    }

    #[must_use]
    pub fn location(&self) -> Option<&'a str> {
        self.applied
            .and_then(|o| o.location.as_deref())
            .or_else(|| self.event.location())
    }

    /// Whether an override applies to this occurrence.
    #[must_use]
    pub fn is_overridden(&self) -> bool {
        self.applied.is_some()
    }

    /// The override that applies, either its own or a carried one.
    #[must_use]
    pub fn applied_override(&self) -> Option<&'a OccurrenceOverride> {
        self.applied
    }
}
