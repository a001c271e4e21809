// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Expand recurring calendar events into their occurrences, and resolve
//! each occurrence against the overrides stored for it.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_debug_implementations,
    unsafe_code,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::pedantic
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod config;
mod datetime;
mod error;
mod event;
mod occurrence;
mod recurrence;

pub use crate::config::{APP_NAME, Config, DefaultCounts};
pub use crate::datetime::LooseDateTime;
pub use crate::error::Error;
pub use crate::event::{RecurringEvent, RecurringEventDraft};
pub use crate::occurrence::{Occurrence, OccurrenceOverride};
pub use crate::recurrence::{ExplicitDate, RecurrenceIterator, ViewEnd, ViewWindow};
pub use recurcal_ical::{
    DateTimeKind, ParseError, RecurrenceBound, RecurrenceFrequency, RecurrenceRule, RuleUntil,
    WeekDay, WeekDayNum,
};
