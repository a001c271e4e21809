// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse and represent the iCalendar values that drive recurrence:
//! recurrence rules, date and date-time instants, durations and
//! RDATE/EXDATE date lists.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::similar_names, clippy::single_match_else)]

pub mod keyword;
mod parser;
pub mod value;

pub use crate::parser::ParseError;
pub use crate::value::{
    DateTimeKind, RecurrenceBound, RecurrenceFrequency, RecurrenceRule, RuleUntil,
    ValueDateListEntry, ValueDuration, ValueInstant, WeekDay, WeekDayNum, parse_date_list,
};
