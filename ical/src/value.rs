// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Value types used by recurring components, as defined in RFC 5545
//! Section 3.3.

mod datetime;
mod duration;
mod miscellaneous;
mod rrule;

pub use datetime::{DateTimeKind, ValueDateListEntry, ValueInstant, parse_date_list};
pub use duration::ValueDuration;
pub use rrule::{
    RecurrenceBound, RecurrenceFrequency, RecurrenceRule, RuleUntil, WeekDay, WeekDayNum,
};
