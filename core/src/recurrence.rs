// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod expand;
mod iterator;
mod period;
mod window;

pub(crate) use iterator::normalize_instant;
pub use iterator::{ExplicitDate, RecurrenceIterator};
pub use window::{ViewEnd, ViewWindow};
