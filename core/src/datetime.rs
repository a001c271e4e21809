// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod loose;
pub(crate) mod util;

pub use loose::LooseDateTime;
