// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface of recurcal.

mod arg;
mod cli;
mod cmd_end;
mod cmd_expand;
mod cmd_normalize;
mod config;

pub use crate::cli::{Cli, Commands, run};
pub use crate::cmd_end::CmdEnd;
pub use crate::cmd_expand::CmdExpand;
pub use crate::cmd_normalize::CmdNormalize;
pub use crate::config::parse_config;
