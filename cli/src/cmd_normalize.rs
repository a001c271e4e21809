// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use recurcal_core::RecurrenceRule;

use crate::arg::CommonArgs;

#[derive(Debug, Clone)]
pub struct CmdNormalize {
    pub rule: String,
}

impl CmdNormalize {
    pub const NAME: &str = "normalize";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Print the canonical form of a recurrence rule")
            .arg(CommonArgs::rule())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            rule: CommonArgs::get_rule(matches),
        }
    }

    /// The canonical serialization of the rule.
    pub fn output(&self) -> Result<String, Box<dyn Error>> {
        Ok(RecurrenceRule::parse(&self.rule)?.to_string())
    }

    pub fn run(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "normalizing rule...");
        println!("{}", self.output()?);
        Ok(())
    }
}
