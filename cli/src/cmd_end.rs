// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use recurcal_core::{Config, LooseDateTime, RecurringEventDraft};

use crate::arg::CommonArgs;

#[derive(Debug, Clone)]
pub struct CmdEnd {
    pub rule: String,
    pub start: Option<LooseDateTime>,
}

impl CmdEnd {
    pub const NAME: &str = "end";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Print the last instant a recurrence rule can reach")
            .arg(CommonArgs::rule())
            .arg(CommonArgs::start())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            rule: CommonArgs::get_rule(matches),
            start: CommonArgs::get_start(matches),
        }
    }

    /// The recurrence end in its stable form.
    pub fn output(&self, config: Config) -> Result<String, Box<dyn Error>> {
        let start = self.start.clone().ok_or("missing --start")?;
        let mut draft = RecurringEventDraft::new(start);
        draft.rule = Some(self.rule.clone());
        let event = draft.build(config)?;
        Ok(event.recurrence_end()?.format_stable())
    }

    pub fn run(self, config: Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "computing recurrence end...");
        println!("{}", self.output(config)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end(rule: &str, start: &str) -> String {
        let cmd = CmdEnd {
            rule: rule.to_string(),
            start: Some(start.parse().unwrap()),
        };
        cmd.output(Config::default()).unwrap()
    }

    #[test]
    fn test_parse_end() {
        let cmd = Command::new("test").subcommand(CmdEnd::command());
        let matches = cmd
            .try_get_matches_from(["test", "end", "FREQ=DAILY", "-s", "20240101"])
            .unwrap();
        let parsed = CmdEnd::from(matches.subcommand_matches("end").unwrap());
        assert_eq!(parsed.rule, "FREQ=DAILY");
        assert_eq!(parsed.start, Some("20240101".parse().unwrap()));
    }

    #[test]
    fn test_output() {
        assert_eq!(end("FREQ=MONTHLY;COUNT=3", "20240115T100000"), "20240315T100000");
        assert_eq!(end("FREQ=DAILY;UNTIL=20240110T000000Z", "20240101T000000Z"), "20240109T235959Z");
        assert_eq!(end("FREQ=YEARLY", "20240101"), "99991231");
    }
}
