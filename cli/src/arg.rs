// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgMatches, arg};
use recurcal_core::LooseDateTime;

const INSTANT_HELP: &str = "\
Accepts YYYYMMDD for a date, YYYYMMDDTHHMMSS for a floating time, \
YYYYMMDDTHHMMSSZ for UTC and TZID=<zone>:YYYYMMDDTHHMMSS for a zoned time.";

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn rule() -> Arg {
        arg!(rule: <RULE> "The recurrence rule, e.g. FREQ=WEEKLY;BYDAY=MO,WE")
    }

    pub fn get_rule(matches: &ArgMatches) -> String {
        matches
            .get_one::<String>("rule")
            .cloned()
            .unwrap_or_default()
    }

    pub fn start() -> Arg {
        arg!(-s --start <INSTANT> "Start of the first occurrence")
            .long_help(format!("Start of the first occurrence. {INSTANT_HELP}"))
            .required(true)
            .value_parser(parse_instant)
    }

    pub fn get_start(matches: &ArgMatches) -> Option<LooseDateTime> {
        matches.get_one("start").cloned()
    }

    pub fn instant(id: &'static str, help: &'static str) -> Arg {
        Arg::new(id)
            .long(id)
            .value_name("INSTANT")
            .help(help)
            .long_help(format!("{help}. {INSTANT_HELP}"))
            .value_parser(parse_instant)
    }

    pub fn get_instant(matches: &ArgMatches, id: &str) -> Option<LooseDateTime> {
        matches.get_one(id).cloned()
    }
}

fn parse_instant(s: &str) -> Result<LooseDateTime, String> {
    s.parse().map_err(|e: recurcal_core::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use clap::Command;

    use super::*;

    #[test]
    fn parses_instants() {
        let cmd = Command::new("test")
            .arg(CommonArgs::start())
            .arg(CommonArgs::instant("from", "Start of the view"));
        let matches = cmd
            .try_get_matches_from(["test", "--start", "20240101T090000", "--from", "20240201"])
            .unwrap();

        let start = CommonArgs::get_start(&matches).unwrap();
        assert_eq!(start.format_stable(), "20240101T090000");
        let from = CommonArgs::get_instant(&matches, "from").unwrap();
        assert_eq!(from, "20240201".parse::<LooseDateTime>().unwrap());
    }

    #[test]
    fn rejects_bad_instants() {
        let cmd = Command::new("test").arg(CommonArgs::start());
        assert!(cmd.try_get_matches_from(["test", "--start", "tomorrow"]).is_err());
    }
}
