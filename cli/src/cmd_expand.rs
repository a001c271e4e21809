// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg, value_parser};
use recurcal_core::{Config, LooseDateTime, RecurringEventDraft, ViewEnd, ViewWindow};

use crate::arg::CommonArgs;

#[derive(Debug, Clone)]
pub struct CmdExpand {
    pub rule: String,
    pub start: Option<LooseDateTime>,
    pub from: Option<LooseDateTime>,
    pub to: Option<LooseDateTime>,
    pub rdate: Option<String>,
    pub exdate: Option<String>,
    pub limit: Option<usize>,
}

impl CmdExpand {
    pub const NAME: &str = "expand";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("List the occurrences of a recurrence rule")
            .arg(CommonArgs::rule())
            .arg(CommonArgs::start())
            .arg(CommonArgs::instant("from", "First instant to list, inclusive"))
            .arg(CommonArgs::instant("to", "Last instant to list, inclusive"))
            .arg(arg!(--rdate <LIST> "Extra occurrences, instant[/duration] joined by commas"))
            .arg(arg!(--exdate <LIST> "Excluded occurrences, instants joined by commas"))
            .arg(
                arg!(--limit <N> "Print at most N occurrences")
                    .value_parser(value_parser!(usize)),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            rule: CommonArgs::get_rule(matches),
            start: CommonArgs::get_start(matches),
            from: CommonArgs::get_instant(matches, "from"),
            to: CommonArgs::get_instant(matches, "to"),
            rdate: matches.get_one("rdate").cloned(),
            exdate: matches.get_one("exdate").cloned(),
            limit: matches.get_one("limit").copied(),
        }
    }

    /// The occurrence keys, in order.
    pub fn output(&self, config: Config) -> Result<Vec<String>, Box<dyn Error>> {
        let start = self.start.clone().ok_or("missing --start")?;
        let mut draft = RecurringEventDraft::new(start);
        draft.rule = Some(self.rule.clone());
        draft.rdate.clone_from(&self.rdate);
        draft.exdate.clone_from(&self.exdate);
        draft.window = ViewWindow {
            start: self.from.clone(),
            end: self.to.clone().map_or(ViewEnd::Open, ViewEnd::At),
        };

        let event = draft.build(config)?;
        let limit = self.limit.unwrap_or(usize::MAX);
        let keys = event
            .occurrences()?
            .iter()
            .take(limit)
            .map(|o| o.recurrence_id().to_string())
            .collect();
        Ok(keys)
    }

    pub fn run(self, config: Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "expanding rule...");
        for key in self.output(config)? {
            println!("{key}");
        }
        Ok(())
    }
}
