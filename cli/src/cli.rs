// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf};

use clap::{ArgAction, ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use recurcal_core::APP_NAME;
use tracing_subscriber::EnvFilter;

use crate::cmd_end::CmdEnd;
use crate::cmd_expand::CmdExpand;
use crate::cmd_normalize::CmdNormalize;
use crate::config::parse_config;

/// Run the recurcal command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = cli.run().await {
        println!("{} {}", "Error:".red(), e);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise
    pub verbose: bool,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Expand and inspect RFC 5545 recurrence rules.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $XDG_CONFIG_HOME/recurcal/config.toml on Linux and MacOS, \
%LOCALAPPDATA%/recurcal/config.toml on Windows. Built-in defaults apply when it does not exist.",
                    )
                    .global(true)
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(-v --verbose "Print debug logs to stderr")
                    .global(true)
                    .action(ArgAction::SetTrue),
            )
            .subcommand(CmdExpand::command())
            .subcommand(CmdNormalize::command())
            .subcommand(CmdEnd::command())
    }

    /// Parse the command-line arguments, exiting on usage errors
    pub fn parse() -> Self {
        let matches = Self::command().get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Ok(Self::from(&matches))
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Self {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdExpand::NAME, matches)) => Expand(CmdExpand::from(matches)),
            Some((CmdNormalize::NAME, matches)) => Normalize(CmdNormalize::from(matches)),
            Some((CmdEnd::NAME, matches)) => End(CmdEnd::from(matches)),
            _ => unreachable!(),
        };

        let config = matches.get_one("config").cloned();
        let verbose = matches.get_flag("verbose");
        Cli {
            config,
            verbose,
            command,
        }
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// List the occurrences of a rule
    Expand(CmdExpand),

    /// Print the canonical form of a rule
    Normalize(CmdNormalize),

    /// Print the last instant a rule can reach
    End(CmdEnd),
}

impl Commands {
    /// Run the command with the given configuration
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        tracing::debug!(?self, "running command");
        match self {
            Expand(a) => a.run(parse_config(config).await?),
            Normalize(a) => a.run(),
            End(a) => a.run(parse_config(config).await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expand() {
        let args = vec![
            "test",
            "expand",
            "FREQ=WEEKLY;BYDAY=MO",
            "--start",
            "20240101T090000",
            "--limit",
            "5",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, None);
        assert!(!cli.verbose);
        match cli.command {
            Commands::Expand(cmd) => {
                assert_eq!(cmd.rule, "FREQ=WEEKLY;BYDAY=MO");
                assert_eq!(cmd.limit, Some(5));
            }
            _ => panic!("Expected Expand command"),
        }
    }

    #[test]
    fn test_parse_normalize() {
        let cli = Cli::try_parse_from(["test", "normalize", "freq=daily"]).unwrap();
        assert!(matches!(cli.command, Commands::Normalize(_)));
    }

    #[test]
    fn test_parse_end() {
        let args = ["test", "end", "FREQ=DAILY;COUNT=2", "-s", "20240101"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Commands::End(_)));
    }

    #[test]
    fn test_parse_global_flags() {
        let args = [
            "test",
            "-v",
            "normalize",
            "FREQ=DAILY",
            "--config",
            "/tmp/recurcal.toml",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/recurcal.toml")));
    }

    #[test]
    fn test_parse_requires_subcommand() {
        assert!(Cli::try_parse_from(["test"]).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["test", "dashboard"]).is_err());
    }
}
