//! CLI argument parsing
//!
//! Handles subcommand selection and the flags that override the config file.

use std::env;

use anyhow::{bail, Result};

use crate::config::{ArrowSetting, Config};

pub const USAGE: &str = "\
Usage: rankbar [COMMAND] [OPTIONS]

Show Kotlin's TIOBE index rank as a status segment.

Commands:
  watch     Keep the rank on screen, refreshing daily (default)
  once      Print the rank once and exit
  show      Print the cached rank without fetching
  reset     Forget the cached rank
  config    Write the default config file if missing and print its path

Options:
  --url <URL>    Index page to scrape
  --ascii        Draw rank changes as \"#5 -> #7\"
  --unicode      Draw rank changes with a unicode arrow
  -v, --verbose  Log debug output to stderr
  -h, --help     Show this help
";

/// Subcommand to run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Command {
    /// Refresh periodically until interrupted
    #[default]
    Watch,
    /// Single refresh, print and exit
    Once,
    /// Print the cached snapshot
    Show,
    /// Clear the cached snapshot
    Reset,
    /// Create the config file
    Config,
}

/// Parsed command-line arguments
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub url: Option<String>,
    pub arrow: Option<ArrowSetting>,
    pub verbose: bool,
    pub help: bool,
}

impl Args {
    /// Index page URL: flag, then config
    pub fn source_url<'a>(&'a self, config: &'a Config) -> &'a str {
        self.url.as_deref().unwrap_or(&config.source_url)
    }

    /// Arrow setting: flag, then config
    pub fn arrow_setting(&self, config: &Config) -> ArrowSetting {
        self.arrow.unwrap_or(config.arrow)
    }
}

/// Parse the process arguments
pub fn parse_args() -> Result<Args> {
    parse_args_from(env::args().skip(1)) // Skip the binary name
}

/// Parse arguments, excluding the binary name
pub fn parse_args_from<I>(argv: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut args = Args::default();
    let mut iter = argv.into_iter().peekable();

    // Check for subcommand first
    if let Some(first) = iter.peek() {
        let command = match first.as_str() {
            "watch" => Some(Command::Watch),
            "once" => Some(Command::Once),
            "show" => Some(Command::Show),
            "reset" => Some(Command::Reset),
            "config" => Some(Command::Config),
            _ => None,
        };
        if let Some(command) = command {
            iter.next(); // consume the subcommand
            args.command = command;
        }
    }

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--url" => match iter.next() {
                Some(url) => args.url = Some(url),
                None => bail!("--url needs a value"),
            },
            "--ascii" => args.arrow = Some(ArrowSetting::Ascii),
            "--unicode" => args.arrow = Some(ArrowSetting::Unicode),
            "-v" | "--verbose" => args.verbose = true,
            "-h" | "--help" => args.help = true,
            _ => {
                if let Some(url) = arg.strip_prefix("--url=") {
                    args.url = Some(url.to_string());
                } else {
                    bail!("Unknown argument: {}. Run 'rankbar --help' for usage.", arg);
                }
            }
        }
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args> {
        parse_args_from(argv.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_default_is_watch() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.command, Command::Watch);
        assert_eq!(args.url, None);
        assert_eq!(args.arrow, None);
    }

    #[test]
    fn test_subcommands() {
        assert_eq!(parse(&["once"]).unwrap().command, Command::Once);
        assert_eq!(parse(&["show"]).unwrap().command, Command::Show);
        assert_eq!(parse(&["reset"]).unwrap().command, Command::Reset);
        assert_eq!(parse(&["config"]).unwrap().command, Command::Config);
        assert_eq!(parse(&["watch", "-v"]).unwrap().command, Command::Watch);
    }

    #[test]
    fn test_flags() {
        let args = parse(&["once", "--ascii", "--url", "http://localhost/x", "-v"]).unwrap();
        assert_eq!(args.command, Command::Once);
        assert_eq!(args.arrow, Some(ArrowSetting::Ascii));
        assert_eq!(args.url.as_deref(), Some("http://localhost/x"));
        assert!(args.verbose);

        let args = parse(&["--url=http://mirror/", "--unicode", "--help"]).unwrap();
        assert_eq!(args.url.as_deref(), Some("http://mirror/"));
        assert_eq!(args.arrow, Some(ArrowSetting::Unicode));
        assert!(args.help);
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["--url"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["once", "twice"]).is_err());
    }

    #[test]
    fn test_overrides_config() {
        let config = Config {
            arrow: ArrowSetting::Unicode,
            ..Config::default()
        };

        let args = parse(&[]).unwrap();
        assert_eq!(args.source_url(&config), config.source_url);
        assert_eq!(args.arrow_setting(&config), ArrowSetting::Unicode);

        let args = parse(&["--ascii", "--url", "http://mirror/"]).unwrap();
        assert_eq!(args.source_url(&config), "http://mirror/");
        assert_eq!(args.arrow_setting(&config), ArrowSetting::Ascii);
    }
}
