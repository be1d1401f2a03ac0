/*!
 * Command Line Arguments
 * `usps [-q <msec>] [--summary] [--] [FILE]`
 */

use crate::core::ConfigError;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: usps [-q <msec>] [--summary] [--] [FILE]

Runs one process per line of FILE (or stdin) under a round-robin scheduler.

Options:
  -q, --quantum <msec>  time quantum in milliseconds (overrides USPS_QUANTUM_MSEC)
      --summary         print a JSON run summary on stderr when done
  -h, --help            show this help

An interrupt (Ctrl-C) while waiting for commands on stdin takes effect once
the next line or end of input arrives.
";

/// Where commands are read from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputPath {
    #[default]
    Stdin,
    File(PathBuf),
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliArgs {
    /// Raw quantum override, validated later by `SchedulerConfig::resolve`
    pub quantum: Option<String>,
    pub input: InputPath,
    pub summary: bool,
    pub help: bool,
}

impl CliArgs {
    /// Parse arguments (without the program name)
    pub fn parse<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = CliArgs::default();
        let mut positional: Option<String> = None;
        let mut options_done = false;
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            if options_done || arg == "-" || !arg.starts_with('-') {
                if positional.is_some() {
                    return Err(ConfigError::UnexpectedArgument(arg));
                }
                positional = Some(arg);
                continue;
            }

            match arg.as_str() {
                "--" => options_done = true,
                "-h" | "--help" => parsed.help = true,
                "--summary" => parsed.summary = true,
                "-q" | "--quantum" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;
                    parsed.quantum = Some(value);
                }
                other => {
                    if let Some(value) = other.strip_prefix("--quantum=") {
                        parsed.quantum = Some(value.to_string());
                    } else if let Some(value) = other.strip_prefix("-q").filter(|v| !v.is_empty()) {
                        parsed.quantum = Some(value.to_string());
                    } else {
                        return Err(ConfigError::UnknownOption(other.to_string()));
                    }
                }
            }
        }

        parsed.input = match positional {
            None => InputPath::Stdin,
            Some(path) if path == "-" => InputPath::Stdin,
            Some(path) => InputPath::File(PathBuf::from(path)),
        };

        Ok(parsed)
    }
}
