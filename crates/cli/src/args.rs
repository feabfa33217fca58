//! Command-line arguments
//!
//! Flags follow the single-dash long form used by Go tools (`-name`,
//! `-quiet 2.5`, `-v`). Double-dash forms are accepted too. Flag parsing
//! stops at the first positional argument; everything from there on is
//! the command to run, including arguments that look like flags.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use onchange_core::{Config, ConfigError, DEFAULT_QUIET_SECS};
use std::ffi::OsString;

/// Run a command whenever files in the current directory change
#[derive(Parser, Debug)]
#[command(name = "onchange")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Only detect changes on files matching this pattern. For example, -name "*.go"
    #[arg(long, value_name = "PATTERN", default_value = "")]
    pub name: String,

    /// Quiet time after an execution, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_QUIET_SECS, allow_negative_numbers = true)]
    pub quiet: f64,

    /// Command to run on change, followed by its arguments
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Flags that consume a value
const VALUE_FLAGS: [&str; 2] = ["name", "quiet"];

impl Args {
    /// Parse from raw process arguments (program name first)
    pub fn parse_go_style<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        match normalize_go_flags(argv) {
            Ok(argv) => Self::parse_from(argv),
            Err(e) => e.exit(),
        }
    }

    /// Like [`Args::parse_go_style`], returning the error instead of exiting
    pub fn try_parse_go_style<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_go_flags(argv)?)
    }

    /// Build the run configuration
    pub fn into_config(self) -> Result<Config, ConfigError> {
        Config::default()
            .with_verbose(self.verbose)
            .with_name_pattern(self.name)
            .with_quiet_secs(self.quiet)?
            .with_command(self.command)
    }
}

/// Rewrite Go-style flags into the form clap expects
///
/// `-name x` becomes `--name x`, `-quiet=1` becomes `--quiet=1`,
/// `-v=false` is dropped. A `--` is inserted before the first positional
/// argument so the command's own flags are never parsed as ours. Any other
/// dash-prefixed token before the command is an error, except the help and
/// version flags, which are left for clap.
pub fn normalize_go_flags<I, T>(argv: I) -> Result<Vec<OsString>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut input = argv.into_iter().map(Into::into);
    let mut out: Vec<OsString> = input.next().into_iter().collect();

    while let Some(arg) = input.next() {
        let Some(text) = arg.to_str().map(str::to_owned) else {
            out.push("--".into());
            out.push(arg);
            break;
        };

        if text == "--" {
            out.push(arg);
            break;
        }

        let flag = match text.strip_prefix("--") {
            Some(rest) => rest,
            None => match text.strip_prefix('-') {
                Some(rest) if !rest.is_empty() => rest,
                _ => {
                    out.push("--".into());
                    out.push(arg);
                    break;
                }
            },
        };

        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };

        match (name, value) {
            ("v" | "verbose", None) => out.push("--verbose".into()),
            ("v" | "verbose", Some(value)) => match value {
                "1" | "t" | "T" | "true" | "TRUE" | "True" => out.push("--verbose".into()),
                "0" | "f" | "F" | "false" | "FALSE" | "False" => {}
                _ => {
                    return Err(Args::command().error(
                        ErrorKind::InvalidValue,
                        format!("invalid boolean value {value:?} for -{name}"),
                    ))
                }
            },
            (name, None) if VALUE_FLAGS.contains(&name) => {
                out.push(format!("--{name}").into());
                if let Some(value) = input.next() {
                    out.push(value);
                }
            }
            (name, Some(value)) if VALUE_FLAGS.contains(&name) => {
                out.push(format!("--{name}={value}").into());
            }
            ("h" | "help" | "V" | "version", None) => out.push(arg),
            _ => {
                return Err(Args::command().error(
                    ErrorKind::UnknownArgument,
                    format!("flag provided but not defined: {text}"),
                ))
            }
        }
    }

    out.extend(input);
    Ok(out)
}
