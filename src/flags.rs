//! Flag declaration and read-back
//!
//! rfcli declares its flags at runtime (the names carry a caller-chosen
//! prefix such as "rx-" or "tx-"), so it builds [`clap::Arg`]s through a
//! small [`FlagSet`] instead of a derive. The set is collected first and
//! attached to the [`clap::Command`] in one go, which is what lets
//! [`FlagSet::env_defaults`] wire every flag - including backend-specific
//! ones - to its environment variable before parsing.

use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command};
use rfcli_core::{Error, Result};

/// An ordered collection of flags not yet attached to a command.
#[derive(Default)]
pub struct FlagSet {
    args: Vec<Arg>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a string flag.
    pub fn string(
        &mut self,
        name: impl Into<String>,
        default: impl Into<String>,
        help: impl Into<String>,
    ) {
        let name = name.into();
        self.args.push(
            Arg::new(name.clone())
                .long(name)
                .value_name("VALUE")
                .default_value(default.into())
                .help(help.into()),
        );
    }

    /// Declare an unsigned integer flag.
    pub fn uint(&mut self, name: impl Into<String>, default: u32, help: impl Into<String>) {
        let name = name.into();
        self.args.push(
            Arg::new(name.clone())
                .long(name)
                .value_name("N")
                .value_parser(clap::value_parser!(u32))
                .default_value(default.to_string())
                .help(help.into()),
        );
    }

    /// Declare a boolean flag (present = true).
    pub fn bool(&mut self, name: impl Into<String>, help: impl Into<String>) {
        let name = name.into();
        self.args.push(
            Arg::new(name.clone())
                .long(name)
                .action(ArgAction::SetTrue)
                .help(help.into()),
        );
    }

    /// Declare a duration flag ("30s", "2m", "1h30m").
    pub fn duration(
        &mut self,
        name: impl Into<String>,
        default: Duration,
        help: impl Into<String>,
    ) {
        let name = name.into();
        self.args.push(
            Arg::new(name.clone())
                .long(name)
                .value_name("DURATION")
                .value_parser(humantime::parse_duration)
                .default_value(humantime::format_duration(default).to_string())
                .help(help.into()),
        );
    }

    /// Wire every declared flag to an environment variable named by
    /// uppercasing the flag name, replacing `-` with `_`, and prepending
    /// `env_prefix`. A set, non-empty variable seeds the default; an
    /// explicit CLI value still wins. Empty variables are ignored rather
    /// than read as empty values. Each flag's help text names its
    /// variable.
    pub fn env_defaults(&mut self, env_prefix: &str) {
        self.args = std::mem::take(&mut self.args)
            .into_iter()
            .map(|arg| {
                let env = env_name(env_prefix, arg.get_id().as_str());
                let help = match arg.get_help() {
                    Some(help) => format!("{help} (${{{env}}})"),
                    None => format!("(${{{env}}})"),
                };
                let arg = arg.help(help);
                match std::env::var(&env) {
                    Ok(value) if !value.is_empty() => arg.env(env).hide_env(true),
                    _ => arg,
                }
            })
            .collect();
    }

    /// Add every declared flag to the command.
    pub fn attach(self, mut cmd: Command) -> Command {
        for arg in self.args {
            cmd = cmd.arg(arg);
        }
        cmd
    }
}

/// Turn a flag name into an environment variable name.
fn env_name(prefix: &str, flag: &str) -> String {
    format!("{}{}", prefix, flag.to_uppercase().replace('-', "_"))
}

/// Read a string flag, surfacing undeclared flags as [`Error::FlagRead`].
pub fn str_flag<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .try_get_one::<String>(name)
        .map_err(|_| Error::FlagRead(name.to_string()))?
        .map(String::as_str)
        .ok_or_else(|| Error::FlagRead(name.to_string()))
}

/// Read an unsigned integer flag.
pub fn u32_flag(matches: &ArgMatches, name: &str) -> Result<u32> {
    matches
        .try_get_one::<u32>(name)
        .map_err(|_| Error::FlagRead(name.to_string()))?
        .copied()
        .ok_or_else(|| Error::FlagRead(name.to_string()))
}

/// Read a boolean flag.
pub fn bool_flag(matches: &ArgMatches, name: &str) -> Result<bool> {
    matches
        .try_get_one::<bool>(name)
        .map_err(|_| Error::FlagRead(name.to_string()))?
        .copied()
        .ok_or_else(|| Error::FlagRead(name.to_string()))
}

/// Read a duration flag.
pub fn duration_flag(matches: &ArgMatches, name: &str) -> Result<Duration> {
    matches
        .try_get_one::<Duration>(name)
        .map_err(|_| Error::FlagRead(name.to_string()))?
        .copied()
        .ok_or_else(|| Error::FlagRead(name.to_string()))
}
