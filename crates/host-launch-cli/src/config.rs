//! Configuration loading helpers for the launcher CLI.
//!
//! Configuration flags lead the argument list; everything from the first
//! launch flag or command token onwards belongs to clap. The loader only
//! receives the leading configuration flags so that arguments meant for the
//! host command never reach `ortho_config`.

use std::ffi::{OsStr, OsString};

use host_launch_config::Config;
use ortho_config::OrthoConfig;

use crate::AppError;

/// CLI flags recognised by the configuration loader.
///
/// Must list every field of [`Config`] plus `--config-path`.
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--sandbox-info",
    "--python-version",
    "--unset-env-policy",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration from the leading configuration flags.
    ///
    /// # Flag Ordering
    ///
    /// Configuration flags (listed in `CONFIG_CLI_FLAGS`) must appear before
    /// any launch flag or command token. Later occurrences are passed to the
    /// host command verbatim.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

fn classify(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    let (flag, inline_value) = text
        .split_once('=')
        .map_or((text.as_ref(), false), |(name, _)| (name, true));
    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !inline_value,
        }
    } else {
        FlagAction::Stop
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    /// Program name followed by the configuration flags and their values.
    pub(crate) config_arguments: Vec<OsString>,
    /// Program name followed by the launch flags and command.
    pub(crate) cli_arguments: Vec<OsString>,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit::default();
    };

    let mut config_arguments = vec![program.clone()];
    let mut remaining = rest.iter();
    let mut command_start = rest.len();
    let mut consumed = 0usize;
    while let Some(argument) = remaining.next() {
        match classify(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                consumed += 1;
                if let Some(value) = needs_value.then(|| remaining.next()).flatten() {
                    config_arguments.push(value.clone());
                    consumed += 1;
                }
            }
            FlagAction::Stop => {
                command_start = consumed;
                break;
            }
        }
    }

    let mut cli_arguments = vec![program.clone()];
    cli_arguments.extend(rest.iter().skip(command_start).cloned());
    ConfigArgumentSplit {
        config_arguments,
        cli_arguments,
    }
}
