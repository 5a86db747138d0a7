//! Command-line interface definition for `flatpak-host-launch`.

use clap::Parser;
use host_launch_core::EnvAssignment;

/// Default working directory for the host process.
pub(crate) const DEFAULT_WORKING_DIRECTORY: &str = "~";

/// Runs a command from inside a Flatpak on the host, with the Flatpak's
/// libraries and interpreters.
#[derive(Parser, Debug)]
#[command(name = "flatpak-host-launch", version)]
pub(crate) struct Cli {
    /// Runs the command through pkexec.
    #[arg(long)]
    pub(crate) pkexec: bool,
    /// Sets an environment variable for the host process. May be repeated.
    #[arg(long = "env", value_name = "NAME=VALUE")]
    pub(crate) env: Vec<EnvAssignment>,
    /// Directory the host process starts in. A leading `~` is expanded.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_WORKING_DIRECTORY)]
    pub(crate) working_directory: String,
    /// Executable to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true
    )]
    pub(crate) command: Vec<String>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("flatpak-host-launch").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_apply_without_flags() {
        let cli = parse(&["ls"]).expect("parses");
        assert!(!cli.pkexec);
        assert!(cli.env.is_empty());
        assert_eq!(cli.working_directory, "~");
        assert_eq!(cli.command, vec!["ls"]);
    }

    #[test]
    fn flags_after_command_belong_to_command() {
        let cli = parse(&["--pkexec", "--env", "A=1", "--env", "B=", "ls", "-la", "--pkexec"])
            .expect("parses");
        assert!(cli.pkexec);
        let env: Vec<&str> = cli.env.iter().map(EnvAssignment::as_str).collect();
        assert_eq!(env, vec!["A=1", "B="]);
        assert_eq!(cli.command, vec!["ls", "-la", "--pkexec"]);
    }

    #[rstest]
    #[case(&[])]
    #[case(&["--env", "NOVALUE", "ls"])]
    #[case(&["--env", "=x", "ls"])]
    fn rejects_invalid_invocations(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }
}
