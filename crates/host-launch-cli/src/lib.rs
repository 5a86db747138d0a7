//! Command-line runtime for `flatpak-host-launch`.
//!
//! The runtime splits configuration flags from the launch arguments, loads
//! layered configuration, installs telemetry, captures the ambient
//! environment, prepares the host invocation through `host-launch-core`, and
//! runs it. Configuration loading, planning, and spawning sit behind traits
//! so tests can drive the runner without a sandbox.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use host_launch_config::Config;
use host_launch_core::{
    HostInvocation, HostSpawner, LaunchEnvironment, LaunchError, LaunchRequest, Launcher,
    ProcessSpawner,
};
use tracing::debug;

mod cli;
mod config;
mod environment;
mod errors;
mod telemetry;

#[cfg(test)]
mod tests;

use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use environment::Ambient;
pub(crate) use errors::AppError;

const CLI_TARGET: &str = "host_launch_cli";

/// Turns a request into a host invocation.
pub(crate) trait LaunchPlanner {
    fn prepare(
        &self,
        request: &LaunchRequest,
        environment: &LaunchEnvironment,
        ambient: &Ambient,
    ) -> Result<HostInvocation, LaunchError>;
}

/// Plans with the real `ldconfig`, `gdbus` and search path.
pub(crate) struct SystemPlanner;

impl LaunchPlanner for SystemPlanner {
    fn prepare(
        &self,
        request: &LaunchRequest,
        environment: &LaunchEnvironment,
        ambient: &Ambient,
    ) -> Result<HostInvocation, LaunchError> {
        Launcher::system(ambient.search_path.clone(), ambient.cwd.clone())
            .prepare(request, environment)
    }
}

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, L, P, S> {
    loader: &'a L,
    planner: &'a P,
    spawner: &'a S,
    ambient: Ambient,
}

impl<'a, L, P, S> CliRunner<'a, L, P, S>
where
    L: ConfigLoader,
    P: LaunchPlanner,
    S: HostSpawner,
{
    const fn new(loader: &'a L, planner: &'a P, spawner: &'a S, ambient: Ambient) -> Self {
        Self {
            loader,
            planner,
            spawner,
            ambient,
        }
    }

    fn run<I, W, E>(&self, args: I, io: &mut IoStreams<'_, W, E>) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
        W: Write,
        E: Write,
    {
        match self.launch(args) {
            Ok(status) => exit_code_from_status(status),
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                let _ = write!(io.stdout, "{}", error.render());
                ExitCode::SUCCESS
            }
            Err(AppError::CliUsage(error)) => {
                let _ = write!(io.stderr, "{}", error.render());
                ExitCode::FAILURE
            }
            Err(error) => {
                let _ = writeln!(io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    fn launch<I>(&self, args: I) -> Result<i32, AppError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli = Cli::try_parse_from(split.cli_arguments).map_err(AppError::CliUsage)?;
        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;

        let request = LaunchRequest::new(cli.command)
            .elevated(cli.pkexec)
            .with_env(cli.env);
        let environment = self.launch_environment(&config);
        let invocation = self.planner.prepare(&request, &environment, &self.ambient)?;

        let working_directory = self.ambient.working_directory(&cli.working_directory);
        debug!(
            target: CLI_TARGET,
            working_directory = %working_directory.display(),
            "launching on host"
        );
        Ok(self.spawner.spawn(&invocation, &working_directory)?)
    }

    fn launch_environment(&self, config: &Config) -> LaunchEnvironment {
        LaunchEnvironment::new(config.sandbox_info())
            .with_desktop(self.ambient.desktop.clone())
            .with_python_version(self.ambient.python_version(config))
            .with_unset_policy(config.unset_env_policy())
    }
}

/// Runs the CLI using the provided arguments and IO handles.
///
/// Returns the host process's exit status, or failure after writing a
/// one-line diagnostic to `stderr`.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    CliRunner::new(
        &OrthoConfigLoader,
        &SystemPlanner,
        &ProcessSpawner,
        Ambient::capture(),
    )
    .run(args, &mut io)
}

fn exit_code_from_status(status: i32) -> ExitCode {
    u8::try_from(status).map_or(ExitCode::FAILURE, ExitCode::from)
}
