//! Execution of a prepared host invocation.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::invocation::HostInvocation;

const SPAWN_TARGET: &str = "host_launch_core::spawn";

/// Offset added to a terminating signal number, following shell convention.
const SIGNAL_EXIT_OFFSET: i32 = 128;

/// Failures while starting the host invocation.
#[derive(Debug, Clone, Error)]
pub enum SpawnError {
    /// The invocation had no program to run.
    #[error("the host invocation is empty")]
    Empty,

    /// The wrapper program could not be started.
    #[error("failed to start {program} in {}: {source}", .working_directory.display())]
    Start {
        /// Program that was executed.
        program: String,
        /// Directory the child was started in.
        working_directory: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
}

/// Runs a [`HostInvocation`] and reports the child's exit status.
pub trait HostSpawner {
    /// Runs `invocation` with `working_directory` as its current directory,
    /// waits for it, and returns its exit status.
    ///
    /// # Errors
    ///
    /// Returns a [`SpawnError`] when the child cannot be started.
    fn spawn(&self, invocation: &HostInvocation, working_directory: &Path)
    -> Result<i32, SpawnError>;
}

impl<S: HostSpawner + ?Sized> HostSpawner for &S {
    fn spawn(
        &self,
        invocation: &HostInvocation,
        working_directory: &Path,
    ) -> Result<i32, SpawnError> {
        (**self).spawn(invocation, working_directory)
    }
}

/// Spawns the invocation as a child process sharing this process's stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessSpawner;

impl HostSpawner for ProcessSpawner {
    fn spawn(
        &self,
        invocation: &HostInvocation,
        working_directory: &Path,
    ) -> Result<i32, SpawnError> {
        let Some((program, args)) = invocation.argv().split_first() else {
            return Err(SpawnError::Empty);
        };
        debug!(
            target: SPAWN_TARGET,
            %invocation,
            working_directory = %working_directory.display(),
            "spawning host invocation"
        );
        let status = Command::new(program)
            .args(args)
            .current_dir(working_directory)
            .status()
            .map_err(|err| SpawnError::Start {
                program: program.clone(),
                working_directory: working_directory.to_path_buf(),
                source: Arc::new(err),
            })?;
        let code = exit_status_code(status);
        debug!(target: SPAWN_TARGET, code, "host invocation finished");
        Ok(code)
    }
}

#[cfg(unix)]
fn exit_status_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| SIGNAL_EXIT_OFFSET + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_status_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
