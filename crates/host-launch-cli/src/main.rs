//! Entrypoint for `flatpak-host-launch`.
//!
//! Delegates to [`host_launch_cli::run`], which loads configuration, prepares
//! the host invocation, runs it, and mirrors its exit status.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    host_launch_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
