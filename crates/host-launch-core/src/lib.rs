//! Host launch planning for sandboxed applications.
//!
//! The `host-launch-core` crate turns a command requested from inside a
//! Flatpak sandbox into an invocation that runs on the host. Two pieces carry
//! the design:
//!
//! - [`PathResolver`] reads the sandbox instance metadata, maps
//!   sandbox-internal paths (`/app`, `/usr`) onto the host directories that
//!   mirror them, and discovers the host dynamic linker together with its
//!   library search directories.
//! - [`InvocationBuilder`] assembles the final command vector: the
//!   `flatpak-spawn --host` wrapper, optional `pkexec` elevation, explicit
//!   environment assignments, an explicit linker invocation with
//!   `--library-path`, any interpreter named by the executable's `#!` line,
//!   the translated executable, and the caller's arguments.
//!
//! External tools sit behind small traits ([`LibraryCacheLister`],
//! [`PermissionChecker`], [`ExecutableLocator`], [`HostSpawner`]) so tests
//! can substitute canned behaviour. [`Launcher`] wires them together.
//!
//! ```rust,no_run
//! use host_launch_core::{
//!     DesktopVariables, HostSpawner, LaunchEnvironment, LaunchRequest, Launcher,
//!     ProcessSpawner,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let launcher = Launcher::system(std::env::var_os("PATH"), std::env::current_dir()?);
//! let request = LaunchRequest::new(vec!["ls".into(), "-la".into()]);
//! let environment = LaunchEnvironment::new("/.flatpak-info")
//!     .with_desktop(DesktopVariables::default());
//! let invocation = launcher.prepare(&request, &environment)?;
//! let status = ProcessSpawner.spawn(&invocation, std::path::Path::new("/"))?;
//! std::process::exit(status);
//! # }
//! ```

mod env;
mod error;
mod invocation;
mod launcher;
mod linker;
mod lister;
mod lookup;
mod mounts;
mod permission;
mod python;
mod resolver;
mod shebang;
mod spawn;

#[cfg(test)]
mod tests;

pub use env::{
    DesktopVariables, EnvAssignment, EnvAssignmentError, FORWARDED_VARIABLES, runtime_overrides,
};
pub use error::{LaunchError, MetadataError};
pub use invocation::{
    ELEVATION_PREFIX, ENV_COMMAND, HostInvocation, InvocationBuilder, LIBRARY_PATH_FLAG,
    LIBRARY_PATH_VARIABLE, SPAWN_WRAPPER,
};
pub use launcher::{LaunchEnvironment, LaunchRequest, Launcher};
pub use linker::LinkerInfo;
pub use lister::{LdconfigLister, LibraryCacheLister, ListerError};
pub use lookup::{ExecutableLocator, SearchPathLocator};
pub use mounts::{APP_PREFIX, RUNTIME_PREFIX, SandboxMounts};
pub use permission::{PermissionChecker, PermissionError, SessionBusProbe};
pub use python::{RUNTIME_LIBRARY_ROOT, detect_python_version};
pub use resolver::PathResolver;
pub use shebang::{INTERPRETER_MARKER, ShebangDirective, read_shebang};
pub use spawn::{HostSpawner, ProcessSpawner, SpawnError};
