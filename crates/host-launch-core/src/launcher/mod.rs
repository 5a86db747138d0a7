//! Orchestration of a single host launch.
//!
//! [`Launcher`] owns the collaborators that touch the outside world and
//! turns a [`LaunchRequest`] plus a [`LaunchEnvironment`] into a
//! [`HostInvocation`]. The steps run in a fixed order: load the sandbox
//! mounts, check the portal permission, resolve the executable, read its
//! interpreter directive, discover the host linker, then assemble.

use std::ffi::OsString;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use host_launch_config::UnsetVariablePolicy;
use tracing::debug;

use crate::env::{DesktopVariables, EnvAssignment, runtime_overrides};
use crate::error::LaunchError;
use crate::invocation::{HostInvocation, InvocationBuilder};
use crate::lister::{LdconfigLister, LibraryCacheLister};
use crate::lookup::{ExecutableLocator, SearchPathLocator};
use crate::permission::{PermissionChecker, SessionBusProbe};
use crate::resolver::PathResolver;
use crate::shebang::read_shebang;


const LAUNCHER_TARGET: &str = "host_launch_core::launcher";

/// What the caller asked to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    command: Vec<String>,
    elevated: bool,
    env: Vec<EnvAssignment>,
}

impl LaunchRequest {
    /// Requests `command`: an executable name followed by its arguments.
    #[must_use]
    pub const fn new(command: Vec<String>) -> Self {
        Self {
            command,
            elevated: false,
            env: Vec::new(),
        }
    }

    /// Runs the command through `pkexec`.
    #[must_use]
    pub const fn elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Adds caller-supplied environment assignments.
    #[must_use]
    pub fn with_env(mut self, env: Vec<EnvAssignment>) -> Self {
        self.env = env;
        self
    }

    /// Executable name followed by its arguments.
    #[must_use]
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Whether elevation was requested.
    #[must_use]
    pub const fn is_elevated(&self) -> bool {
        self.elevated
    }

    /// Caller-supplied assignments in order.
    #[must_use]
    pub fn env(&self) -> &[EnvAssignment] {
        &self.env
    }
}

/// Ambient inputs captured once by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchEnvironment {
    sandbox_info: Utf8PathBuf,
    desktop: DesktopVariables,
    python_version: Option<String>,
    unset_policy: UnsetVariablePolicy,
}

impl LaunchEnvironment {
    /// Reads the sandbox instance metadata from `sandbox_info`.
    #[must_use]
    pub fn new(sandbox_info: impl Into<Utf8PathBuf>) -> Self {
        Self {
            sandbox_info: sandbox_info.into(),
            desktop: DesktopVariables::default(),
            python_version: None,
            unset_policy: UnsetVariablePolicy::default(),
        }
    }

    /// Sets the desktop variables to forward.
    #[must_use]
    pub fn with_desktop(mut self, desktop: DesktopVariables) -> Self {
        self.desktop = desktop;
        self
    }

    /// Sets the runtime's Python `major.minor` version.
    #[must_use]
    pub fn with_python_version(mut self, version: Option<String>) -> Self {
        self.python_version = version;
        self
    }

    /// Sets how unset desktop variables are forwarded.
    #[must_use]
    pub const fn with_unset_policy(mut self, policy: UnsetVariablePolicy) -> Self {
        self.unset_policy = policy;
        self
    }

    /// Path of the sandbox instance metadata.
    #[must_use]
    pub fn sandbox_info(&self) -> &Utf8Path {
        &self.sandbox_info
    }
}

/// Prepares host invocations using injected collaborators.
#[derive(Debug, Clone)]
pub struct Launcher<L, P, X> {
    lister: L,
    permission: P,
    locator: X,
}

impl Launcher<LdconfigLister, SessionBusProbe, SearchPathLocator> {
    /// Uses `ldconfig`, `gdbus` and a lookup over `search_path`.
    #[must_use]
    pub fn system(search_path: Option<OsString>, cwd: impl Into<PathBuf>) -> Self {
        Self::new(
            LdconfigLister::default(),
            SessionBusProbe::default(),
            SearchPathLocator::new(search_path, cwd),
        )
    }
}

impl<L, P, X> Launcher<L, P, X>
where
    L: LibraryCacheLister,
    P: PermissionChecker,
    X: ExecutableLocator,
{
    /// Creates a launcher from its collaborators.
    #[must_use]
    pub const fn new(lister: L, permission: P, locator: X) -> Self {
        Self {
            lister,
            permission,
            locator,
        }
    }

    /// Builds the host invocation for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::EmptyCommand`] for an empty request,
    /// [`LaunchError::NotSandboxed`] when the metadata cannot be read,
    /// [`LaunchError::PermissionDenied`] when the portal is unreachable,
    /// [`LaunchError::ExecutableNotFound`] when the command does not
    /// resolve, and [`LaunchError::LinkerNotFound`] when the host linker
    /// cannot be discovered.
    pub fn prepare(
        &self,
        request: &LaunchRequest,
        environment: &LaunchEnvironment,
    ) -> Result<HostInvocation, LaunchError> {
        let Some((name, arguments)) = request.command().split_first() else {
            return Err(LaunchError::EmptyCommand);
        };
        let resolver = PathResolver::initialize(environment.sandbox_info(), &self.lister)?;
        self.permission.check()?;

        let executable = self.locator.locate(name)?;
        let shebang = read_shebang(executable.as_std_path(), resolver.mounts());
        let linker = resolver.discover_linker()?;
        let host_executable = resolver.to_host_path(executable.as_str());
        debug!(
            target: LAUNCHER_TARGET,
            sandbox_executable = %executable,
            host_executable = %host_executable,
            interpreter = !shebang.is_empty(),
            "preparing host launch"
        );

        Ok(InvocationBuilder::new(linker, host_executable)
            .elevated(request.is_elevated())
            .desktop_env(environment.desktop.assignments(environment.unset_policy))
            .runtime_env(runtime_overrides(
                resolver.mounts(),
                environment.python_version.as_deref(),
            ))
            .user_env(request.env().iter().cloned())
            .shebang(shebang)
            .arguments(arguments.iter().cloned())
            .build())
    }
}
