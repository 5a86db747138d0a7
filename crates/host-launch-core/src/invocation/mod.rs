//! Assembly of the host command vector.
//!
//! [`InvocationBuilder`] collects the pieces of a launch and renders them in
//! a fixed order:
//!
//! 1. the [`SPAWN_WRAPPER`];
//! 2. the [`ELEVATION_PREFIX`] when elevation was requested;
//! 3. [`ENV_COMMAND`] and the [`LIBRARY_PATH_VARIABLE`] assignment;
//! 4. forwarded desktop variables;
//! 5. runtime overrides (`PYTHONHOME`, `PYTHONPATH`);
//! 6. caller-supplied assignments, verbatim;
//! 7. the dynamic linker and [`LIBRARY_PATH_FLAG`];
//! 8. interpreter tokens from the executable's `#!` line;
//! 9. the host-visible executable;
//! 10. the caller's arguments.

use std::fmt;

use tracing::debug;

use crate::env::EnvAssignment;
use crate::linker::LinkerInfo;
use crate::shebang::ShebangDirective;

#[cfg(test)]
mod tests;

const INVOCATION_TARGET: &str = "host_launch_core::invocation";

/// Command escaping the sandbox.
pub const SPAWN_WRAPPER: [&str; 2] = ["flatpak-spawn", "--host"];
/// Command requesting elevated privileges on the host.
pub const ELEVATION_PREFIX: [&str; 2] = ["pkexec", "--disable-internal-agent"];
/// Program applying the environment assignments.
pub const ENV_COMMAND: &str = "env";
/// Variable carrying the host library search path.
pub const LIBRARY_PATH_VARIABLE: &str = "LD_LIBRARY_PATH";
/// Linker option carrying the host library search path.
pub const LIBRARY_PATH_FLAG: &str = "--library-path";

/// Append-only collector for a [`HostInvocation`].
#[derive(Debug, Clone)]
pub struct InvocationBuilder {
    linker: LinkerInfo,
    executable: String,
    elevated: bool,
    desktop_env: Vec<EnvAssignment>,
    runtime_env: Vec<EnvAssignment>,
    user_env: Vec<EnvAssignment>,
    shebang: ShebangDirective,
    arguments: Vec<String>,
}

impl InvocationBuilder {
    /// Starts an invocation of the host-visible `executable` through
    /// `linker`.
    #[must_use]
    pub fn new(linker: LinkerInfo, executable: impl Into<String>) -> Self {
        Self {
            linker,
            executable: executable.into(),
            elevated: false,
            desktop_env: Vec::new(),
            runtime_env: Vec::new(),
            user_env: Vec::new(),
            shebang: ShebangDirective::default(),
            arguments: Vec::new(),
        }
    }

    /// Requests `pkexec` elevation.
    #[must_use]
    pub const fn elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Appends forwarded desktop variables.
    #[must_use]
    pub fn desktop_env(mut self, assignments: impl IntoIterator<Item = EnvAssignment>) -> Self {
        self.desktop_env.extend(assignments);
        self
    }

    /// Appends runtime overrides.
    #[must_use]
    pub fn runtime_env(mut self, assignments: impl IntoIterator<Item = EnvAssignment>) -> Self {
        self.runtime_env.extend(assignments);
        self
    }

    /// Appends caller-supplied assignments.
    #[must_use]
    pub fn user_env(mut self, assignments: impl IntoIterator<Item = EnvAssignment>) -> Self {
        self.user_env.extend(assignments);
        self
    }

    /// Sets the interpreter directive read from the executable.
    #[must_use]
    pub fn shebang(mut self, directive: ShebangDirective) -> Self {
        self.shebang = directive;
        self
    }

    /// Appends arguments passed through to the executable.
    #[must_use]
    pub fn arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Renders the command vector.
    #[must_use]
    pub fn build(self) -> HostInvocation {
        let mut argv: Vec<String> = SPAWN_WRAPPER.iter().map(|arg| (*arg).to_owned()).collect();
        if self.elevated {
            argv.extend(ELEVATION_PREFIX.iter().map(|arg| (*arg).to_owned()));
        }
        argv.push(ENV_COMMAND.to_owned());
        argv.push(format!(
            "{LIBRARY_PATH_VARIABLE}={}",
            self.linker.library_path()
        ));
        argv.extend(
            self.desktop_env
                .into_iter()
                .chain(self.runtime_env)
                .chain(self.user_env)
                .map(String::from),
        );
        argv.push(self.linker.linker().to_owned());
        argv.push(LIBRARY_PATH_FLAG.to_owned());
        argv.push(self.linker.library_path());
        argv.extend(self.shebang.into_tokens());

        let executable_index = argv.len();
        argv.push(self.executable);
        argv.extend(self.arguments);

        let invocation = HostInvocation::from_parts(argv, executable_index);
        debug!(target: INVOCATION_TARGET, %invocation, "assembled host invocation");
        invocation
    }
}

/// Immutable host command vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInvocation {
    argv: Vec<String>,
    executable_index: usize,
}

impl HostInvocation {
    pub(crate) const fn from_parts(argv: Vec<String>, executable_index: usize) -> Self {
        Self {
            argv,
            executable_index,
        }
    }

    /// Full command vector, starting with the spawn wrapper.
    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Host-visible executable path.
    #[must_use]
    pub fn executable(&self) -> Option<&str> {
        self.argv.get(self.executable_index).map(String::as_str)
    }

    /// Arguments following the executable.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        self.argv
            .get(self.executable_index + 1..)
            .unwrap_or_default()
    }

    /// Consumes the invocation, yielding the command vector.
    #[must_use]
    pub fn into_argv(self) -> Vec<String> {
        self.argv
    }
}

impl fmt::Display for HostInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match shlex::try_join(self.argv.iter().map(String::as_str)) {
            Ok(joined) => f.write_str(&joined),
            Err(_) => f.write_str(&self.argv.join(" ")),
        }
    }
}
