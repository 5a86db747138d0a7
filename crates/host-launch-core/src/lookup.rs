//! Resolution of command names against the sandbox's own search path.

use std::ffi::OsString;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use tracing::debug;

use crate::error::LaunchError;

const LOOKUP_TARGET: &str = "host_launch_core::lookup";

/// Resolves a command name to an absolute in-sandbox executable path.
pub trait ExecutableLocator {
    /// Locates `name`.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::ExecutableNotFound`] when nothing matches.
    fn locate(&self, name: &str) -> Result<Utf8PathBuf, LaunchError>;
}

impl<X: ExecutableLocator + ?Sized> ExecutableLocator for &X {
    fn locate(&self, name: &str) -> Result<Utf8PathBuf, LaunchError> {
        (**self).locate(name)
    }
}

/// `PATH`-style lookup over an explicit search path.
///
/// Names containing a `/` are checked directly, relative to `cwd` when not
/// absolute.
#[derive(Debug, Clone)]
pub struct SearchPathLocator {
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl SearchPathLocator {
    /// Creates a locator for the given `PATH` value and working directory.
    #[must_use]
    pub fn new(search_path: Option<OsString>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            search_path,
            cwd: cwd.into(),
        }
    }
}

impl ExecutableLocator for SearchPathLocator {
    fn locate(&self, name: &str) -> Result<Utf8PathBuf, LaunchError> {
        let not_found = || LaunchError::ExecutableNotFound {
            name: name.to_owned(),
        };
        let found = which::which_in(name, self.search_path.as_ref(), &self.cwd)
            .map_err(|_| not_found())?;
        let resolved = Utf8PathBuf::from_path_buf(found).map_err(|_| not_found())?;
        debug!(target: LOOKUP_TARGET, name, executable = %resolved, "resolved executable");
        Ok(resolved)
    }
}
