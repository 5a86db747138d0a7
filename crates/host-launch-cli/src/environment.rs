//! Capture of the ambient process state the launcher depends on.
//!
//! Everything read from the process environment is gathered here once, so
//! the rest of the runtime receives it explicitly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use host_launch_config::Config;
use host_launch_core::{DesktopVariables, RUNTIME_LIBRARY_ROOT, detect_python_version};

const HOME_MARKER: &str = "~";

/// Ambient inputs for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Ambient {
    pub(crate) search_path: Option<OsString>,
    pub(crate) cwd: PathBuf,
    pub(crate) home: Option<PathBuf>,
    pub(crate) desktop: DesktopVariables,
    pub(crate) runtime_library_root: PathBuf,
}

impl Ambient {
    /// Reads the current process environment.
    pub(crate) fn capture() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")),
            home: dirs::home_dir(),
            desktop: DesktopVariables::capture(|name| std::env::var(name).ok()),
            runtime_library_root: PathBuf::from(RUNTIME_LIBRARY_ROOT),
        }
    }

    /// Python version from configuration, else detected from the runtime.
    pub(crate) fn python_version(&self, config: &Config) -> Option<String> {
        config
            .python_version()
            .map(str::to_owned)
            .or_else(|| detect_python_version(&self.runtime_library_root))
    }

    /// Expands a leading `~` component with the home directory.
    pub(crate) fn working_directory(&self, requested: &str) -> PathBuf {
        expand_home(requested, self.home.as_deref())
    }
}

fn expand_home(requested: &str, home: Option<&Path>) -> PathBuf {
    let Some(home_dir) = home else {
        return PathBuf::from(requested);
    };
    if requested == HOME_MARKER {
        return home_dir.to_path_buf();
    }
    requested
        .strip_prefix("~/")
        .map_or_else(|| PathBuf::from(requested), |rest| home_dir.join(rest))
}
