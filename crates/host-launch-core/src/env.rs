//! Environment assignments placed between `env` and the linker.

use std::fmt;
use std::str::FromStr;

use host_launch_config::UnsetVariablePolicy;
use thiserror::Error;
use tracing::warn;

use crate::mounts::{APP_PREFIX, SandboxMounts};

const ENV_TARGET: &str = "host_launch_core::env";

/// Desktop-integration variables forwarded to the host process, in order.
pub const FORWARDED_VARIABLES: [&str; 3] = ["XDG_DATA_HOME", "XDG_CONFIG_HOME", "XDG_CACHE_HOME"];

/// A validated `NAME=VALUE` assignment, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvAssignment {
    raw: String,
    name_len: usize,
}

/// Rejections raised while parsing an [`EnvAssignment`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvAssignmentError {
    /// The text lacks the `=` separator.
    #[error("'{0}' is not of the form NAME=VALUE")]
    MissingSeparator(String),
    /// The text starts with `=`.
    #[error("'{0}' has an empty variable name")]
    EmptyName(String),
}

impl EnvAssignment {
    /// Builds an assignment from its parts.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            raw: format!("{name}={value}"),
            name_len: name.len(),
        }
    }

    /// Variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.raw.get(..self.name_len).unwrap_or_default()
    }

    /// Assigned value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.raw.get(self.name_len + 1..).unwrap_or_default()
    }

    /// The assignment as passed to `env`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for EnvAssignment {
    type Err = EnvAssignmentError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let Some((name, _)) = raw.split_once('=') else {
            return Err(EnvAssignmentError::MissingSeparator(raw.to_owned()));
        };
        if name.is_empty() {
            return Err(EnvAssignmentError::EmptyName(raw.to_owned()));
        }
        Ok(Self {
            raw: raw.to_owned(),
            name_len: name.len(),
        })
    }
}

impl fmt::Display for EnvAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<EnvAssignment> for String {
    fn from(assignment: EnvAssignment) -> Self {
        assignment.raw
    }
}

/// Snapshot of the desktop-integration variables to forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopVariables {
    data_home: Option<String>,
    config_home: Option<String>,
    cache_home: Option<String>,
}

impl DesktopVariables {
    /// Creates a snapshot from explicit values.
    #[must_use]
    pub const fn new(
        data_home: Option<String>,
        config_home: Option<String>,
        cache_home: Option<String>,
    ) -> Self {
        Self {
            data_home,
            config_home,
            cache_home,
        }
    }

    /// Captures the variables through `lookup`, typically `std::env::var`.
    #[must_use]
    pub fn capture(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
        let [data, config, cache] = FORWARDED_VARIABLES;
        Self::new(lookup(data), lookup(config), lookup(cache))
    }

    /// Assignments in forwarding order, applying `policy` to unset values.
    #[must_use]
    pub fn assignments(&self, policy: UnsetVariablePolicy) -> Vec<EnvAssignment> {
        let [data, config, cache] = FORWARDED_VARIABLES;
        [
            (data, &self.data_home),
            (config, &self.config_home),
            (cache, &self.cache_home),
        ]
        .into_iter()
        .filter_map(|(name, current)| match current {
            Some(set) => Some(EnvAssignment::new(name, set)),
            None => {
                let substitute = policy.substitute()?;
                if policy == UnsetVariablePolicy::Placeholder {
                    warn!(
                        target: ENV_TARGET,
                        variable = name,
                        "forwarding unset variable as the literal placeholder {substitute:?}"
                    );
                }
                Some(EnvAssignment::new(name, substitute))
            }
        })
        .collect()
    }
}

/// Python overrides pinning the interpreter to the host-mapped runtime.
///
/// `PYTHONHOME` points at the runtime mount. `PYTHONPATH` points at the
/// application's `site-packages` for `python_version` (`major.minor`) and is
/// left out when the version is unknown.
#[must_use]
pub fn runtime_overrides(mounts: &SandboxMounts, python_version: Option<&str>) -> Vec<EnvAssignment> {
    let mut overrides = vec![EnvAssignment::new(
        "PYTHONHOME",
        mounts.runtime_path().as_str(),
    )];
    if let Some(version) = python_version {
        let site_packages = format!("{APP_PREFIX}/lib/python{version}/site-packages");
        overrides.push(EnvAssignment::new(
            "PYTHONPATH",
            &mounts.to_host_path(&site_packages),
        ));
    }
    overrides
}
