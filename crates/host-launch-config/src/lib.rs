//! Layered configuration for the `flatpak-host-launch` tool.
//!
//! [`Config`] is assembled by `ortho_config` from built-in defaults, an
//! optional configuration file (`--config-path` or `HOST_LAUNCH_CONFIG_PATH`),
//! `HOST_LAUNCH_*` environment variables, and command-line flags, in
//! increasing order of precedence. The launcher only consults configuration
//! for ambient concerns: where the sandbox metadata lives, how logs are
//! rendered, and how missing desktop variables are forwarded.

mod defaults;
mod logging;
mod policy;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_SANDBOX_INFO, default_log_filter, default_log_filter_string,
    default_log_format, default_sandbox_info,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use policy::{UnsetVariablePolicy, UnsetVariablePolicyParseError};

/// Resolved launcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "HOST_LAUNCH")]
pub struct Config {
    /// `tracing` filter expression applied to launcher diagnostics.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for launcher diagnostics.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Path of the sandbox instance metadata file.
    #[serde(default = "default_sandbox_info")]
    #[ortho_config(default = default_sandbox_info())]
    pub sandbox_info: Utf8PathBuf,
    /// Python `major.minor` version of the sandbox runtime. Detected from the
    /// runtime's library directory when unset.
    #[serde(default)]
    pub python_version: Option<String>,
    /// Forwarding policy for unset `XDG_*` variables.
    #[serde(default)]
    #[ortho_config(default = UnsetVariablePolicy::Placeholder)]
    pub unset_env_policy: UnsetVariablePolicy,
}

impl Config {
    /// Filter expression for the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Diagnostics output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Location of the sandbox instance metadata.
    #[must_use]
    pub fn sandbox_info(&self) -> &Utf8Path {
        self.sandbox_info.as_path()
    }

    /// Explicitly configured Python runtime version, if any.
    #[must_use]
    pub fn python_version(&self) -> Option<&str> {
        self.python_version.as_deref()
    }

    /// Forwarding policy for unset desktop variables.
    #[must_use]
    pub const fn unset_env_policy(&self) -> UnsetVariablePolicy {
        self.unset_env_policy
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            sandbox_info: default_sandbox_info(),
            python_version: None,
            unset_env_policy: UnsetVariablePolicy::default(),
        }
    }
}
