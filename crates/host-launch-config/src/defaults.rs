use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Location of the instance metadata Flatpak writes into every sandbox.
pub const DEFAULT_SANDBOX_INFO: &str = "/.flatpak-info";

/// Default log filter expression used by the binary.
///
/// Launcher diagnostics share stderr with the launched program, so only
/// warnings surface unless the operator asks for more.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default path of the sandbox instance metadata.
#[must_use]
pub fn default_sandbox_info() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_SANDBOX_INFO)
}
