//! Verification that the sandbox may talk to the Flatpak portal.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

const PERMISSION_TARGET: &str = "host_launch_core::permission";

/// Arguments pinging the Flatpak development interface on the session bus.
const PING_ARGS: &[&str] = &[
    "call",
    "--session",
    "--dest",
    "org.freedesktop.Flatpak",
    "--object-path",
    "/org/freedesktop/Flatpak/Development",
    "--method",
    "org.freedesktop.DBus.Peer.Ping",
];

/// The sandbox lacks the permission required to spawn host processes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The Flatpak is missing the --talk-name=org.freedesktop.Flatpak permission")]
pub struct PermissionError {
    reason: String,
}

impl PermissionError {
    /// Records why the probe failed.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Probe failure detail, for diagnostics.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Checks whether host spawning is permitted.
pub trait PermissionChecker {
    /// Succeeds when the Flatpak portal is reachable.
    ///
    /// # Errors
    ///
    /// Returns a [`PermissionError`] when the probe fails for any reason.
    fn check(&self) -> Result<(), PermissionError>;
}

impl<P: PermissionChecker + ?Sized> PermissionChecker for &P {
    fn check(&self) -> Result<(), PermissionError> {
        (**self).check()
    }
}

/// Pings the Flatpak portal over the session bus with `gdbus`.
#[derive(Debug, Clone)]
pub struct SessionBusProbe {
    program: PathBuf,
}

impl SessionBusProbe {
    /// Uses `program` instead of `gdbus` from the search path.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SessionBusProbe {
    fn default() -> Self {
        Self::with_program("gdbus")
    }
}

impl PermissionChecker for SessionBusProbe {
    fn check(&self) -> Result<(), PermissionError> {
        debug!(
            target: PERMISSION_TARGET,
            program = %self.program.display(),
            "probing Flatpak portal"
        );
        let status = Command::new(&self.program)
            .args(PING_ARGS)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| PermissionError::new(err.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(PermissionError::new(format!("probe exited with {status}")))
        }
    }
}
