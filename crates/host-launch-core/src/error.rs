//! Domain errors raised while planning a host launch.
//!
//! Every variant is terminal for the launcher: the CLI reports the message on
//! stderr and exits with status 1. I/O errors are wrapped in `Arc` to keep the
//! enums cheap to clone into test doubles.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::permission::PermissionError;

/// Failures while reading the sandbox instance metadata.
#[derive(Debug, Clone, Error)]
pub enum MetadataError {
    /// The metadata file could not be read, usually because it does not exist.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Metadata path that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The metadata is not a well-formed key file.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Metadata path.
        path: Utf8PathBuf,
        /// Key-file parser error.
        #[source]
        source: glib::Error,
    },

    /// The metadata lacks the section describing the running instance.
    #[error("{path} has no [{section}] section")]
    MissingSection {
        /// Metadata path.
        path: Utf8PathBuf,
        /// Section that was expected.
        section: &'static str,
    },

    /// The instance section lacks one of the mount keys.
    #[error("{path} does not define {key} in [{section}]")]
    MissingKey {
        /// Metadata path.
        path: Utf8PathBuf,
        /// Section that was searched.
        section: &'static str,
        /// Key that was expected.
        key: &'static str,
    },
}

/// Errors raised while turning a request into a host invocation.
#[derive(Debug, Clone, Error)]
pub enum LaunchError {
    /// The process is not running inside the expected sandbox.
    #[error("flatpak-host-launch needs to be executed inside a Flatpak ({0})")]
    NotSandboxed(#[from] MetadataError),

    /// The sandbox lacks the capability to spawn host processes.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionError),

    /// The requested command does not resolve within the sandbox search path.
    #[error("{name} was not found")]
    ExecutableNotFound {
        /// Command name as supplied by the caller.
        name: String,
    },

    /// The host dynamic linker could not be discovered.
    #[error("could not locate the host dynamic linker: {reason}")]
    LinkerNotFound {
        /// Description of what the discovery step observed.
        reason: String,
    },

    /// The request named no command at all.
    #[error("no command was given")]
    EmptyCommand,
}
