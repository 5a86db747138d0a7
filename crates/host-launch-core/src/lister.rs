//! Access to the host's shared-library cache through `ldconfig`.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

const LISTER_TARGET: &str = "host_launch_core::lister";

/// Arguments printing the cached libraries.
const CACHE_ARGS: &[&str] = &["-p"];
/// Arguments printing the scanned directories without rewriting the cache or
/// any links, so the listing works against a read-only runtime.
const DIRECTORY_ARGS: &[&str] = &["-v", "-N", "-X"];

/// Failures while running the shared-library cache lister.
#[derive(Debug, Clone, Error)]
pub enum ListerError {
    /// The lister could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was executed.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The lister exited unsuccessfully.
    #[error("{program} exited with status {status}")]
    NonZeroExit {
        /// Program that was executed.
        program: String,
        /// Exit code, or `-1` when terminated by a signal.
        status: i32,
    },
}

/// Source of the dynamic-linker registry listings.
///
/// The production implementation is [`LdconfigLister`]. Tests substitute
/// fixed listings.
pub trait LibraryCacheLister {
    /// Returns the cache listing (`ldconfig -p`).
    ///
    /// # Errors
    ///
    /// Returns a [`ListerError`] when the listing cannot be produced.
    fn cache_listing(&self) -> Result<String, ListerError>;

    /// Returns the verbose directory listing (`ldconfig -v`).
    ///
    /// # Errors
    ///
    /// Returns a [`ListerError`] when the listing cannot be produced.
    fn directory_listing(&self) -> Result<String, ListerError>;
}

impl<L: LibraryCacheLister + ?Sized> LibraryCacheLister for &L {
    fn cache_listing(&self) -> Result<String, ListerError> {
        (**self).cache_listing()
    }

    fn directory_listing(&self) -> Result<String, ListerError> {
        (**self).directory_listing()
    }
}

/// Runs the sandbox's `ldconfig` and captures its standard output.
#[derive(Debug, Clone)]
pub struct LdconfigLister {
    program: PathBuf,
}

impl LdconfigLister {
    /// Uses `program` instead of `ldconfig` from the search path.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, ListerError> {
        let program = self.program.display().to_string();
        debug!(target: LISTER_TARGET, %program, ?args, "listing shared-library cache");
        let output = Command::new(&self.program)
            .args(args.iter().map(OsString::from))
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| ListerError::Spawn {
                program: program.clone(),
                source: Arc::new(source),
            })?;
        if !output.status.success() {
            return Err(ListerError::NonZeroExit {
                program,
                status: output.status.code().unwrap_or(-1),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for LdconfigLister {
    fn default() -> Self {
        Self::with_program("ldconfig")
    }
}

impl LibraryCacheLister for LdconfigLister {
    fn cache_listing(&self) -> Result<String, ListerError> {
        self.run(CACHE_ARGS)
    }

    fn directory_listing(&self) -> Result<String, ListerError> {
        self.run(DIRECTORY_ARGS)
    }
}
