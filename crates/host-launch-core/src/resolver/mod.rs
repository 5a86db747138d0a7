//! Sandbox-to-host path resolution and dynamic-linker discovery.
//!
//! [`PathResolver`] pairs the [`SandboxMounts`] read from the instance
//! metadata with a [`LibraryCacheLister`]. Discovery degrades rather than
//! aborting: a missing or failing lister surfaces as
//! [`LaunchError::LinkerNotFound`] for the linker lookup and as an empty
//! directory list for the search-path lookup.

use camino::Utf8Path;
use tracing::{debug, warn};

use crate::error::LaunchError;
use crate::linker::{LINKER_NAME_PREFIX, LinkerInfo, parse_directory_headers, parse_linker_entry};
use crate::lister::LibraryCacheLister;
use crate::mounts::SandboxMounts;

const RESOLVER_TARGET: &str = "host_launch_core::resolver";

/// Produces host-visible paths and enumerates the host linker environment.
#[derive(Debug, Clone)]
pub struct PathResolver<L> {
    mounts: SandboxMounts,
    lister: L,
}

impl<L> PathResolver<L> {
    /// Creates a resolver from already-loaded mounts.
    #[must_use]
    pub const fn new(mounts: SandboxMounts, lister: L) -> Self {
        Self { mounts, lister }
    }

    /// Reads the sandbox instance metadata at `metadata` and builds a
    /// resolver from it.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::NotSandboxed`] when the metadata is absent or
    /// lacks the mount keys.
    pub fn initialize(metadata: &Utf8Path, lister: L) -> Result<Self, LaunchError> {
        let mounts = SandboxMounts::load(metadata)?;
        debug!(
            target: RESOLVER_TARGET,
            app_path = %mounts.app_path(),
            runtime_path = %mounts.runtime_path(),
            "loaded sandbox mounts"
        );
        Ok(Self::new(mounts, lister))
    }

    /// Mounts backing the path mapping.
    #[must_use]
    pub const fn mounts(&self) -> &SandboxMounts {
        &self.mounts
    }

    /// Maps a sandbox path onto the host. See [`SandboxMounts::to_host_path`].
    #[must_use]
    pub fn to_host_path(&self, path: &str) -> String {
        self.mounts.to_host_path(path)
    }
}

impl<L: LibraryCacheLister> PathResolver<L> {
    /// Returns the host path of the dynamic linker.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::LinkerNotFound`] when the cache cannot be
    /// listed or holds no `ld-linux` entry.
    pub fn linker_path(&self) -> Result<String, LaunchError> {
        let listing = self
            .lister
            .cache_listing()
            .map_err(|error| LaunchError::LinkerNotFound {
                reason: error.to_string(),
            })?;
        let entry = parse_linker_entry(&listing).ok_or_else(|| LaunchError::LinkerNotFound {
            reason: format!("no {LINKER_NAME_PREFIX} entry in the library cache"),
        })?;
        let linker = self.to_host_path(entry);
        debug!(target: RESOLVER_TARGET, %linker, "resolved dynamic linker");
        Ok(linker)
    }

    /// Returns the host library directories in the order the lister reports
    /// them. An unavailable lister yields an empty list.
    #[must_use]
    pub fn library_directories(&self) -> Vec<String> {
        let listing = match self.lister.directory_listing() {
            Ok(listing) => listing,
            Err(error) => {
                warn!(
                    target: RESOLVER_TARGET,
                    %error,
                    "library directories unavailable; continuing with an empty search path"
                );
                return Vec::new();
            }
        };
        let directories: Vec<String> = parse_directory_headers(&listing)
            .into_iter()
            .map(|directory| self.to_host_path(directory))
            .collect();
        debug!(
            target: RESOLVER_TARGET,
            count = directories.len(),
            "resolved library directories"
        );
        directories
    }

    /// Discovers the linker together with its library directories.
    ///
    /// # Errors
    ///
    /// Propagates [`PathResolver::linker_path`] failures.
    pub fn discover_linker(&self) -> Result<LinkerInfo, LaunchError> {
        let linker = self.linker_path()?;
        Ok(LinkerInfo::new(linker, self.library_directories()))
    }
}
