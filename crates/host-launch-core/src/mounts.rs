//! Sandbox mount metadata and the sandbox-to-host path mapping.

use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use glib::{KeyFile, KeyFileError, KeyFileFlags};

use crate::error::MetadataError;

/// Sandbox prefix under which the application's files are mounted.
pub const APP_PREFIX: &str = "/app";
/// Sandbox prefix under which the runtime's files are mounted.
pub const RUNTIME_PREFIX: &str = "/usr";

const INSTANCE_SECTION: &str = "Instance";
const APP_PATH_KEY: &str = "app-path";
const RUNTIME_PATH_KEY: &str = "runtime-path";

/// Host locations that mirror the sandbox's `/app` and `/usr` trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxMounts {
    app_path: Utf8PathBuf,
    runtime_path: Utf8PathBuf,
}

impl SandboxMounts {
    /// Creates mounts from explicit host paths.
    #[must_use]
    pub fn new(app_path: impl Into<Utf8PathBuf>, runtime_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            app_path: app_path.into(),
            runtime_path: runtime_path.into(),
        }
    }

    /// Reads the mounts from the instance metadata file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Read`] when the file cannot be read,
    /// [`MetadataError::Parse`] when it is not a key file, and
    /// [`MetadataError::MissingSection`] or [`MetadataError::MissingKey`] when
    /// it does not describe a running instance.
    pub fn load(path: &Utf8Path) -> Result<Self, MetadataError> {
        let contents = fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        Self::from_metadata(path, &contents)
    }

    /// Parses the mounts from metadata text previously read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Parse`] when the text is not a key file, and
    /// otherwise the errors listed on [`SandboxMounts::load`].
    pub fn from_metadata(path: &Utf8Path, contents: &str) -> Result<Self, MetadataError> {
        let file = KeyFile::new();
        file.load_from_data(contents, KeyFileFlags::NONE)
            .map_err(|source| MetadataError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            app_path: instance_value(&file, path, APP_PATH_KEY)?,
            runtime_path: instance_value(&file, path, RUNTIME_PATH_KEY)?,
        })
    }

    /// Host directory mirroring `/app`.
    #[must_use]
    pub fn app_path(&self) -> &Utf8Path {
        &self.app_path
    }

    /// Host directory mirroring `/usr`.
    #[must_use]
    pub fn runtime_path(&self) -> &Utf8Path {
        &self.runtime_path
    }

    /// Maps a sandbox path onto the host.
    ///
    /// `/app` and `/usr` (and anything beneath them) are rebased onto the
    /// application and runtime mounts. Prefixes only match whole path
    /// components, so `/application` is left alone. Every other input is
    /// already host-visible and is returned unchanged.
    #[must_use]
    pub fn to_host_path(&self, path: &str) -> String {
        rebase(path, APP_PREFIX, &self.app_path)
            .or_else(|| rebase(path, RUNTIME_PREFIX, &self.runtime_path))
            .unwrap_or_else(|| path.to_owned())
    }
}

fn instance_value(
    file: &KeyFile,
    path: &Utf8Path,
    key: &'static str,
) -> Result<Utf8PathBuf, MetadataError> {
    let missing_key = || MetadataError::MissingKey {
        path: path.to_path_buf(),
        section: INSTANCE_SECTION,
        key,
    };
    match file.string(INSTANCE_SECTION, key) {
        Ok(value) if value.is_empty() => Err(missing_key()),
        Ok(value) => Ok(Utf8PathBuf::from(value.as_str())),
        Err(source) => Err(match source.kind::<KeyFileError>() {
            Some(KeyFileError::GroupNotFound) => MetadataError::MissingSection {
                path: path.to_path_buf(),
                section: INSTANCE_SECTION,
            },
            Some(KeyFileError::KeyNotFound) => missing_key(),
            _ => MetadataError::Parse {
                path: path.to_path_buf(),
                source,
            },
        }),
    }
}

fn rebase(path: &str, prefix: &str, host_root: &Utf8Path) -> Option<String> {
    let remainder = path.strip_prefix(prefix)?;
    if !(remainder.is_empty() || remainder.starts_with('/')) {
        return None;
    }
    let root = host_root.as_str().trim_end_matches('/');
    let rebased = format!("{root}{remainder}");
    if rebased.is_empty() {
        return Some(String::from("/"));
    }
    Some(rebased)
}
