//! Crate-level integration and BDD tests.

use std::collections::HashMap;

use camino::Utf8PathBuf;

use crate::error::LaunchError;
use crate::lister::{LibraryCacheLister, ListerError};
use crate::lookup::ExecutableLocator;
use crate::permission::{PermissionChecker, PermissionError};


/// Fixed `ldconfig` output for a typical x86-64 runtime.
struct StubLister;

impl LibraryCacheLister for StubLister {
    fn cache_listing(&self) -> Result<String, ListerError> {
        Ok(String::from(
            "\tld-linux-x86-64.so.2 (libc6,x86-64) => /usr/lib/x86_64-linux-gnu/ld-linux-x86-64.so.2\n",
        ))
    }

    fn directory_listing(&self) -> Result<String, ListerError> {
        Ok(String::from(
            "/app/lib:\n\tlibapp.so -> libapp.so.1\n/usr/lib/x86_64-linux-gnu:\n",
        ))
    }
}

/// Permission probe with a fixed answer.
struct StubPermission {
    granted: bool,
}

impl PermissionChecker for StubPermission {
    fn check(&self) -> Result<(), PermissionError> {
        if self.granted {
            Ok(())
        } else {
            Err(PermissionError::new("stubbed denial"))
        }
    }
}

/// Locator backed by a fixed name-to-path table.
#[derive(Default)]
struct TableLocator {
    entries: HashMap<String, Utf8PathBuf>,
}

impl ExecutableLocator for TableLocator {
    fn locate(&self, name: &str) -> Result<Utf8PathBuf, LaunchError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| LaunchError::ExecutableNotFound {
                name: name.to_owned(),
            })
    }
}
