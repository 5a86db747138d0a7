//! Parsing of `ldconfig` listings and the discovered linker environment.

/// Library-name prefix shared by the glibc dynamic linkers.
pub(crate) const LINKER_NAME_PREFIX: &str = "ld-linux";

const CACHE_ENTRY_SEPARATOR: &str = " => ";

/// The host dynamic linker and the directories it should search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkerInfo {
    linker: String,
    library_dirs: Vec<String>,
}

impl LinkerInfo {
    /// Creates linker information from host-visible paths.
    #[must_use]
    pub const fn new(linker: String, library_dirs: Vec<String>) -> Self {
        Self {
            linker,
            library_dirs,
        }
    }

    /// Host path of the dynamic linker executable.
    #[must_use]
    pub fn linker(&self) -> &str {
        &self.linker
    }

    /// Library directories in search order.
    #[must_use]
    pub fn library_dirs(&self) -> &[String] {
        &self.library_dirs
    }

    /// Library directories joined into a `:`-separated search path.
    #[must_use]
    pub fn library_path(&self) -> String {
        self.library_dirs.join(":")
    }
}

/// Finds the linker path recorded in `ldconfig -p` output.
///
/// Cache lines look like
/// `\tld-linux-x86-64.so.2 (libc6,x86-64) => /lib64/ld-linux-x86-64.so.2`.
/// The first entry whose library name starts with `ld-linux` and carries a
/// target path wins.
pub(crate) fn parse_linker_entry(listing: &str) -> Option<&str> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(LINKER_NAME_PREFIX))
        .filter_map(|line| line.split_once(CACHE_ENTRY_SEPARATOR))
        .map(|(_, target)| target.trim())
        .find(|target| !target.is_empty())
}

/// Extracts directory headers from `ldconfig -v` output.
///
/// Header lines start at column zero (`/usr/lib:` or
/// `/usr/lib/x86_64-linux-gnu: (from /etc/ld.so.conf.d/...)`), while the
/// libraries found in each directory follow as tab-indented lines. The
/// directories are returned in the order they first appear.
pub(crate) fn parse_directory_headers(listing: &str) -> Vec<&str> {
    let mut directories: Vec<&str> = Vec::new();
    for line in listing.lines() {
        if line.starts_with('\t') {
            continue;
        }
        let directory = line.split_once(':').map_or(line, |(head, _)| head).trim();
        if !directory.starts_with('/') || directories.contains(&directory) {
            continue;
        }
        directories.push(directory);
    }
    directories
}
