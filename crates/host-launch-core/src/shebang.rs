//! Interpreter directive (`#!`) inspection.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::mounts::SandboxMounts;

const SHEBANG_TARGET: &str = "host_launch_core::shebang";

/// Marker introducing an interpreter directive.
pub const INTERPRETER_MARKER: &str = "#!";

/// Upper bound on the bytes inspected for the first line.
const FIRST_LINE_LIMIT: u64 = 4096;

/// Interpreter tokens from an executable's first line.
///
/// The first token is already host-translated, since interpreters such as
/// `/usr/bin/python3` live under sandbox-mapped prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShebangDirective {
    tokens: Vec<String>,
}

impl ShebangDirective {
    /// Parses a first line, translating the interpreter through `mounts`.
    ///
    /// Lines without the marker, and lines whose quoting cannot be split,
    /// produce an empty directive.
    #[must_use]
    pub fn parse(first_line: &str, mounts: &SandboxMounts) -> Self {
        let Some(directive) = first_line.strip_prefix(INTERPRETER_MARKER) else {
            return Self::default();
        };
        let Some(mut tokens) = shlex::split(directive) else {
            debug!(target: SHEBANG_TARGET, line = first_line, "unbalanced quoting in directive");
            return Self::default();
        };
        if let Some(interpreter) = tokens.first_mut() {
            *interpreter = mounts.to_host_path(interpreter);
        }
        Self { tokens }
    }

    /// Directive tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Returns true when the executable carries no directive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Consumes the directive, yielding its tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

/// Reads the directive of the executable at `path`.
///
/// Compiled executables have no textual first line, so every read failure
/// (missing file, permissions, invalid UTF-8) yields an empty directive.
#[must_use]
pub fn read_shebang(path: &Path, mounts: &SandboxMounts) -> ShebangDirective {
    match read_first_line(path) {
        Ok(line) => ShebangDirective::parse(&line, mounts),
        Err(error) => {
            debug!(
                target: SHEBANG_TARGET,
                path = %path.display(),
                %error,
                "no textual first line; treating as directive-free"
            );
            ShebangDirective::default()
        }
    }
}

fn read_first_line(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file.take(FIRST_LINE_LIMIT));
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line)
}
