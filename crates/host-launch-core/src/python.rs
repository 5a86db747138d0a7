//! Detection of the runtime's Python version.

use std::fs;
use std::path::Path;

/// Sandbox directory holding the runtime's `pythonX.Y` library trees.
pub const RUNTIME_LIBRARY_ROOT: &str = "/usr/lib";

/// Returns the highest `major.minor` among `pythonX.Y` directories in
/// `library_root`, or `None` when there are none or the directory is
/// unreadable.
#[must_use]
pub fn detect_python_version(library_root: &Path) -> Option<String> {
    let entries = fs::read_dir(library_root).ok()?;
    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| parse_version(&entry.file_name().to_string_lossy()))
        .max()
        .map(|(major, minor)| format!("{major}.{minor}"))
}

fn parse_version(name: &str) -> Option<(u32, u32)> {
    let (major, minor) = name.strip_prefix("python")?.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case("python3.12", Some((3, 12)))]
    #[case("python2.7", Some((2, 7)))]
    #[case("python3", None)]
    #[case("python3.12t", None)]
    #[case("perl5", None)]
    fn parses_directory_names(#[case] name: &str, #[case] expected: Option<(u32, u32)>) {
        assert_eq!(parse_version(name), expected);
    }

    #[test]
    fn picks_highest_version_numerically() {
        let temp_dir = TempDir::new().expect("create temp dir");
        for name in ["python3.9", "python3.11", "python2.7", "pkgconfig"] {
            fs::create_dir(temp_dir.path().join(name)).expect("create dir");
        }
        fs::write(temp_dir.path().join("python3.99"), "not a dir").expect("write file");

        assert_eq!(
            detect_python_version(temp_dir.path()),
            Some(String::from("3.11"))
        );
    }

    #[test]
    fn missing_root_yields_none() {
        assert_eq!(detect_python_version(Path::new("/definitely/missing")), None);
    }
}
