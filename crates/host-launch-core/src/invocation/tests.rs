//! Unit tests for command vector assembly.

use rstest::{fixture, rstest};

use super::*;
use crate::mounts::SandboxMounts;

#[fixture]
fn linker() -> LinkerInfo {
    LinkerInfo::new(
        String::from("/run/host/runtime/lib64/ld-linux-x86-64.so.2"),
        vec![
            String::from("/run/host/runtime/lib"),
            String::from("/run/host/app/lib"),
        ],
    )
}

fn assignment(raw: &str) -> EnvAssignment {
    raw.parse().expect("valid assignment")
}

#[rstest]
fn renders_segments_in_order(linker: LinkerInfo) {
    let mounts = SandboxMounts::new("/run/host/app", "/run/host/runtime");
    let invocation = InvocationBuilder::new(linker, "/run/host/app/bin/tool")
        .desktop_env([assignment("XDG_DATA_HOME=/d")])
        .runtime_env([assignment("PYTHONHOME=/run/host/runtime")])
        .user_env([assignment("FOO=bar")])
        .shebang(ShebangDirective::parse("#!/usr/bin/env python3", &mounts))
        .arguments(["--flag", "value"])
        .build();

    assert_eq!(
        invocation.argv(),
        [
            "flatpak-spawn",
            "--host",
            "env",
            "LD_LIBRARY_PATH=/run/host/runtime/lib:/run/host/app/lib",
            "XDG_DATA_HOME=/d",
            "PYTHONHOME=/run/host/runtime",
            "FOO=bar",
            "/run/host/runtime/lib64/ld-linux-x86-64.so.2",
            "--library-path",
            "/run/host/runtime/lib:/run/host/app/lib",
            "/run/host/runtime/bin/env",
            "python3",
            "/run/host/app/bin/tool",
            "--flag",
            "value",
        ]
    );
    assert_eq!(invocation.executable(), Some("/run/host/app/bin/tool"));
    assert_eq!(invocation.arguments(), ["--flag", "value"]);
}

#[rstest]
fn elevation_follows_spawn_wrapper(linker: LinkerInfo) {
    let invocation = InvocationBuilder::new(linker, "/run/host/app/bin/tool")
        .elevated(true)
        .build();
    assert_eq!(
        invocation.argv().get(..5),
        Some(
            [
                String::from("flatpak-spawn"),
                String::from("--host"),
                String::from("pkexec"),
                String::from("--disable-internal-agent"),
                String::from("env"),
            ]
            .as_slice()
        )
    );
}

#[rstest]
fn empty_shebang_places_executable_after_library_path(linker: LinkerInfo) {
    let invocation = InvocationBuilder::new(linker, "/run/host/app/bin/tool").build();
    let argv = invocation.argv();
    let position = argv
        .iter()
        .position(|arg| arg == LIBRARY_PATH_FLAG)
        .expect("library path flag present");
    assert_eq!(
        argv.get(position + 2).map(String::as_str),
        Some("/run/host/app/bin/tool")
    );
    assert!(invocation.arguments().is_empty());
}

#[test]
fn empty_library_list_renders_empty_path() {
    let linker = LinkerInfo::new(String::from("/lib/ld-linux.so.2"), Vec::new());
    let invocation = InvocationBuilder::new(linker, "/bin/tool").build();
    assert!(invocation.argv().iter().any(|arg| arg == "LD_LIBRARY_PATH="));
}

#[rstest]
fn arguments_pass_through_unmodified(linker: LinkerInfo) {
    let invocation = InvocationBuilder::new(linker, "/run/host/app/bin/tool")
        .arguments(["/app/share/file", "two words", "--"])
        .build();
    assert_eq!(
        invocation.arguments(),
        ["/app/share/file", "two words", "--"]
    );
}

#[rstest]
fn display_quotes_arguments_for_a_shell(linker: LinkerInfo) {
    let invocation = InvocationBuilder::new(linker, "/run/host/app/bin/tool")
        .arguments(["two words"])
        .build();
    let rendered = invocation.to_string();
    assert_eq!(
        shlex::split(&rendered).as_deref(),
        Some(invocation.argv())
    );
}
