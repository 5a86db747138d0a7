//! Runner tests with substituted collaborators.

use std::cell::RefCell;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use host_launch_config::{Config, UnsetVariablePolicy};
use host_launch_core::{
    DesktopVariables, HostInvocation, HostSpawner, InvocationBuilder, LaunchEnvironment,
    LaunchError, LaunchRequest, LinkerInfo, SpawnError,
};
use mockall::mock;
use rstest::{fixture, rstest};

use crate::config::ConfigLoader;
use crate::environment::Ambient;
use crate::{AppError, CliRunner, IoStreams, LaunchPlanner, exit_code_from_status};

mock! {
    Planner {}
    impl LaunchPlanner for Planner {
        fn prepare(
            &self,
            request: &LaunchRequest,
            environment: &LaunchEnvironment,
            ambient: &Ambient,
        ) -> Result<HostInvocation, LaunchError>;
    }
}

mock! {
    Spawner {}
    impl HostSpawner for Spawner {
        fn spawn(
            &self,
            invocation: &HostInvocation,
            working_directory: &Path,
        ) -> Result<i32, SpawnError>;
    }
}

/// Returns a fixed configuration and records the arguments it was given.
#[derive(Default)]
struct RecordingLoader {
    config: Config,
    seen: RefCell<Vec<OsString>>,
}

impl ConfigLoader for RecordingLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        self.seen.borrow_mut().extend(args.iter().cloned());
        Ok(self.config.clone())
    }
}

#[fixture]
fn ambient() -> Ambient {
    Ambient {
        search_path: None,
        cwd: PathBuf::from("/"),
        home: Some(PathBuf::from("/home/user")),
        desktop: DesktopVariables::new(Some(String::from("/data")), None, None),
        runtime_library_root: PathBuf::from("/definitely/missing"),
    }
}

fn planned() -> HostInvocation {
    InvocationBuilder::new(
        LinkerInfo::new(String::from("/run/host/runtime/lib/ld-linux.so.2"), Vec::new()),
        "/run/host/app/bin/ls",
    )
    .arguments(["-la"])
    .build()
}

fn args(tokens: &[&str]) -> Vec<OsString> {
    std::iter::once("flatpak-host-launch")
        .chain(tokens.iter().copied())
        .map(OsString::from)
        .collect()
}

struct Outcome {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

fn drive(
    loader: &RecordingLoader,
    planner: &MockPlanner,
    spawner: &MockSpawner,
    ambient: Ambient,
    tokens: &[&str],
) -> Outcome {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut io = IoStreams::new(&mut stdout, &mut stderr);
    let exit = CliRunner::new(loader, planner, spawner, ambient).run(args(tokens), &mut io);
    Outcome {
        exit,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
    }
}

#[rstest]
fn host_exit_status_is_mirrored(ambient: Ambient) {
    let loader = RecordingLoader::default();
    let mut planner = MockPlanner::new();
    planner
        .expect_prepare()
        .withf(|request, environment, _| {
            request.command() == ["ls", "-la"]
                && request.is_elevated()
                && environment.sandbox_info().as_str() == "/.flatpak-info"
        })
        .times(1)
        .returning(|_, _, _| Ok(planned()));
    let mut spawner = MockSpawner::new();
    spawner
        .expect_spawn()
        .withf(|invocation, working_directory| {
            invocation.executable() == Some("/run/host/app/bin/ls")
                && working_directory == Path::new("/home/user/src")
        })
        .times(1)
        .returning(|_, _| Ok(7));

    let outcome = drive(
        &loader,
        &planner,
        &spawner,
        ambient,
        &["--pkexec", "--working-directory", "~/src", "ls", "-la"],
    );

    assert_eq!(outcome.exit, ExitCode::from(7));
    assert!(outcome.stderr.is_empty());
}

#[rstest]
fn configuration_flags_reach_the_loader_only(ambient: Ambient) {
    let loader = RecordingLoader {
        config: Config {
            unset_env_policy: UnsetVariablePolicy::Omit,
            python_version: Some(String::from("3.12")),
            ..Config::default()
        },
        ..RecordingLoader::default()
    };
    let mut planner = MockPlanner::new();
    planner
        .expect_prepare()
        .withf(|request, _, _| request.command() == ["ls", "--log-filter", "debug"])
        .returning(|_, _, _| Ok(planned()));
    let mut spawner = MockSpawner::new();
    spawner.expect_spawn().returning(|_, _| Ok(0));

    let outcome = drive(
        &loader,
        &planner,
        &spawner,
        ambient,
        &["--log-filter", "debug", "ls", "--log-filter", "debug"],
    );

    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert_eq!(*loader.seen.borrow(), args(&["--log-filter", "debug"]));
}

#[rstest]
fn launch_errors_are_reported_without_spawning(ambient: Ambient) {
    let loader = RecordingLoader::default();
    let mut planner = MockPlanner::new();
    planner.expect_prepare().returning(|_, _, _| {
        Err(LaunchError::ExecutableNotFound {
            name: String::from("nope"),
        })
    });
    let mut spawner = MockSpawner::new();
    spawner.expect_spawn().times(0);

    let outcome = drive(&loader, &planner, &spawner, ambient, &["nope"]);

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert_eq!(outcome.stderr, "nope was not found\n");
}

#[rstest]
fn spawn_failures_are_reported(ambient: Ambient) {
    let loader = RecordingLoader::default();
    let mut planner = MockPlanner::new();
    planner.expect_prepare().returning(|_, _, _| Ok(planned()));
    let mut spawner = MockSpawner::new();
    spawner.expect_spawn().returning(|_, _| Err(SpawnError::Empty));

    let outcome = drive(&loader, &planner, &spawner, ambient, &["ls"]);

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("empty"));
}

#[rstest]
fn missing_command_is_a_usage_error(ambient: Ambient) {
    let loader = RecordingLoader::default();
    let mut planner = MockPlanner::new();
    planner.expect_prepare().times(0);
    let spawner = MockSpawner::new();

    let outcome = drive(&loader, &planner, &spawner, ambient, &["--pkexec"]);

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("Usage"));
    assert!(outcome.stderr.ends_with('\n'));
    assert!(!outcome.stderr.ends_with("\n\n"));
    assert!(loader.seen.borrow().is_empty());
}

#[rstest]
fn help_is_written_to_stdout(ambient: Ambient) {
    let loader = RecordingLoader::default();
    let planner = MockPlanner::new();
    let spawner = MockSpawner::new();

    let outcome = drive(&loader, &planner, &spawner, ambient, &["--help"]);

    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("--working-directory"));
    assert!(outcome.stderr.is_empty());
}

#[rstest]
fn launch_environment_follows_configuration(ambient: Ambient) {
    let loader = RecordingLoader {
        config: Config {
            unset_env_policy: UnsetVariablePolicy::Empty,
            python_version: Some(String::from("3.10")),
            ..Config::default()
        },
        ..RecordingLoader::default()
    };
    let runner_planner = MockPlanner::new();
    let spawner = MockSpawner::new();
    let runner = CliRunner::new(&loader, &runner_planner, &spawner, ambient);

    let environment = runner.launch_environment(&loader.config);

    let expected = LaunchEnvironment::new("/.flatpak-info")
        .with_desktop(DesktopVariables::new(Some(String::from("/data")), None, None))
        .with_python_version(Some(String::from("3.10")))
        .with_unset_policy(UnsetVariablePolicy::Empty);
    assert_eq!(environment, expected);
}

#[rstest]
#[case(0, ExitCode::SUCCESS)]
#[case(7, ExitCode::from(7))]
#[case(255, ExitCode::from(255))]
#[case(256, ExitCode::FAILURE)]
#[case(-1, ExitCode::FAILURE)]
fn exit_codes_are_clamped(#[case] status: i32, #[case] expected: ExitCode) {
    assert_eq!(exit_code_from_status(status), expected);
}
