// tests/windowed_runner.rs

mod common;
use crate::common::builders::RunnerSectionBuilder;
use crate::common::fake_terminal::{FakeScript, FakeTerminalLauncher, MissingTerminalLauncher};
use crate::common::{init_tracing, with_timeout, TestResult};

use std::path::Path;
use std::sync::{Arc, Mutex};

use termrun::config::RunnerSection;
use termrun::exec::{CommandInvocation, CommandRunner, TerminalLauncher};
use termrun::fs::mock::MockFileSystem;
use termrun::fs::FileSystem;
use termrun::types::{FAILURE_EXIT_CODE, Platform, StrategyKind, StrategyPreference};

const TERMINAL_APP: &str = "/Applications/Utilities/Terminal.app";

fn mac_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_dir(TERMINAL_APP);
    fs
}

fn runner_with(
    settings: RunnerSection,
    fs: &MockFileSystem,
    launcher: Arc<dyn TerminalLauncher>,
) -> CommandRunner {
    CommandRunner::with_parts(settings, Platform::Unix, Arc::new(fs.clone()), launcher)
}

fn settings() -> RunnerSection {
    RunnerSectionBuilder::new().terminal_app(TERMINAL_APP).build()
}

#[test]
fn terminal_bundle_selects_windowed_strategy() {
    let launcher = Arc::new(MissingTerminalLauncher);

    let with_app = runner_with(settings(), &mac_fs(), launcher.clone());
    assert_eq!(with_app.strategy(), StrategyKind::Windowed);

    let without_app = runner_with(settings(), &MockFileSystem::new(), launcher);
    assert_eq!(without_app.strategy(), StrategyKind::Direct);
}

#[tokio::test]
async fn sentinel_with_clean_log_reports_success() -> TestResult {
    init_tracing();
    let fs = mac_fs();
    let launcher = Arc::new(FakeTerminalLauncher::new(
        fs.clone(),
        FakeScript::Completes {
            log: "BUILD SUCCESSFUL in 12s\n".to_string(),
        },
    ));
    let runner = runner_with(settings(), &fs, launcher.clone());

    let inv = CommandInvocation::new("gradle build").in_dir("/work/Game");
    let code = with_timeout(runner.run(inv)).await?;

    assert_eq!(code, 0);
    assert!(launcher.was_killed(), "still-running terminal should be killed");

    let launched = launcher.launched();
    assert_eq!(launched.len(), 1);
    let (script_path, script) = &launched[0];
    assert_eq!(script_path, Path::new("./tools/BashCommand.sh"));
    assert!(script.contains("cd '/work/Game'\n"));
    assert!(script.contains("gradle build 2>&1 | tee './tools/ProcessLog.out'\n"));

    // Script and sentinel are cleaned up; the log stays for inspection.
    assert!(!fs.exists(Path::new("./tools/BashCommand.sh")));
    assert!(!fs.exists(Path::new("./tools/ProcessCompleted.out")));
    assert!(fs.is_file(Path::new("./tools/ProcessLog.out")));
    Ok(())
}

#[tokio::test]
async fn each_failure_keyword_reports_minus_one() -> TestResult {
    init_tracing();
    for log in [
        "Task :app:compile Failed",
        "BUILD FAILED",
        "ERROR: SDK location not found",
        "error: cannot find symbol",
    ] {
        let fs = mac_fs();
        let launcher = Arc::new(FakeTerminalLauncher::new(
            fs.clone(),
            FakeScript::LogsOnly {
                log: log.to_string(),
            },
        ));
        let runner = runner_with(settings(), &fs, launcher.clone());

        let code = with_timeout(runner.run(CommandInvocation::new("gradle build"))).await?;
        assert_eq!(code, FAILURE_EXIT_CODE, "log: {log}");
        assert!(launcher.was_killed());
    }
    Ok(())
}

#[tokio::test]
async fn keyword_wins_over_sentinel() -> TestResult {
    let fs = mac_fs();
    let launcher = Arc::new(FakeTerminalLauncher::new(
        fs.clone(),
        FakeScript::Completes {
            log: "BUILD FAILED in 2s\n".to_string(),
        },
    ));
    let runner = runner_with(settings(), &fs, launcher);

    let code = with_timeout(runner.run(CommandInvocation::new("gradle build"))).await?;
    assert_eq!(code, FAILURE_EXIT_CODE);
    Ok(())
}

#[tokio::test]
async fn stale_files_from_previous_run_are_ignored() -> TestResult {
    let fs = mac_fs();
    fs.add_file("./tools/ProcessLog.out", b"BUILD FAILED".to_vec());
    fs.add_file("./tools/ProcessCompleted.out", b"done".to_vec());

    // This run never finishes on its own, so a stale sentinel or log would
    // be the only way to stop before the timeout.
    let launcher = Arc::new(FakeTerminalLauncher::new(fs.clone(), FakeScript::Hangs));
    let runner = runner_with(
        RunnerSectionBuilder::new()
            .terminal_app(TERMINAL_APP)
            .timeout_secs(1)
            .build(),
        &fs,
        launcher.clone(),
    );

    let started = std::time::Instant::now();
    let code = with_timeout(runner.run(CommandInvocation::new("sleep 100"))).await?;

    assert_eq!(code, FAILURE_EXIT_CODE);
    assert!(started.elapsed() >= std::time::Duration::from_secs(1));
    assert!(launcher.was_killed());
    Ok(())
}

#[tokio::test]
async fn terminal_exiting_without_sentinel_is_failure() -> TestResult {
    let fs = mac_fs();
    let launcher = Arc::new(FakeTerminalLauncher::new(fs.clone(), FakeScript::ExitsEarly(0)));
    let runner = runner_with(settings(), &fs, launcher.clone());

    let code = with_timeout(runner.run(CommandInvocation::new("gradle build"))).await?;
    assert_eq!(code, FAILURE_EXIT_CODE);
    assert!(!launcher.was_killed());
    Ok(())
}

#[tokio::test]
async fn launch_failure_reaches_callback_as_minus_one() {
    let fs = mac_fs();
    let runner = runner_with(settings(), &fs, Arc::new(MissingTerminalLauncher));

    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    runner
        .run_with_callback(CommandInvocation::new("gradle build"), move |code| {
            sink.lock().unwrap().push(code);
        })
        .await;

    assert_eq!(*calls.lock().unwrap(), vec![FAILURE_EXIT_CODE]);
    // The script is removed even though the terminal never started.
    assert!(!fs.exists(Path::new("./tools/BashCommand.sh")));
}

#[tokio::test]
async fn forced_windowed_runs_without_terminal_bundle() -> TestResult {
    let fs = MockFileSystem::new();
    let launcher = Arc::new(FakeTerminalLauncher::new(
        fs.clone(),
        FakeScript::Completes { log: String::new() },
    ));
    let runner = runner_with(
        RunnerSectionBuilder::new()
            .strategy(StrategyPreference::Windowed)
            .build(),
        &fs,
        launcher.clone(),
    );

    assert_eq!(runner.strategy(), StrategyKind::Windowed);
    let code = with_timeout(runner.run(CommandInvocation::new("make"))).await?;
    assert_eq!(code, 0);
    assert_eq!(launcher.launched().len(), 1);
    Ok(())
}

#[tokio::test]
async fn keyword_in_non_utf8_log_reports_minus_one() -> TestResult {
    let fs = MockFileSystem::new();
    let launcher = Arc::new(FakeTerminalLauncher::new(
        fs.clone(),
        FakeScript::CompletesRaw {
            log: b"Compiling caf\xe9.java\nBUILD FAILED in 3s\n".to_vec(),
        },
    ));
    let runner = runner_with(
        RunnerSectionBuilder::new()
            .strategy(StrategyPreference::Windowed)
            .build(),
        &fs,
        launcher,
    );

    let code = with_timeout(runner.run(CommandInvocation::new("gradle build"))).await?;
    assert_eq!(code, FAILURE_EXIT_CODE);
    Ok(())
}

#[tokio::test]
async fn terminal_that_exits_after_sentinel_reports_its_own_code() -> TestResult {
    let fs = mac_fs();
    let launcher = Arc::new(FakeTerminalLauncher::new(
        fs.clone(),
        FakeScript::CompletesAndExits {
            log: "BUILD SUCCESSFUL\n".to_string(),
            code: 5,
        },
    ));
    let runner = runner_with(settings(), &fs, launcher.clone());

    let code = with_timeout(runner.run(CommandInvocation::new("gradle build"))).await?;
    assert_eq!(code, 5);
    assert!(!launcher.was_killed());
    Ok(())
}
