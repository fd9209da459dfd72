// src/exec/windowed.rs

//! Windowed strategy: run the command in a visible terminal window.
//!
//! The terminal gives us no exit-code channel for the command itself, so
//! completion is inferred from scratch files:
//! - a generated script runs the command, tees its combined output into a
//!   log file and writes a sentinel file when done;
//! - we poll for the sentinel, or for a failure keyword in the log.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::RunnerSection;
use crate::errors::Result;
use crate::exec::backend::{TerminalLauncher, TerminalSession};
use crate::exec::invocation::CommandInvocation;
use crate::exec::quoting::sh_single_quote;
use crate::fs::{remove_if_exists, FileSystem};
use crate::types::FAILURE_EXIT_CODE;

const SCRIPT_FILE: &str = "BashCommand.sh";
const LOG_FILE: &str = "ProcessLog.out";
const SENTINEL_FILE: &str = "ProcessCompleted.out";

/// Fixed-path scratch files shared by every windowed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchPaths {
    pub script: PathBuf,
    pub log: PathBuf,
    pub sentinel: PathBuf,
}

impl ScratchPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            script: dir.join(SCRIPT_FILE),
            log: dir.join(LOG_FILE),
            sentinel: dir.join(SENTINEL_FILE),
        }
    }
}

/// Knobs for one windowed run, resolved from `[runner]`.
#[derive(Debug, Clone)]
pub struct WindowedOptions {
    pub paths: ScratchPaths,
    pub terminal_binary: PathBuf,
    pub terminal_app: Option<PathBuf>,
    pub poll_interval: Duration,
    pub timeout: Option<Duration>,
    pub failure_keywords: Vec<String>,
}

impl WindowedOptions {
    pub fn from_settings(settings: &RunnerSection) -> Self {
        Self {
            paths: ScratchPaths::in_dir(settings.scratch_dir()),
            terminal_binary: settings.terminal_binary.clone(),
            terminal_app: settings.terminal_app().map(Path::to_path_buf),
            poll_interval: settings.poll_interval(),
            timeout: settings.timeout(),
            failure_keywords: settings.failure_keywords.clone(),
        }
    }
}

/// Why the polling loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Sentinel present and the log is clean.
    Completed,
    /// The log contains this failure keyword.
    FailureKeyword(String),
    /// The terminal exited without the sentinel ever appearing.
    TerminalExited(i32),
    TimedOut,
}

/// Return the first keyword (in configured order) that occurs in `log`.
pub fn scan_for_failure<'k>(log: &str, keywords: &'k [String]) -> Option<&'k str> {
    keywords
        .iter()
        .map(String::as_str)
        .find(|k| !k.is_empty() && log.contains(k))
}

/// Render the shell script the terminal executes.
pub fn render_script(
    command: &str,
    working_dir: Option<&Path>,
    terminal_app: Option<&Path>,
    paths: &ScratchPaths,
) -> String {
    let mut script = String::from("#!/bin/sh\n");

    // Bring the terminal to the foreground.
    if let Some(app) = terminal_app {
        let activate = format!("activate application \"{}\"", app.display());
        script.push_str(&format!("osascript -e {}\n", sh_single_quote(&activate)));
    }
    if let Some(dir) = working_dir {
        script.push_str(&format!("cd {}\n", sh_single_quote(&dir.to_string_lossy())));
    }
    script.push_str(&format!(
        "{} 2>&1 | tee {}\n",
        command,
        sh_single_quote(&paths.log.to_string_lossy())
    ));
    script.push_str(&format!(
        "echo 'done' > {}\n",
        sh_single_quote(&paths.sentinel.to_string_lossy())
    ));
    script.push_str("exit\n");
    script
}

/// Write the script and clear out files left behind by a previous run.
pub fn prepare_scratch(
    fs: &dyn FileSystem,
    invocation: &CommandInvocation,
    opts: &WindowedOptions,
) -> Result<()> {
    remove_if_exists(fs, &opts.paths.sentinel)?;
    // A stale log would make the first poll see the previous run's errors.
    remove_if_exists(fs, &opts.paths.log)?;

    let script = render_script(
        &invocation.command,
        invocation.working_dir(),
        opts.terminal_app.as_deref(),
        &opts.paths,
    );
    fs.write(&opts.paths.script, script.as_bytes())?;
    fs.set_executable(&opts.paths.script)?;
    debug!(script = %opts.paths.script.display(), "wrote terminal script");
    Ok(())
}

fn check_log(fs: &dyn FileSystem, opts: &WindowedOptions) -> Option<String> {
    // The log only appears once the command prints something.
    if !fs.is_file(&opts.paths.log) {
        return None;
    }
    // Build tools print non-UTF-8 paths and names; a strict read would hide
    // every keyword in such a log.
    match fs.read(&opts.paths.log) {
        Ok(bytes) => {
            let log = String::from_utf8_lossy(&bytes);
            scan_for_failure(&log, &opts.failure_keywords).map(str::to_string)
        }
        Err(e) => {
            debug!(error = %e, "could not read process log yet");
            None
        }
    }
}

/// Poll until the sentinel appears, a failure keyword shows up in the log,
/// the terminal dies, or the timeout elapses.
pub async fn poll_for_completion(
    fs: &dyn FileSystem,
    session: &mut dyn TerminalSession,
    opts: &WindowedOptions,
) -> Result<PollOutcome> {
    let started = Instant::now();

    loop {
        // Read the exit state first so a sentinel written right before the
        // terminal exits is still seen below.
        let exited = session.try_exit_code()?;

        if let Some(keyword) = check_log(fs, opts) {
            return Ok(PollOutcome::FailureKeyword(keyword));
        }
        if fs.is_file(&opts.paths.sentinel) {
            return Ok(PollOutcome::Completed);
        }
        if let Some(code) = exited {
            return Ok(PollOutcome::TerminalExited(code));
        }
        if let Some(limit) = opts.timeout {
            if started.elapsed() >= limit {
                return Ok(PollOutcome::TimedOut);
            }
        }

        tokio::time::sleep(opts.poll_interval).await;
    }
}

/// Map the poll outcome to an exit code, killing the terminal if it is
/// still running.
fn finish(session: &mut dyn TerminalSession, outcome: &PollOutcome) -> Result<i32> {
    let exited = session.try_exit_code()?;
    if exited.is_none() {
        debug!("terminal still running; killing it");
        if let Err(e) = session.kill() {
            warn!(error = %e, "failed to kill terminal process");
        }
    }

    let code = match outcome {
        PollOutcome::Completed => exited.unwrap_or(0),
        PollOutcome::FailureKeyword(keyword) => {
            warn!(%keyword, "failure keyword found in process log");
            FAILURE_EXIT_CODE
        }
        PollOutcome::TerminalExited(code) => {
            warn!(
                terminal_exit_code = code,
                "terminal exited before the command signalled completion"
            );
            FAILURE_EXIT_CODE
        }
        PollOutcome::TimedOut => {
            warn!("timed out waiting for the command to complete");
            FAILURE_EXIT_CODE
        }
    };
    Ok(code)
}

/// Run the invocation in a terminal window and infer its result.
///
/// Callers must serialize windowed runs that share scratch paths.
pub async fn run_windowed(
    invocation: &CommandInvocation,
    opts: &WindowedOptions,
    fs: &dyn FileSystem,
    launcher: &dyn TerminalLauncher,
) -> Result<i32> {
    info!(
        cmd = %invocation.command,
        workdir = ?invocation.working_dir,
        terminal = %opts.terminal_binary.display(),
        "starting windowed process"
    );

    prepare_scratch(fs, invocation, opts)?;

    let result = launch_and_wait(opts, fs, launcher).await;

    for path in [&opts.paths.script, &opts.paths.sentinel] {
        if let Err(e) = remove_if_exists(fs, path) {
            warn!(path = %path.display(), error = %e, "failed to remove scratch file");
        }
    }

    result
}

async fn launch_and_wait(
    opts: &WindowedOptions,
    fs: &dyn FileSystem,
    launcher: &dyn TerminalLauncher,
) -> Result<i32> {
    let mut session = launcher.launch(&opts.terminal_binary, &opts.paths.script)?;
    let outcome = poll_for_completion(fs, session.as_mut(), opts).await?;
    let code = finish(session.as_mut(), &outcome)?;
    info!(exit_code = code, ?outcome, "windowed process finished");
    Ok(code)
}
