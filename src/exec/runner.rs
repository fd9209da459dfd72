// src/exec/runner.rs

//! The command runner: picks a strategy per invocation and reports a single
//! exit code.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::RunnerSection;
use crate::errors::{Result, RunnerError};
use crate::exec::backend::{RealTerminalLauncher, TerminalLauncher};
use crate::exec::direct::run_direct;
use crate::exec::invocation::CommandInvocation;
use crate::exec::windowed::{run_windowed, WindowedOptions};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::{FAILURE_EXIT_CODE, Platform, StrategyKind, StrategyPreference};

/// Choose the strategy for one invocation.
///
/// - Windows always runs directly.
/// - Otherwise an explicit preference wins; `Auto` opens a window only when a
///   terminal application is installed.
pub fn select_strategy(
    preference: StrategyPreference,
    platform: Platform,
    terminal_present: bool,
) -> StrategyKind {
    match (platform, preference) {
        (Platform::Windows, StrategyPreference::Windowed) => {
            warn!("windowed strategy is not available on Windows; running directly");
            StrategyKind::Direct
        }
        (Platform::Windows, _) => StrategyKind::Direct,
        (Platform::Unix, StrategyPreference::Direct) => StrategyKind::Direct,
        (Platform::Unix, StrategyPreference::Windowed) => StrategyKind::Windowed,
        (Platform::Unix, StrategyPreference::Auto) if terminal_present => StrategyKind::Windowed,
        (Platform::Unix, StrategyPreference::Auto) => StrategyKind::Direct,
    }
}

/// Runs shell commands on behalf of build tooling.
///
/// Cheap to clone; clones share the scratch-file lock, so windowed runs
/// through any clone are serialized.
#[derive(Clone)]
pub struct CommandRunner {
    settings: RunnerSection,
    platform: Platform,
    fs: Arc<dyn FileSystem>,
    launcher: Arc<dyn TerminalLauncher>,
    scratch_lock: Arc<Mutex<()>>,
}

impl CommandRunner {
    /// Runner for the current host, using the real filesystem and terminal.
    pub fn new(settings: RunnerSection) -> Self {
        Self::with_parts(
            settings,
            Platform::current(),
            Arc::new(RealFileSystem),
            Arc::new(RealTerminalLauncher),
        )
    }

    pub fn with_parts(
        settings: RunnerSection,
        platform: Platform,
        fs: Arc<dyn FileSystem>,
        launcher: Arc<dyn TerminalLauncher>,
    ) -> Self {
        Self {
            settings,
            platform,
            fs,
            launcher,
            scratch_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn settings(&self) -> &RunnerSection {
        &self.settings
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Whether any configured terminal application bundle exists.
    pub fn terminal_present(&self) -> bool {
        self.settings
            .terminal_app_paths
            .iter()
            .any(|p| self.fs.is_dir(p))
    }

    pub fn strategy(&self) -> StrategyKind {
        select_strategy(
            self.settings.strategy,
            self.platform,
            self.platform == Platform::Unix && self.terminal_present(),
        )
    }

    /// Run the invocation and return its exit code.
    pub async fn run(&self, invocation: CommandInvocation) -> Result<i32> {
        if invocation.is_blank() {
            return Err(RunnerError::EmptyCommand);
        }

        let strategy = self.strategy();
        info!(cmd = %invocation.command, %strategy, "running command");

        match strategy {
            StrategyKind::Direct => {
                let out = run_direct(&invocation, self.platform).await?;
                Ok(out.exit_code)
            }
            StrategyKind::Windowed => {
                let opts = WindowedOptions::from_settings(&self.settings);
                let _guard = self.scratch_lock.lock().await;
                debug!("acquired scratch lock");
                run_windowed(&invocation, &opts, self.fs.as_ref(), self.launcher.as_ref()).await
            }
        }
    }

    /// Run the invocation and hand the exit code to `on_complete`.
    ///
    /// `on_complete` fires exactly once. Errors are logged and reported as
    /// [`FAILURE_EXIT_CODE`].
    pub async fn run_with_callback<F>(&self, invocation: CommandInvocation, on_complete: F)
    where
        F: FnOnce(i32),
    {
        let command = invocation.command.clone();
        let code = match self.run(invocation).await {
            Ok(code) => code,
            Err(err) => {
                error!(cmd = %command, error = %err, "command execution error");
                FAILURE_EXIT_CODE
            }
        };
        on_complete(code);
    }
}

impl std::fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRunner")
            .field("settings", &self.settings)
            .field("platform", &self.platform)
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}
