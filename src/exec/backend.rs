// src/exec/backend.rs

//! Pluggable terminal launcher abstraction.
//!
//! The windowed strategy talks to a `TerminalLauncher` instead of spawning
//! the terminal application itself. Production code uses
//! [`RealTerminalLauncher`]; tests can provide a launcher that, for example,
//! writes the log and sentinel files into a mock filesystem.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};

use crate::types::FAILURE_EXIT_CODE;

/// Starts a terminal application that executes a script.
pub trait TerminalLauncher: Send + Sync {
    /// Launch `terminal` with `script` as its only argument.
    fn launch(&self, terminal: &Path, script: &Path) -> Result<Box<dyn TerminalSession>>;
}

/// Handle on a launched terminal process.
pub trait TerminalSession: Send {
    /// `Some(code)` once the terminal process has exited, `None` while it runs.
    fn try_exit_code(&mut self) -> Result<Option<i32>>;

    /// Ask the terminal process to stop. Does not wait.
    fn kill(&mut self) -> Result<()>;
}

/// Real launcher used in production, backed by `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct RealTerminalLauncher;

impl TerminalLauncher for RealTerminalLauncher {
    fn launch(&self, terminal: &Path, script: &Path) -> Result<Box<dyn TerminalSession>> {
        let mut cmd = Command::new(terminal);
        cmd.arg(script)
            .current_dir("/")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .with_context(|| format!("launching terminal {:?}", terminal))?;

        Ok(Box::new(ChildSession { child }))
    }
}

struct ChildSession {
    child: Child,
}

impl TerminalSession for ChildSession {
    fn try_exit_code(&mut self) -> Result<Option<i32>> {
        let status = self
            .child
            .try_wait()
            .context("polling terminal process")?;
        Ok(status.map(|s| s.code().unwrap_or(FAILURE_EXIT_CODE)))
    }

    fn kill(&mut self) -> Result<()> {
        self.child
            .start_kill()
            .context("killing terminal process")
    }
}
