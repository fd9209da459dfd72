// src/exec/direct.rs

//! Direct strategy: spawn the shell without a window, capture its output in
//! memory and wait for the real exit code.

use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{Result, RunnerError};
use crate::exec::invocation::CommandInvocation;
use crate::exec::quoting::to_cmd_quoting;
use crate::types::{FAILURE_EXIT_CODE, Platform};

const UNIX_SHELL: &str = "/bin/bash";
const WINDOWS_SHELL: &str = "cmd.exe";

/// Captured result of a direct run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Build a shell command appropriate for the platform.
pub fn shell_command(platform: Platform, command: &str) -> Command {
    match platform {
        Platform::Unix => {
            let mut c = Command::new(UNIX_SHELL);
            c.arg("-c").arg(command);
            c
        }
        Platform::Windows => {
            let mut c = Command::new(WINDOWS_SHELL);
            push_cmd_args(&mut c, &to_cmd_quoting(command));
            c
        }
    }
}

// cmd.exe parses its own command line, so the translated command is passed
// through verbatim instead of being re-quoted by the standard library.
#[cfg(windows)]
fn push_cmd_args(c: &mut Command, translated: &str) {
    c.raw_arg("/c").raw_arg(translated);
}

#[cfg(not(windows))]
fn push_cmd_args(c: &mut Command, translated: &str) {
    c.arg("/c").arg(translated);
}

fn shell_program(platform: Platform) -> &'static str {
    match platform {
        Platform::Unix => UNIX_SHELL,
        Platform::Windows => WINDOWS_SHELL,
    }
}

/// Run the invocation and wait for it to exit.
pub async fn run_direct(invocation: &CommandInvocation, platform: Platform) -> Result<DirectOutput> {
    info!(
        cmd = %invocation.command,
        workdir = ?invocation.working_dir,
        "starting direct process"
    );

    let mut cmd = shell_command(platform, &invocation.command);
    if let Some(dir) = invocation.working_dir() {
        // Otherwise the spawn error blames the shell, not the directory.
        match tokio::fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(RunnerError::WorkingDirNotFound(dir.to_path_buf())),
        }
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|source| RunnerError::Spawn {
        program: shell_program(platform).to_string(),
        source,
    })?;

    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("waiting for process of command '{}'", invocation.command))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    for line in stdout.lines() {
        debug!("stdout: {}", line);
    }
    for line in stderr.lines() {
        debug!("stderr: {}", line);
    }

    let exit_code = output.status.code().unwrap_or(FAILURE_EXIT_CODE);
    info!(
        exit_code,
        success = output.status.success(),
        "direct process exited"
    );

    Ok(DirectOutput {
        exit_code,
        stdout,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args_of(cmd: &Command) -> Vec<&OsStr> {
        cmd.as_std().get_args().collect()
    }

    #[test]
    fn windows_command_line_uses_cmd_quoting() {
        let cmd = shell_command(Platform::Windows, "cd 'C:\\My Game' && echo \"hi\"");

        assert_eq!(cmd.as_std().get_program(), OsStr::new("cmd.exe"));
        assert_eq!(
            args_of(&cmd),
            vec![OsStr::new("/c"), OsStr::new("cd \"C:\\My Game\" && echo hi")]
        );
    }

    #[test]
    fn unix_command_line_passes_command_verbatim() {
        let cmd = shell_command(Platform::Unix, "cd 'My Game' && gradle build");

        assert_eq!(cmd.as_std().get_program(), OsStr::new("/bin/bash"));
        assert_eq!(
            args_of(&cmd),
            vec![OsStr::new("-c"), OsStr::new("cd 'My Game' && gradle build")]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn reports_true_exit_code() {
        let out = run_direct(&CommandInvocation::new("exit 3"), Platform::Unix)
            .await
            .unwrap();
        assert_eq!(out.exit_code, 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_stdout_and_stderr() {
        let out = run_direct(
            &CommandInvocation::new("echo out; echo err 1>&2"),
            Platform::Unix,
        )
        .await
        .unwrap();

        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_inside_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker"), b"x").unwrap();

        let inv = CommandInvocation::new("test -f marker").in_dir(dir.path());
        let out = run_direct(&inv, Platform::Unix).await.unwrap();
        assert_eq!(out.exit_code, 0);
    }

    #[tokio::test]
    async fn missing_working_dir_names_the_directory() {
        let inv = CommandInvocation::new("true").in_dir("/definitely/not/here");
        let err = run_direct(&inv, Platform::current()).await.unwrap_err();

        assert!(matches!(err, RunnerError::WorkingDirNotFound(_)));
        assert!(err.to_string().contains("/definitely/not/here"));
    }

    #[tokio::test]
    async fn file_as_working_dir_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let inv = CommandInvocation::new("true").in_dir(file.path());
        let err = run_direct(&inv, Platform::current()).await.unwrap_err();
        assert!(matches!(err, RunnerError::WorkingDirNotFound(_)));
    }
}
