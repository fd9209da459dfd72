// src/exec/invocation.rs

use std::path::{Path, PathBuf};

/// One command to run: the shell command string plus an optional working
/// directory. Built per call and consumed by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: String,
    pub working_dir: Option<PathBuf>,
}

impl CommandInvocation {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            working_dir: None,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn is_blank(&self) -> bool {
        self.command.trim().is_empty()
    }
}
