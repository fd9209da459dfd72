// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::StrategyPreference;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [runner]
/// strategy = "auto"
/// data_dir = "/Users/me/Project/Assets"
/// poll_interval_ms = 5000
/// timeout_secs = 3600
/// failure_keywords = ["Failed", "FAILED", "ERROR", "error"]
///
/// [build]
/// gradle_cmd = "gradle build"
/// ```
///
/// All sections are optional and have reasonable defaults. This is the
/// unvalidated form; use [`ConfigFile`] everywhere else.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub runner: RunnerSection,

    #[serde(default)]
    pub build: BuildSection,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`)
/// or [`ConfigFile::default`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub runner: RunnerSection,
    pub build: BuildSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(runner: RunnerSection, build: BuildSection) -> Self {
        Self { runner, build }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RunnerSection::default(), BuildSection::default())
    }
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    /// `"auto"`, `"direct"` or `"windowed"`.
    #[serde(default)]
    pub strategy: StrategyPreference,

    /// Application data directory that holds the scratch files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Sub-directory of `data_dir` where script, log and sentinel live.
    #[serde(default = "default_tools_subdir")]
    pub tools_subdir: PathBuf,

    /// How often the windowed strategy checks for completion.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Upper bound on the windowed polling loop. `0` disables the bound.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Case-sensitive substrings that mark the log as failed.
    #[serde(default = "default_failure_keywords")]
    pub failure_keywords: Vec<String>,

    /// If any of these directories exists, a terminal application is
    /// considered installed.
    #[serde(default = "default_terminal_app_paths")]
    pub terminal_app_paths: Vec<PathBuf>,

    /// Executable launched with the generated script as its argument.
    #[serde(default = "default_terminal_binary")]
    pub terminal_binary: PathBuf,
}

impl RunnerSection {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.data_dir.join(&self.tools_subdir)
    }

    /// The terminal application bundle that the generated script activates.
    ///
    /// First configured app path, used only for the `osascript` line.
    pub fn terminal_app(&self) -> Option<&Path> {
        self.terminal_app_paths.first().map(PathBuf::as_path)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_tools_subdir() -> PathBuf {
    PathBuf::from("AppcoinsUnity/Tools")
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_timeout_secs() -> u64 {
    3_600
}

fn default_failure_keywords() -> Vec<String> {
    ["Failed", "FAILED", "ERROR", "error"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_terminal_app_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/Applications/Utilities/Terminal.app"),
        PathBuf::from("/Applications/Terminal.app"),
    ]
}

fn default_terminal_binary() -> PathBuf {
    PathBuf::from("/Applications/Utilities/Terminal.app/Contents/MacOS/Terminal")
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            strategy: StrategyPreference::default(),
            data_dir: default_data_dir(),
            tools_subdir: default_tools_subdir(),
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_timeout_secs(),
            failure_keywords: default_failure_keywords(),
            terminal_app_paths: default_terminal_app_paths(),
            terminal_binary: default_terminal_binary(),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Command run inside the exported project directory.
    #[serde(default = "default_gradle_cmd")]
    pub gradle_cmd: String,
}

fn default_gradle_cmd() -> String {
    "gradle build".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            gradle_cmd: default_gradle_cmd(),
        }
    }
}
