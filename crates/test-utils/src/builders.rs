#![allow(dead_code)]

use std::path::PathBuf;

use termrun::config::{ConfigFile, RawConfigFile, RunnerSection};
use termrun::types::StrategyPreference;

/// Builder for `RunnerSection` with test-friendly defaults:
/// scratch files under `./tools`, 10ms polling, no timeout.
pub struct RunnerSectionBuilder {
    section: RunnerSection,
}

impl RunnerSectionBuilder {
    pub fn new() -> Self {
        let mut section = RunnerSection::default();
        section.data_dir = PathBuf::from(".");
        section.tools_subdir = PathBuf::from("tools");
        section.poll_interval_ms = 10;
        section.timeout_secs = 0;
        Self { section }
    }

    pub fn strategy(mut self, strategy: StrategyPreference) -> Self {
        self.section.strategy = strategy;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.section.timeout_secs = secs;
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.section.poll_interval_ms = ms;
        self
    }

    pub fn failure_keywords(mut self, keywords: &[&str]) -> Self {
        self.section.failure_keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn terminal_app(mut self, path: &str) -> Self {
        self.section.terminal_app_paths = vec![PathBuf::from(path)];
        self
    }

    pub fn build(self) -> RunnerSection {
        self.section
    }

    /// Wrap into a validated `ConfigFile`.
    pub fn build_config(self) -> ConfigFile {
        let raw = RawConfigFile {
            runner: self.section,
            ..RawConfigFile::default()
        };
        ConfigFile::try_from(raw).expect("Failed to build valid config from builder")
    }
}

impl Default for RunnerSectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
