// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, RunnerError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::RunnerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.runner, raw.build))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_polling(cfg)?;
    validate_failure_keywords(cfg)?;
    validate_build(cfg)?;
    Ok(())
}

fn validate_polling(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runner.poll_interval_ms == 0 {
        return Err(RunnerError::ConfigError(
            "[runner].poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_failure_keywords(cfg: &RawConfigFile) -> Result<()> {
    let keywords = &cfg.runner.failure_keywords;
    if keywords.is_empty() {
        return Err(RunnerError::ConfigError(
            "[runner].failure_keywords must contain at least one keyword".to_string(),
        ));
    }
    // An empty keyword matches every log, so every run would be a failure.
    if let Some(idx) = keywords.iter().position(|k| k.is_empty()) {
        return Err(RunnerError::ConfigError(format!(
            "[runner].failure_keywords[{idx}] is empty"
        )));
    }
    Ok(())
}

fn validate_build(cfg: &RawConfigFile) -> Result<()> {
    if cfg.build.gradle_cmd.trim().is_empty() {
        return Err(RunnerError::ConfigError(
            "[build].gradle_cmd must not be empty".to_string(),
        ));
    }
    Ok(())
}
