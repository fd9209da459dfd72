use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Exit code reported when a failure is detected without a real process
/// exit code (failure keyword in the log, timeout, spawn error, signal).
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Which execution strategy the user asked for.
///
/// - `Auto`: pick based on platform and whether a terminal application is
///   installed (default behaviour).
/// - `Direct`: always spawn the shell without a window.
/// - `Windowed`: always open a terminal window. Ignored on Windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyPreference {
    Auto,
    Direct,
    Windowed,
}

impl Default for StrategyPreference {
    fn default() -> Self {
        StrategyPreference::Auto
    }
}

impl FromStr for StrategyPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(StrategyPreference::Auto),
            "direct" => Ok(StrategyPreference::Direct),
            "windowed" => Ok(StrategyPreference::Windowed),
            other => Err(format!(
                "invalid strategy: {other} (expected \"auto\", \"direct\" or \"windowed\")"
            )),
        }
    }
}

/// The strategy actually used for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Spawn the shell directly, capture output, read the real exit code.
    Direct,
    /// Open a terminal window and infer completion from scratch files.
    Windowed,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Direct => f.write_str("direct"),
            StrategyKind::Windowed => f.write_str("windowed"),
        }
    }
}

/// Host shell dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_preference_parses() {
        assert_eq!("Windowed".parse(), Ok(StrategyPreference::Windowed));
        assert_eq!(" auto".parse(), Ok(StrategyPreference::Auto));
        assert!("gui".parse::<StrategyPreference>().is_err());
    }
}
