// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::StrategyPreference;

/// Command-line arguments for `termrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "termrun",
    version,
    about = "Run build commands directly or in a terminal window and report the exit code.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// A missing file means defaults are used.
    #[arg(long, value_name = "PATH", default_value = "termrun.toml", global = true)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TERMRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Print what would be run, but don't execute anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a shell command and exit with its exit code.
    Run {
        /// Directory to run the command in.
        #[arg(long, value_name = "DIR")]
        workdir: Option<PathBuf>,

        /// Override `[runner].strategy`.
        #[arg(long, value_enum, value_name = "STRATEGY")]
        strategy: Option<StrategyPreference>,

        /// The command; words are joined with spaces.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        cmd: Vec<String>,
    },

    /// Clear a previous export (optional) and run the gradle build.
    GradleBuild {
        /// Exported Android project to build.
        #[arg(long, value_name = "DIR")]
        project_dir: PathBuf,

        /// Folder that holds exported projects.
        #[arg(long, value_name = "DIR", requires = "product_name")]
        export_dir: Option<PathBuf>,

        /// Name of the exported project folder to clear inside `--export-dir`.
        #[arg(long, value_name = "NAME", requires = "export_dir")]
        product_name: Option<String>,

        /// Override `[runner].strategy`.
        #[arg(long, value_enum, value_name = "STRATEGY")]
        strategy: Option<StrategyPreference>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The matching `EnvFilter` directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_collects_trailing_words() {
        let args = CliArgs::try_parse_from([
            "termrun", "run", "--workdir", "/tmp", "--", "gradle", "build", "--info",
        ])
        .unwrap();

        match args.command {
            Command::Run { workdir, cmd, strategy } => {
                assert_eq!(workdir, Some(PathBuf::from("/tmp")));
                assert_eq!(cmd, vec!["gradle", "build", "--info"]);
                assert_eq!(strategy, None);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn export_dir_requires_product_name() {
        let res = CliArgs::try_parse_from([
            "termrun",
            "gradle-build",
            "--project-dir",
            "out/Game",
            "--export-dir",
            "out",
        ]);
        assert!(res.is_err());
    }
}
