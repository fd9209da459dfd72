// src/lib.rs

pub mod build;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::{load_or_default, ConfigFile};
use crate::exec::{CommandInvocation, CommandRunner};
use crate::fs::RealFileSystem;
use crate::types::{FAILURE_EXIT_CODE, StrategyPreference};

/// High-level entry point used by `main.rs`.
///
/// Loads config, applies CLI overrides and runs the selected subcommand.
/// Returns the exit code of the command that was run (`0` for `--dry-run`).
/// Failures while running the command are reported as
/// [`FAILURE_EXIT_CODE`]; only config and setup problems are `Err`.
pub async fn run(args: CliArgs) -> Result<i32> {
    let mut cfg = load_or_default(&args.config)?;

    match args.command {
        Command::Run {
            workdir,
            strategy,
            cmd,
        } => {
            apply_strategy_override(&mut cfg, strategy);
            let mut invocation = CommandInvocation::new(cmd.join(" "));
            if let Some(dir) = workdir {
                invocation = invocation.in_dir(dir);
            }

            let runner = CommandRunner::new(cfg.runner.clone());
            if args.dry_run {
                print_dry_run(&runner, &invocation);
                return Ok(0);
            }

            Ok(run_reporting(&runner, invocation).await)
        }

        Command::GradleBuild {
            project_dir,
            export_dir,
            product_name,
            strategy,
        } => {
            apply_strategy_override(&mut cfg, strategy);
            let runner = CommandRunner::new(cfg.runner.clone());

            if args.dry_run {
                if let (Some(export_dir), Some(name)) = (&export_dir, &product_name) {
                    println!("would clear {}", export_dir.join(name).display());
                }
                let invocation = build::gradle_invocation(&project_dir, &cfg.build.gradle_cmd);
                print_dry_run(&runner, &invocation);
                return Ok(0);
            }

            if let (Some(export_dir), Some(name)) = (export_dir, product_name) {
                build::clear_product_folder(&RealFileSystem, &export_dir, &name)?;
            }
            info!(project = %project_dir.display(), "starting gradle build");
            let invocation = build::gradle_invocation(&project_dir, &cfg.build.gradle_cmd);
            Ok(run_reporting(&runner, invocation).await)
        }
    }
}

/// Run through the callback path so every runner error becomes
/// [`FAILURE_EXIT_CODE`].
async fn run_reporting(runner: &CommandRunner, invocation: CommandInvocation) -> i32 {
    let mut exit_code = FAILURE_EXIT_CODE;
    runner
        .run_with_callback(invocation, |code| exit_code = code)
        .await;
    exit_code
}

fn apply_strategy_override(cfg: &mut ConfigFile, strategy: Option<StrategyPreference>) {
    if let Some(strategy) = strategy {
        debug!(?strategy, "strategy overridden on the command line");
        cfg.runner.strategy = strategy;
    }
}

/// Simple dry-run output: strategy, command and scratch files.
fn print_dry_run(runner: &CommandRunner, invocation: &CommandInvocation) {
    let settings = runner.settings();

    println!("termrun dry-run");
    println!("  platform = {:?}", runner.platform());
    println!("  strategy = {}", runner.strategy());
    println!("  cmd      = {}", invocation.command);
    if let Some(dir) = invocation.working_dir() {
        println!("  workdir  = {}", dir.display());
    }
    println!("  scratch  = {}", settings.scratch_dir().display());
    println!("  poll     = {:?}", settings.poll_interval());
    match settings.timeout() {
        Some(t) => println!("  timeout  = {:?}", t),
        None => println!("  timeout  = none"),
    }

    debug!("dry-run complete (no execution)");
}
