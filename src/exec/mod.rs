// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] owns [`CommandRunner`], which picks a strategy per call.
//! - [`direct`] spawns the shell without a window using
//!   `tokio::process::Command` and reads the real exit code.
//! - [`windowed`] runs the command in a terminal window and infers the
//!   result from scratch files.
//! - [`backend`] provides the `TerminalLauncher` trait and the
//!   `RealTerminalLauncher` used in production, which tests can replace.
//! - [`quoting`] converts between POSIX and cmd.exe quoting.

pub mod backend;
pub mod direct;
pub mod invocation;
pub mod quoting;
pub mod runner;
pub mod windowed;

pub use backend::{RealTerminalLauncher, TerminalLauncher, TerminalSession};
pub use invocation::CommandInvocation;
pub use runner::{select_strategy, CommandRunner};
