use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use termrun::exec::windowed::ScratchPaths;
use termrun::exec::{TerminalLauncher, TerminalSession};
use termrun::fs::mock::MockFileSystem;
use termrun::fs::FileSystem;

/// What the fake terminal "does" with the script it is given.
#[derive(Debug, Clone)]
pub enum FakeScript {
    /// Writes the log and the sentinel, then keeps the window open.
    Completes { log: String },
    /// Like `Completes`, but the log is raw bytes (e.g. not valid UTF-8).
    CompletesRaw { log: Vec<u8> },
    /// Writes the log and the sentinel, then the terminal exits with `code`.
    CompletesAndExits { log: String, code: i32 },
    /// Writes the log but never the sentinel.
    LogsOnly { log: String },
    /// Writes nothing and never exits.
    Hangs,
    /// The terminal process itself exits with this code, writing nothing.
    ExitsEarly(i32),
}

/// A fake terminal launcher that:
/// - records the script it was asked to run (path and contents)
/// - writes log/sentinel files into a shared `MockFileSystem`
/// - tracks whether the session was killed.
pub struct FakeTerminalLauncher {
    fs: MockFileSystem,
    script: FakeScript,
    launched: Arc<Mutex<Vec<(PathBuf, String)>>>,
    killed: Arc<AtomicBool>,
}

impl FakeTerminalLauncher {
    pub fn new(fs: MockFileSystem, script: FakeScript) -> Self {
        Self {
            fs,
            script,
            launched: Arc::new(Mutex::new(Vec::new())),
            killed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Scripts seen so far, as `(path, contents at launch time)`.
    pub fn launched(&self) -> Vec<(PathBuf, String)> {
        self.launched.lock().unwrap().clone()
    }

    pub fn was_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }
}

impl TerminalLauncher for FakeTerminalLauncher {
    fn launch(&self, _terminal: &Path, script: &Path) -> Result<Box<dyn TerminalSession>> {
        let contents = self.fs.read_to_string(script)?;
        self.launched
            .lock()
            .unwrap()
            .push((script.to_path_buf(), contents));

        let dir = script.parent().unwrap_or(Path::new("."));
        let paths = ScratchPaths::in_dir(dir);

        let exit = match &self.script {
            FakeScript::Completes { log } => {
                self.fs.add_file(&paths.log, log.as_bytes().to_vec());
                self.fs.add_file(&paths.sentinel, b"done\n".to_vec());
                None
            }
            FakeScript::CompletesRaw { log } => {
                self.fs.add_file(&paths.log, log.clone());
                self.fs.add_file(&paths.sentinel, b"done\n".to_vec());
                None
            }
            FakeScript::CompletesAndExits { log, code } => {
                self.fs.add_file(&paths.log, log.as_bytes().to_vec());
                self.fs.add_file(&paths.sentinel, b"done\n".to_vec());
                Some(*code)
            }
            FakeScript::LogsOnly { log } => {
                self.fs.add_file(&paths.log, log.as_bytes().to_vec());
                None
            }
            FakeScript::Hangs => None,
            FakeScript::ExitsEarly(code) => Some(*code),
        };

        Ok(Box::new(FakeSession {
            exit,
            killed: Arc::clone(&self.killed),
        }))
    }
}

struct FakeSession {
    exit: Option<i32>,
    killed: Arc<AtomicBool>,
}

impl TerminalSession for FakeSession {
    fn try_exit_code(&mut self) -> Result<Option<i32>> {
        Ok(self.exit)
    }

    fn kill(&mut self) -> Result<()> {
        self.killed.store(true, Ordering::SeqCst);
        self.exit = Some(-9);
        Ok(())
    }
}

/// A launcher whose terminal binary can never be started.
pub struct MissingTerminalLauncher;

impl TerminalLauncher for MissingTerminalLauncher {
    fn launch(&self, terminal: &Path, _script: &Path) -> Result<Box<dyn TerminalSession>> {
        Err(anyhow!("terminal {:?} not found", terminal))
    }
}
