use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::process::{run_command, ProcessError, RunLimits, RunOutput};

/// Read-only filesystem predicates.
pub trait FileSystemProbe: Send + Sync {
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
}

/// Resolves bare command names against the process search path.
pub trait PathLookup: Send + Sync {
    fn which(&self, command: &str) -> Option<PathBuf>;
}

/// One-shot subprocess execution.
pub trait ProcessRunner: Send + Sync {
    /// Runs `program` to completion and captures its output.
    ///
    /// # Errors
    /// Returns an error when the program cannot be started, its output cannot
    /// be captured, or it outlives `limits`.
    fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
        limits: &RunLimits,
    ) -> Result<RunOutput, ProcessError>;
}

pub trait Effects: Send + Sync {
    fn fs(&self) -> &dyn FileSystemProbe;
    fn lookup(&self) -> &dyn PathLookup;
    fn process(&self) -> &dyn ProcessRunner;
}

pub type SharedEffects = Arc<dyn Effects>;

pub struct SystemEffects {
    fs: Arc<SystemFileSystem>,
    lookup: Arc<SystemPathLookup>,
    process: Arc<SystemProcessRunner>,
}

impl SystemEffects {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fs: Arc::new(SystemFileSystem),
            lookup: Arc::new(SystemPathLookup),
            process: Arc::new(SystemProcessRunner),
        }
    }

    #[must_use]
    pub fn shared() -> SharedEffects {
        Arc::new(Self::new())
    }
}

impl Default for SystemEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects for SystemEffects {
    fn fs(&self) -> &dyn FileSystemProbe {
        self.fs.as_ref()
    }

    fn lookup(&self) -> &dyn PathLookup {
        self.lookup.as_ref()
    }

    fn process(&self) -> &dyn ProcessRunner {
        self.process.as_ref()
    }
}

#[derive(Default)]
pub(crate) struct SystemFileSystem;

impl FileSystemProbe for SystemFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok_and(|meta| meta.is_file())
    }

    fn is_dir(&self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok_and(|meta| meta.is_dir())
    }
}

struct SystemPathLookup;

impl PathLookup for SystemPathLookup {
    fn which(&self, command: &str) -> Option<PathBuf> {
        if command.is_empty() {
            return None;
        }
        which::which(command).ok()
    }
}

struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
        limits: &RunLimits,
    ) -> Result<RunOutput, ProcessError> {
        run_command(program, args, cwd, limits)
    }
}
