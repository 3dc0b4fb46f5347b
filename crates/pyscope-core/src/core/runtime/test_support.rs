//! In-memory collaborators for unit tests.
//!
//! Filesystem probes hit the real disk (tests build fixtures in temp dirs)
//! and are recorded; search-path lookups and subprocesses are scripted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::effects::{Effects, FileSystemProbe, PathLookup, ProcessRunner, SharedEffects, SystemFileSystem};
use super::process::{ProcessError, RunLimits, RunOutput};

#[derive(Default)]
pub(crate) struct RecordingFileSystem {
    inner: SystemFileSystem,
    probed: Mutex<Vec<PathBuf>>,
}

impl RecordingFileSystem {
    fn record(&self, path: &Path) {
        if let Ok(mut probed) = self.probed.lock() {
            probed.push(path.to_path_buf());
        }
    }
}

impl FileSystemProbe for RecordingFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.record(path);
        self.inner.is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.record(path);
        self.inner.is_dir(path)
    }
}

#[derive(Default)]
pub(crate) struct FakeLookup {
    commands: HashMap<String, PathBuf>,
}

impl PathLookup for FakeLookup {
    fn which(&self, command: &str) -> Option<PathBuf> {
        self.commands.get(command).cloned()
    }
}

#[derive(Default)]
pub(crate) struct FakeRunner {
    replies: HashMap<(PathBuf, Vec<String>), RunOutput>,
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl ProcessRunner for FakeRunner {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        _cwd: &Path,
        _limits: &RunLimits,
    ) -> Result<RunOutput, ProcessError> {
        let key = (program.to_path_buf(), args.to_vec());
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }
        self.replies
            .get(&key)
            .cloned()
            .ok_or_else(|| ProcessError::Spawn {
                program: program.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no scripted reply"),
            })
    }
}

pub(crate) struct FakeEffects {
    fs: RecordingFileSystem,
    lookup: FakeLookup,
    runner: FakeRunner,
}

impl FakeEffects {
    pub(crate) fn new() -> Self {
        Self {
            fs: RecordingFileSystem::default(),
            lookup: FakeLookup::default(),
            runner: FakeRunner::default(),
        }
    }

    pub(crate) fn with_command(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.lookup.commands.insert(name.to_string(), path.into());
        self
    }

    pub(crate) fn with_output(
        mut self,
        program: impl Into<PathBuf>,
        args: &[&str],
        code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        let key = (
            program.into(),
            args.iter().map(ToString::to_string).collect::<Vec<_>>(),
        );
        self.runner.replies.insert(
            key,
            RunOutput {
                code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub(crate) fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.runner
            .calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Every path handed to the filesystem probe, in order.
    pub(crate) fn probed_paths(&self) -> Vec<PathBuf> {
        self.fs
            .probed
            .lock()
            .map(|probed| probed.clone())
            .unwrap_or_default()
    }

    pub(crate) fn shared(self) -> SharedEffects {
        Arc::new(self)
    }
}

impl Effects for FakeEffects {
    fn fs(&self) -> &dyn FileSystemProbe {
        &self.fs
    }

    fn lookup(&self) -> &dyn PathLookup {
        &self.lookup
    }

    fn process(&self) -> &dyn ProcessRunner {
        &self.runner
    }
}

pub(crate) fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, "").expect("write fixture file");
}
