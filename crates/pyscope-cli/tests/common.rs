#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use assert_cmd::{assert::Assert, cargo::cargo_bin_cmd, Command};
use serde_json::Value;
use tempfile::TempDir;

const SCRUBBED_ENV: [&str; 8] = [
    "VIRTUAL_ENV",
    "CONDA_PREFIX",
    "PYSCOPE_CONFIG",
    "PYSCOPE_PYTHON",
    "PYSCOPE_ENABLE_VENV",
    "PYSCOPE_AUTO_DETECT_VENV",
    "PYSCOPE_PACKAGE_MANAGER",
    "PYSCOPE_PROBE_TIMEOUT_SECS",
];

/// A project directory, an isolated HOME and an empty search path.
pub struct Sandbox {
    _temp: TempDir,
    pub project: PathBuf,
    pub home: PathBuf,
    pub bin: PathBuf,
}

impl Sandbox {
    pub fn new(prefix: &str) -> Self {
        let temp = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .expect("tempdir");
        let project = temp.path().join("project");
        let home = temp.path().join("home");
        let bin = temp.path().join("bin");
        let [project, home, bin] = [project, home, bin].map(|dir| {
            fs::create_dir_all(&dir).expect("create sandbox dir");
            // The binary sees the canonical working directory.
            fs::canonicalize(&dir).expect("canonical sandbox dir")
        });
        Self {
            _temp: temp,
            project,
            home,
            bin,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("pyscope");
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        cmd.current_dir(&self.project)
            .env("HOME", &self.home)
            .env("PATH", &self.bin)
            .env("NO_COLOR", "1");
        cmd
    }

    pub fn touch(&self, relative: &str) -> PathBuf {
        let path = self.project.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, "").expect("write marker");
        path
    }

    /// Drops an executable shell script named `name` onto the sandbox PATH.
    #[cfg(unix)]
    pub fn executable(&self, dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        fs::create_dir_all(dir).expect("create script dir");
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}
