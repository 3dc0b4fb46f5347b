use std::path::{Path, PathBuf};

use pyscope_domain::{EnvironmentKind, ResolutionConfig, VirtualEnvironment, VENV_DIR_NAMES};
use tracing::{debug, trace, warn};

use super::venv::ActivationEnv;
use crate::fs::{join_path, PathTools};

/// Commands tried after the caller's preference, in order.
pub const FALLBACK_COMMANDS: [&str; 3] = ["python3", "python", "py"];

const CONDA_META_DIR: &str = "conda-meta";

/// Maps venv roots and command names to concrete interpreter paths.
pub struct InterpreterResolver<'a> {
    paths: PathTools<'a>,
}

impl<'a> InterpreterResolver<'a> {
    #[must_use]
    pub fn new(paths: PathTools<'a>) -> Self {
        Self { paths }
    }

    /// Interpreter inside a venv root: `bin/python`, then `Scripts/python.exe`.
    ///
    /// When neither exists the POSIX path is still returned as a best-effort
    /// guess; callers must not assume it exists.
    #[must_use]
    pub fn resolve_from_venv(&self, venv_root: &Path) -> Option<PathBuf> {
        let posix = posix_interpreter(venv_root);
        if self.paths.file_exists(&posix) {
            trace!(python = %posix.display(), "venv interpreter (posix layout)");
            return Some(posix);
        }
        let windows = windows_interpreter(venv_root);
        if self.paths.file_exists(&windows) {
            trace!(python = %windows.display(), "venv interpreter (windows layout)");
            return Some(windows);
        }
        warn!(
            venv = %venv_root.display(),
            "no interpreter found inside virtual environment; assuming {}",
            posix.display()
        );
        Some(posix)
    }

    /// First command on the search path among the preferred command and the
    /// standard fallbacks.
    #[must_use]
    pub fn resolve_system_interpreter(&self, preferred: &str) -> Option<PathBuf> {
        for command in candidate_commands(preferred) {
            if let Some(path) = self.paths.which(command) {
                debug!(command, python = %path.display(), "resolved system interpreter");
                return Some(path);
            }
        }
        debug!(preferred, "no system interpreter on the search path");
        None
    }

    #[must_use]
    pub fn describe_environment(
        &self,
        root: &Path,
        activation: &ActivationEnv,
    ) -> VirtualEnvironment {
        let kind = if self.paths.directory_exists(&root.join(CONDA_META_DIR)) {
            EnvironmentKind::Conda
        } else {
            EnvironmentKind::Venv
        };
        let name = root.file_name().map_or_else(
            || root.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        VirtualEnvironment {
            path: root.to_path_buf(),
            python_path: self.resolve_from_venv(root),
            name,
            kind,
            active: activation.is_active(root),
        }
    }

    /// Every conventional venv directly under `start_dir`, followed by the
    /// externally activated environment when it lives elsewhere.
    #[must_use]
    pub fn discover_environments(
        &self,
        start_dir: &Path,
        config: &ResolutionConfig,
        activation: &ActivationEnv,
    ) -> Vec<VirtualEnvironment> {
        if !config.enable_virtual_env {
            return Vec::new();
        }
        let mut found: Vec<VirtualEnvironment> = VENV_DIR_NAMES
            .iter()
            .map(|name| start_dir.join(name))
            .filter(|candidate| self.paths.directory_exists(candidate))
            .map(|root| self.describe_environment(&root, activation))
            .collect();
        if let Some(active) = activation.active_root() {
            let listed = found.iter().any(|env| env.path == active);
            if !listed && self.paths.directory_exists(active) {
                found.push(self.describe_environment(active, activation));
            }
        }
        found
    }
}

pub(crate) fn candidate_commands(preferred: &str) -> Vec<&str> {
    let mut commands = Vec::with_capacity(FALLBACK_COMMANDS.len() + 1);
    let preferred = preferred.trim();
    if !preferred.is_empty() {
        commands.push(preferred);
    }
    for fallback in FALLBACK_COMMANDS {
        if !commands.contains(&fallback) {
            commands.push(fallback);
        }
    }
    commands
}

fn posix_interpreter(root: &Path) -> PathBuf {
    join_path([root, Path::new("bin"), Path::new("python")])
}

fn windows_interpreter(root: &Path) -> PathBuf {
    join_path([root, Path::new("Scripts"), Path::new("python.exe")])
}
