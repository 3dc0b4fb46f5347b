use std::path::{Path, PathBuf};

use pyscope_domain::VENV_DIR_NAMES;
use tracing::{debug, trace};

use crate::config::EnvSnapshot;
use crate::fs::{parent_of, PathTools};

/// Number of ancestors searched above the start directory.
pub const MAX_ANCESTOR_DEPTH: usize = 5;

pub const VIRTUAL_ENV_VAR: &str = "VIRTUAL_ENV";
pub const CONDA_PREFIX_VAR: &str = "CONDA_PREFIX";

/// Activation variables owned by whoever launched us. Read, never written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationEnv {
    pub virtual_env: Option<PathBuf>,
    pub conda_prefix: Option<PathBuf>,
}

impl ActivationEnv {
    pub(crate) fn from_snapshot(env: &EnvSnapshot) -> Self {
        let non_empty = |key: &str| {
            env.var(key)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        };
        Self {
            virtual_env: non_empty(VIRTUAL_ENV_VAR),
            conda_prefix: non_empty(CONDA_PREFIX_VAR),
        }
    }

    /// The environment the user activated, preferring `VIRTUAL_ENV`.
    #[must_use]
    pub fn active_root(&self) -> Option<&Path> {
        self.virtual_env
            .as_deref()
            .or(self.conda_prefix.as_deref())
    }

    #[must_use]
    pub fn is_active(&self, root: &Path) -> bool {
        [self.virtual_env.as_deref(), self.conda_prefix.as_deref()]
            .into_iter()
            .flatten()
            .any(|active| active == root)
    }
}

/// Ancestor-bounded search for a virtual environment directory.
pub struct VenvLocator<'a> {
    paths: PathTools<'a>,
}

impl<'a> VenvLocator<'a> {
    #[must_use]
    pub fn new(paths: PathTools<'a>) -> Self {
        Self { paths }
    }

    /// Finds the nearest conventional venv directory at or above `start_dir`.
    ///
    /// Returns `None` without touching the filesystem when `enabled` is false.
    #[must_use]
    pub fn locate(&self, start_dir: &Path, enabled: bool) -> Option<PathBuf> {
        if !enabled {
            trace!("virtual environment support disabled");
            return None;
        }
        let mut current = start_dir.to_path_buf();
        for level in 0..=MAX_ANCESTOR_DEPTH {
            if let Some(found) = self.venv_in(&current) {
                debug!(venv = %found.display(), level, "located virtual environment");
                return Some(found);
            }
            let parent = parent_of(&current);
            if parent == current {
                trace!(dir = %current.display(), "reached filesystem root");
                break;
            }
            current = parent;
        }
        debug!(start = %start_dir.display(), "no virtual environment found");
        None
    }

    /// First conventional venv directory directly under `dir`.
    #[must_use]
    pub fn venv_in(&self, dir: &Path) -> Option<PathBuf> {
        VENV_DIR_NAMES.iter().find_map(|name| {
            let candidate = dir.join(name);
            trace!(candidate = %candidate.display(), "probing venv candidate");
            self.paths
                .directory_exists(&candidate)
                .then_some(candidate)
        })
    }
}
