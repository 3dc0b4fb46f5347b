use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::PackageManager;

/// Files whose presence marks a directory as a Python project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerFile {
    Requirements,
    Pyproject,
    SetupPy,
    SetupCfg,
    Pipfile,
    PoetryLock,
}

pub const MARKER_FILES: [MarkerFile; 6] = [
    MarkerFile::Requirements,
    MarkerFile::Pyproject,
    MarkerFile::SetupPy,
    MarkerFile::SetupCfg,
    MarkerFile::Pipfile,
    MarkerFile::PoetryLock,
];

impl MarkerFile {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            MarkerFile::Requirements => "requirements.txt",
            MarkerFile::Pyproject => "pyproject.toml",
            MarkerFile::SetupPy => "setup.py",
            MarkerFile::SetupCfg => "setup.cfg",
            MarkerFile::Pipfile => "Pipfile",
            MarkerFile::PoetryLock => "poetry.lock",
        }
    }
}

/// Point-in-time snapshot of a working directory's Python context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ProjectInfo {
    pub root: PathBuf,
    pub is_python_project: bool,
    pub has_requirements: bool,
    pub has_pyproject: bool,
    pub has_setup_py: bool,
    pub has_setup_cfg: bool,
    pub has_pipfile: bool,
    pub has_poetry_lock: bool,
    pub has_venv: bool,
    pub venv_path: Option<PathBuf>,
    pub python_path: Option<PathBuf>,
    pub package_manager: PackageManager,
}

impl ProjectInfo {
    #[must_use]
    pub fn has_marker(&self, marker: MarkerFile) -> bool {
        match marker {
            MarkerFile::Requirements => self.has_requirements,
            MarkerFile::Pyproject => self.has_pyproject,
            MarkerFile::SetupPy => self.has_setup_py,
            MarkerFile::SetupCfg => self.has_setup_cfg,
            MarkerFile::Pipfile => self.has_pipfile,
            MarkerFile::PoetryLock => self.has_poetry_lock,
        }
    }

    /// Marker file names present in the project, in canonical order.
    #[must_use]
    pub fn markers(&self) -> Vec<&'static str> {
        MARKER_FILES
            .into_iter()
            .filter(|marker| self.has_marker(*marker))
            .map(MarkerFile::file_name)
            .collect()
    }
}
