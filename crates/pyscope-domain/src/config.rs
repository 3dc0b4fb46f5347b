use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PYTHON_COMMAND: &str = "python3";

/// Immutable resolution options threaded into every engine call.
///
/// Values are assumed to be well-typed by the time they reach the engine;
/// validation happens where the configuration is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    pub python_command: String,
    pub enable_virtual_env: bool,
    pub auto_detect_venv: bool,
    pub package_manager: PackageManager,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            python_command: DEFAULT_PYTHON_COMMAND.to_string(),
            enable_virtual_env: true,
            auto_detect_venv: true,
            package_manager: PackageManager::Pip,
        }
    }
}

impl ResolutionConfig {
    /// Whether the ancestor venv search should run at all.
    #[must_use]
    pub fn searches_for_venv(&self) -> bool {
        self.enable_virtual_env && self.auto_detect_venv
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Pip,
    Poetry,
    Pipenv,
    Uv,
    Conda,
    /// Pick a concrete manager from the project's marker files.
    Auto,
}

impl PackageManager {
    pub const ALL: [PackageManager; 6] = [
        PackageManager::Pip,
        PackageManager::Poetry,
        PackageManager::Pipenv,
        PackageManager::Uv,
        PackageManager::Conda,
        PackageManager::Auto,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PackageManager::Pip => "pip",
            PackageManager::Poetry => "poetry",
            PackageManager::Pipenv => "pipenv",
            PackageManager::Uv => "uv",
            PackageManager::Conda => "conda",
            PackageManager::Auto => "auto",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown package manager `{0}` (expected one of pip, poetry, pipenv, uv, conda, auto)")]
pub struct ParsePackageManagerError(pub String);

impl FromStr for PackageManager {
    type Err = ParsePackageManagerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        PackageManager::ALL
            .into_iter()
            .find(|pm| pm.as_str() == lowered)
            .ok_or_else(|| ParsePackageManagerError(raw.to_string()))
    }
}
