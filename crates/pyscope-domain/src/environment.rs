use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Conventional virtual environment directory names, most common first.
pub const VENV_DIR_NAMES: [&str; 6] = [".venv", "venv", "env", ".env", "virtualenv", ".virtualenv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    Venv,
    Conda,
}

impl EnvironmentKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EnvironmentKind::Venv => "venv",
            EnvironmentKind::Conda => "conda",
        }
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A virtual environment as observed on disk. `active` mirrors the
/// externally owned activation variables; pyscope never activates anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualEnvironment {
    pub path: PathBuf,
    pub python_path: Option<PathBuf>,
    pub name: String,
    pub kind: EnvironmentKind,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PythonVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
