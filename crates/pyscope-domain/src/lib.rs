//! Data model shared by the pyscope engine and its front ends.
//!
//! Everything here is plain data plus the static lookup tables the engine
//! consults (marker files, conventional venv directory names, tool commands).
//! Nothing in this crate touches the filesystem or spawns processes.

pub mod config;
pub mod environment;
pub mod project;
pub mod tools;

pub use config::{PackageManager, ParsePackageManagerError, ResolutionConfig};
pub use environment::{EnvironmentKind, PythonVersion, VirtualEnvironment, VENV_DIR_NAMES};
pub use project::{MarkerFile, ProjectInfo, MARKER_FILES};
pub use tools::{ParseToolKindError, ToolCommand, ToolKind};
