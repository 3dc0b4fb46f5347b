//! Interpreter, virtual environment and version discovery.

pub mod interpreter;
pub mod venv;
pub mod version;

pub use interpreter::{InterpreterResolver, FALLBACK_COMMANDS};
pub use venv::{ActivationEnv, VenvLocator, MAX_ANCESTOR_DEPTH};
pub use version::{parse_freeze, parse_version, VersionProbe};
