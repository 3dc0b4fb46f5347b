use std::path::PathBuf;

use pyscope_domain::{ToolCommand, ToolKind};
use serde::Serialize;
use tracing::trace;

use crate::fs::PathTools;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub kind: ToolKind,
    pub name: &'static str,
    pub available: bool,
    pub builtin: bool,
    pub path: Option<PathBuf>,
}

/// Availability checks for formatters, linters and test frameworks.
///
/// Nothing is cached; every call consults the search path again.
pub struct ToolProbe<'a> {
    paths: PathTools<'a>,
}

impl<'a> ToolProbe<'a> {
    #[must_use]
    pub fn new(paths: PathTools<'a>) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn is_available(&self, kind: ToolKind, name: &str) -> bool {
        match kind.command_for(name) {
            Some(ToolCommand::Builtin) => true,
            Some(ToolCommand::Executable(command)) => self.paths.which(command).is_some(),
            None => {
                trace!(%kind, name, "unrecognized tool");
                false
            }
        }
    }

    /// Status of every recognized tool of `kind`, in table order.
    #[must_use]
    pub fn probe_all(&self, kind: ToolKind) -> Vec<ToolStatus> {
        kind.table()
            .iter()
            .map(|&(name, command)| match command {
                ToolCommand::Builtin => ToolStatus {
                    kind,
                    name,
                    available: true,
                    builtin: true,
                    path: None,
                },
                ToolCommand::Executable(executable) => {
                    let path = self.paths.which(executable);
                    ToolStatus {
                        kind,
                        name,
                        available: path.is_some(),
                        builtin: false,
                        path,
                    }
                }
            })
            .collect()
    }
}
