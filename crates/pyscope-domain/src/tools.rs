use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Formatter,
    Linter,
    TestFramework,
}

/// How a recognized tool name is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCommand {
    /// Found by looking the executable up on the search path.
    Executable(&'static str),
    /// Backed by the standard library; always usable.
    Builtin,
}

const FORMATTERS: &[(&str, ToolCommand)] = &[
    ("black", ToolCommand::Executable("black")),
    ("autopep8", ToolCommand::Executable("autopep8")),
    ("yapf", ToolCommand::Executable("yapf")),
    ("ruff", ToolCommand::Executable("ruff")),
    ("isort", ToolCommand::Executable("isort")),
];

const LINTERS: &[(&str, ToolCommand)] = &[
    ("pylint", ToolCommand::Executable("pylint")),
    ("flake8", ToolCommand::Executable("flake8")),
    ("mypy", ToolCommand::Executable("mypy")),
    ("pycodestyle", ToolCommand::Executable("pycodestyle")),
    ("pydocstyle", ToolCommand::Executable("pydocstyle")),
    ("bandit", ToolCommand::Executable("bandit")),
    ("ruff", ToolCommand::Executable("ruff")),
];

const TEST_FRAMEWORKS: &[(&str, ToolCommand)] = &[
    ("pytest", ToolCommand::Executable("pytest")),
    ("nose2", ToolCommand::Executable("nose2")),
    ("unittest", ToolCommand::Builtin),
];

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Formatter, ToolKind::Linter, ToolKind::TestFramework];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Formatter => "formatter",
            ToolKind::Linter => "linter",
            ToolKind::TestFramework => "test_framework",
        }
    }

    /// Recognized tool names and their commands, in table order.
    #[must_use]
    pub fn table(self) -> &'static [(&'static str, ToolCommand)] {
        match self {
            ToolKind::Formatter => FORMATTERS,
            ToolKind::Linter => LINTERS,
            ToolKind::TestFramework => TEST_FRAMEWORKS,
        }
    }

    /// Looks up a tool name; names are matched exactly.
    #[must_use]
    pub fn command_for(self, name: &str) -> Option<ToolCommand> {
        self.table()
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, command)| *command)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool kind `{0}` (expected formatter, linter or test_framework)")]
pub struct ParseToolKindError(pub String);

impl FromStr for ToolKind {
    type Err = ParseToolKindError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "formatter" => Ok(ToolKind::Formatter),
            "linter" => Ok(ToolKind::Linter),
            "test_framework" | "test-framework" | "testFramework" | "test" => {
                Ok(ToolKind::TestFramework)
            }
            other => Err(ParseToolKindError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unittest_is_builtin() {
        assert_eq!(
            ToolKind::TestFramework.command_for("unittest"),
            Some(ToolCommand::Builtin)
        );
    }

    #[test]
    fn unknown_names_have_no_command() {
        assert_eq!(ToolKind::Linter.command_for("unknown"), None);
        assert_eq!(ToolKind::Formatter.command_for("pytest"), None);
    }

    #[test]
    fn kind_round_trips_through_display_name() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.as_str().parse::<ToolKind>(), Ok(kind));
        }
        assert_eq!("test-framework".parse::<ToolKind>(), Ok(ToolKind::TestFramework));
        assert!("compiler".parse::<ToolKind>().is_err());
    }

    #[test]
    fn json_and_display_use_the_same_kind_name() {
        for kind in ToolKind::ALL {
            assert_eq!(
                serde_json::to_value(kind).expect("serialize kind"),
                serde_json::json!(kind.to_string())
            );
        }
    }
}
