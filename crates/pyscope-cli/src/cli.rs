use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use pyscope_core::{ConfigOverrides, ToolKind};

pub const PYSCOPE_BEFORE_HELP: &str = concat!(
    "pyscope ",
    env!("CARGO_PKG_VERSION"),
    " – Python execution-context resolver\n\n",
    "  detect           Classify the current directory as a Python project.\n",
    "  env              List virtual environments visible from here.\n",
    "  python           Show the interpreter that would run code here.\n",
    "  tools            Check formatters, linters and test frameworks.\n",
    "  packages         List packages installed for the resolved interpreter.\n",
    "  config           Show the effective configuration and its sources.\n",
);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    disable_help_subcommand = true,
    before_help = PYSCOPE_BEFORE_HELP
)]
#[allow(clippy::struct_excessive_bools)]
pub struct PyscopeCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (JSON and exit codes are unaffected)",
        global = true
    )]
    pub quiet: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches trace)",
        global = true
    )]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[arg(
        long,
        value_name = "PATH",
        help = "Read settings from this TOML file (also PYSCOPE_CONFIG)",
        global = true
    )]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub resolution: ResolutionArgs,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ResolutionArgs {
    #[arg(
        long,
        value_name = "COMMAND",
        help = "Preferred interpreter command when no virtual environment is found",
        global = true
    )]
    pub python: Option<String>,
    #[arg(long, help = "Ignore virtual environments entirely", global = true)]
    pub no_venv: bool,
    #[arg(
        long,
        help = "Skip the directory search; only an activated environment is used",
        global = true
    )]
    pub no_auto_detect: bool,
    #[arg(
        long,
        value_name = "NAME",
        help = "pip, poetry, pipenv, uv, conda or auto",
        global = true
    )]
    pub package_manager: Option<String>,
}

impl ResolutionArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            python_command: self.python.clone(),
            enable_virtual_env: self.no_venv.then_some(false),
            auto_detect_venv: self.no_auto_detect.then_some(false),
            package_manager: self.package_manager.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CommandGroupCli {
    #[command(about = "Classify the current directory as a Python project")]
    Detect,
    #[command(about = "List virtual environments visible from the current directory")]
    Env,
    #[command(about = "Show the resolved interpreter and its version")]
    Python,
    #[command(about = "Check formatter, linter and test framework availability")]
    Tools(ToolsArgs),
    #[command(about = "List packages installed for the resolved interpreter")]
    Packages(PackagesArgs),
    #[command(about = "Show the effective configuration")]
    Config,
}

#[derive(Args, Debug)]
pub struct ToolsArgs {
    #[command(subcommand)]
    pub command: Option<ToolsCommand>,
    #[arg(long, value_enum, help = "Only list tools of this kind")]
    pub kind: Option<ToolKindArg>,
}

#[derive(Subcommand, Debug)]
pub enum ToolsCommand {
    #[command(about = "Succeed only if the named tool is usable")]
    Check(ToolCheckArgs),
}

#[derive(Args, Debug)]
pub struct ToolCheckArgs {
    #[arg(value_enum)]
    pub kind: ToolKindArg,
    pub name: String,
}

#[derive(Args, Debug)]
pub struct PackagesArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Query this interpreter instead of the resolved one"
    )]
    pub interpreter: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ToolKindArg {
    Formatter,
    Linter,
    #[value(alias = "test")]
    TestFramework,
}

impl From<ToolKindArg> for ToolKind {
    fn from(value: ToolKindArg) -> Self {
        match value {
            ToolKindArg::Formatter => ToolKind::Formatter,
            ToolKindArg::Linter => ToolKind::Linter,
            ToolKindArg::TestFramework => ToolKind::TestFramework,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        PyscopeCli::command().debug_assert();
    }

    #[test]
    fn resolution_flags_become_overrides() {
        let cli = PyscopeCli::parse_from([
            "pyscope",
            "detect",
            "--no-venv",
            "--python",
            "python3.12",
            "--package-manager",
            "auto",
        ]);
        let overrides = cli.resolution.overrides();
        assert_eq!(overrides.enable_virtual_env, Some(false));
        assert_eq!(overrides.auto_detect_venv, None);
        assert_eq!(overrides.python_command.as_deref(), Some("python3.12"));
        assert_eq!(overrides.package_manager.as_deref(), Some("auto"));
    }

    #[test]
    fn tools_check_accepts_test_alias() {
        let cli = PyscopeCli::parse_from(["pyscope", "tools", "check", "test", "pytest"]);
        match cli.command {
            CommandGroupCli::Tools(ToolsArgs {
                command: Some(ToolsCommand::Check(args)),
                ..
            }) => {
                assert_eq!(args.kind, ToolKindArg::TestFramework);
                assert_eq!(args.name, "pytest");
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }
}
