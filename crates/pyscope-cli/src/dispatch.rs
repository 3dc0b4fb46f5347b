use pyscope_core::{
    CommandContext, CommandGroup, CommandInfo, ExecutionOutcome, PackagesRequest,
    ToolCheckRequest, ToolsListRequest,
};

use crate::cli::{CommandGroupCli, ToolsCommand};

pub fn command_info(group: &CommandGroupCli) -> CommandInfo {
    match group {
        CommandGroupCli::Detect => CommandInfo::new(CommandGroup::Detect, "detect"),
        CommandGroupCli::Env => CommandInfo::new(CommandGroup::Env, "env"),
        CommandGroupCli::Python => CommandInfo::new(CommandGroup::Python, "python"),
        CommandGroupCli::Tools(args) => match args.command {
            Some(ToolsCommand::Check(_)) => CommandInfo::new(CommandGroup::Tools, "check"),
            None => CommandInfo::new(CommandGroup::Tools, "tools"),
        },
        CommandGroupCli::Packages(_) => CommandInfo::new(CommandGroup::Packages, "packages"),
        CommandGroupCli::Config => CommandInfo::new(CommandGroup::Config, "config"),
    }
}

pub fn dispatch_command(ctx: &CommandContext, group: &CommandGroupCli) -> ExecutionOutcome {
    match group {
        CommandGroupCli::Detect => core_call(|| pyscope_core::detect(ctx)),
        CommandGroupCli::Env => core_call(|| pyscope_core::env_list(ctx)),
        CommandGroupCli::Python => core_call(|| pyscope_core::python_info(ctx)),
        CommandGroupCli::Tools(args) => match &args.command {
            Some(ToolsCommand::Check(check)) => {
                let request = ToolCheckRequest {
                    kind: check.kind.into(),
                    name: check.name.clone(),
                };
                core_call(|| pyscope_core::tools_check(ctx, &request))
            }
            None => {
                let request = ToolsListRequest {
                    kind: args.kind.map(Into::into),
                };
                core_call(|| pyscope_core::tools_list(ctx, &request))
            }
        },
        CommandGroupCli::Packages(args) => {
            let request = PackagesRequest {
                python: args.interpreter.clone(),
            };
            core_call(|| pyscope_core::packages_list(ctx, &request))
        }
        CommandGroupCli::Config => core_call(|| pyscope_core::config_show(ctx)),
    }
}

fn core_call<F>(action: F) -> ExecutionOutcome
where
    F: FnOnce() -> anyhow::Result<ExecutionOutcome>,
{
    match action() {
        Ok(outcome) => outcome,
        Err(err) => error_outcome(&err),
    }
}

pub fn error_outcome(err: &anyhow::Error) -> ExecutionOutcome {
    if let Some(outcome) = pyscope_core::config_error_outcome(err) {
        return outcome;
    }
    let issues: Vec<String> = err.chain().map(ToString::to_string).collect();
    ExecutionOutcome::failure(
        err.to_string(),
        serde_json::json!({
            "reason": "internal_error",
            "error": err.to_string(),
            "issues": issues,
            "hint": "Re-run with `-vv` for more detail, or open an issue if this persists.",
        }),
    )
}
