use anyhow::Result;
use pyscope_domain::ToolKind;
use serde_json::json;

use crate::context::CommandContext;
use crate::outcome::ExecutionOutcome;
use crate::tools::ToolStatus;

#[derive(Clone, Debug, Default)]
pub struct ToolsListRequest {
    /// Restrict the listing to one kind; every kind when `None`.
    pub kind: Option<ToolKind>,
}

#[derive(Clone, Debug)]
pub struct ToolCheckRequest {
    pub kind: ToolKind,
    pub name: String,
}

/// Availability of every recognized tool.
///
/// # Errors
/// Returns an error if the statuses cannot be serialized.
pub fn tools_list(ctx: &CommandContext, request: &ToolsListRequest) -> Result<ExecutionOutcome> {
    let resolver = ctx.resolver();
    let kinds: Vec<ToolKind> = match request.kind {
        Some(kind) => vec![kind],
        None => ToolKind::ALL.to_vec(),
    };
    let statuses: Vec<ToolStatus> = kinds
        .into_iter()
        .flat_map(|kind| resolver.probe_tools(kind))
        .collect();
    let available = statuses.iter().filter(|status| status.available).count();
    Ok(ExecutionOutcome::success(
        format!("{available} of {} tools available", statuses.len()),
        json!({ "tools": serde_json::to_value(&statuses)? }),
    ))
}

/// Whether one named tool can be used.
///
/// # Errors
/// Unknown or missing tools are reported as user-error outcomes.
pub fn tools_check(ctx: &CommandContext, request: &ToolCheckRequest) -> Result<ExecutionOutcome> {
    let kind = request.kind;
    let name = request.name.trim();
    if kind.command_for(name).is_none() {
        let known: Vec<&str> = kind.table().iter().map(|(name, _)| *name).collect();
        return Ok(ExecutionOutcome::user_error(
            format!("`{name}` is not a recognized {kind}"),
            json!({
                "reason": "unknown_tool",
                "kind": kind,
                "name": name,
                "known": known,
                "hint": format!("choose one of: {}", known.join(", ")),
            }),
        ));
    }
    let resolver = ctx.resolver();
    if resolver.is_tool_available(kind, name) {
        let status = resolver
            .probe_tools(kind)
            .into_iter()
            .find(|status| status.name == name);
        return Ok(ExecutionOutcome::success(
            format!("{name} is available"),
            json!({
                "kind": kind,
                "name": name,
                "available": true,
                "path": status.and_then(|status| status.path),
            }),
        ));
    }
    Ok(ExecutionOutcome::user_error(
        format!("{name} is not available"),
        json!({
            "reason": "tool_unavailable",
            "kind": kind,
            "name": name,
            "available": false,
            "hint": format!("install {name} into the active environment or put it on PATH"),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::test_context::TestContext;
    use crate::core::runtime::test_support::FakeEffects;
    use crate::outcome::CommandStatus;

    fn fixture_with(commands: &[(&str, &str)]) -> Result<TestContext> {
        let effects = commands
            .iter()
            .fold(FakeEffects::new(), |effects, (name, path)| {
                effects.with_command(name, *path)
            });
        Ok(TestContext::new()?.with_effects(effects))
    }

    #[test]
    fn list_covers_every_kind_in_table_order() -> Result<()> {
        let mut fixture = fixture_with(&[("black", "/usr/bin/black"), ("ruff", "/usr/bin/ruff")])?;
        let global = fixture.global();
        let ctx = fixture.context(&global)?;
        let outcome = tools_list(&ctx, &ToolsListRequest::default())?;
        let tools = outcome.details["tools"].as_array().expect("tools");
        assert_eq!(tools.len(), 15);
        assert_eq!(tools[0]["name"], "black");
        assert_eq!(tools[0]["kind"], "formatter");
        assert_eq!(tools[0]["available"], true);
        // black, ruff (formatter), ruff (linter), unittest
        assert_eq!(outcome.message, "4 of 15 tools available");
        Ok(())
    }

    #[test]
    fn list_can_be_restricted_to_one_kind() -> Result<()> {
        let mut fixture = fixture_with(&[])?;
        let global = fixture.global();
        let ctx = fixture.context(&global)?;
        let request = ToolsListRequest {
            kind: Some(ToolKind::TestFramework),
        };
        let outcome = tools_list(&ctx, &request)?;
        assert_eq!(outcome.message, "1 of 3 tools available");
        Ok(())
    }

    #[test]
    fn check_distinguishes_unknown_missing_and_available() -> Result<()> {
        let mut fixture = fixture_with(&[("mypy", "/opt/bin/mypy")])?;
        let global = fixture.global();
        let ctx = fixture.context(&global)?;

        let ok = tools_check(
            &ctx,
            &ToolCheckRequest {
                kind: ToolKind::Linter,
                name: "mypy".into(),
            },
        )?;
        assert_eq!(ok.status, CommandStatus::Ok);
        assert_eq!(ok.details["path"], "/opt/bin/mypy");

        let missing = tools_check(
            &ctx,
            &ToolCheckRequest {
                kind: ToolKind::Linter,
                name: "flake8".into(),
            },
        )?;
        assert_eq!(missing.status, CommandStatus::UserError);
        assert_eq!(missing.details["reason"], "tool_unavailable");

        let unknown = tools_check(
            &ctx,
            &ToolCheckRequest {
                kind: ToolKind::Formatter,
                name: "prettier".into(),
            },
        )?;
        assert_eq!(unknown.details["reason"], "unknown_tool");
        assert_eq!(unknown.details["known"][0], "black");

        let builtin = tools_check(
            &ctx,
            &ToolCheckRequest {
                kind: ToolKind::TestFramework,
                name: "unittest".into(),
            },
        )?;
        assert_eq!(builtin.status, CommandStatus::Ok);
        assert_eq!(builtin.details["path"], serde_json::Value::Null);
        Ok(())
    }
}
