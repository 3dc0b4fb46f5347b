use anyhow::Result;
use serde_json::json;

use crate::context::CommandContext;
use crate::outcome::ExecutionOutcome;

/// Lists the virtual environments visible from the working directory.
///
/// # Errors
/// Returns an error if the environment list cannot be serialized.
pub fn env_list(ctx: &CommandContext) -> Result<ExecutionOutcome> {
    let config = ctx.resolution();
    if !config.enable_virtual_env {
        return Ok(ExecutionOutcome::success(
            "virtual environments are disabled",
            json!({ "environments": [], "enabled": false }),
        ));
    }
    let resolver = ctx.resolver();
    let environments = resolver.discover_environments(ctx.cwd(), config);
    // The locator may still find one further up the tree.
    let selected = resolver.classify(ctx.cwd(), config).venv_path;
    let message = match environments.len() {
        0 => "no virtual environments found".to_string(),
        1 => "found 1 virtual environment".to_string(),
        n => format!("found {n} virtual environments"),
    };
    Ok(ExecutionOutcome::success(
        message,
        json!({
            "environments": serde_json::to_value(&environments)?,
            "selected": selected,
            "active": resolver.activation().active_root(),
            "enabled": true,
        }),
    ))
}
