use anyhow::Result;
use serde_json::json;

use crate::context::CommandContext;
use crate::outcome::ExecutionOutcome;

/// Classifies the working directory.
///
/// # Errors
/// Returns an error if the project snapshot cannot be serialized.
pub fn detect(ctx: &CommandContext) -> Result<ExecutionOutcome> {
    let resolver = ctx.resolver();
    let config = ctx.resolution();
    let info = resolver.classify(ctx.cwd(), config);
    let venv_active = resolver.is_venv_active(config);
    let message = if info.is_python_project {
        format!("Python project at {}", info.root.display())
    } else {
        format!("{} is not a Python project", info.root.display())
    };
    Ok(ExecutionOutcome::success(
        message,
        json!({
            "project": serde_json::to_value(&info)?,
            "markers": info.markers(),
            "venv_active": venv_active,
        }),
    ))
}
