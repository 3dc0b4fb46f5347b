use anyhow::Result;
use serde_json::json;
use tracing::debug;

use crate::context::CommandContext;
use crate::outcome::ExecutionOutcome;
use crate::python::interpreter::candidate_commands;

/// Reports the interpreter that would run code in the working directory.
///
/// # Errors
/// Interpreter problems are reported as outcomes rather than errors.
pub fn python_info(ctx: &CommandContext) -> Result<ExecutionOutcome> {
    let resolver = ctx.resolver();
    let config = ctx.resolution();
    let info = resolver.classify(ctx.cwd(), config);
    let Some(python) = info.python_path.clone() else {
        return Ok(ExecutionOutcome::user_error(
            "no Python interpreter found",
            json!({
                "reason": "python_not_found",
                "tried": candidate_commands(&config.python_command),
                "hint": "install Python 3 or point --python / PYSCOPE_PYTHON at an interpreter",
            }),
        ));
    };
    let source = if info.venv_path.is_some() { "venv" } else { "system" };
    let version = resolver.get_version(Some(&python));
    debug!(python = %python.display(), source, ?version, "interpreter selected");
    let message = match &version {
        Some(version) => format!("Python {version} at {}", python.display()),
        None => format!("{} (version unknown)", python.display()),
    };
    Ok(ExecutionOutcome::success(
        message,
        json!({
            "python": python,
            "source": source,
            "venv": info.venv_path,
            "version": version,
        }),
    ))
}
