use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;

use crate::context::CommandContext;
use crate::outcome::ExecutionOutcome;

#[derive(Clone, Debug, Default)]
pub struct PackagesRequest {
    /// Interpreter to query instead of the resolved one.
    pub python: Option<PathBuf>,
}

/// Installed package names, as reported by `pip freeze`.
///
/// # Errors
/// A missing interpreter is reported as a user-error outcome.
pub fn packages_list(ctx: &CommandContext, request: &PackagesRequest) -> Result<ExecutionOutcome> {
    let resolver = ctx.resolver();
    let python = match &request.python {
        Some(python) => Some(python.clone()),
        None => resolver.classify(ctx.cwd(), ctx.resolution()).python_path,
    };
    let Some(python) = python else {
        return Ok(ExecutionOutcome::user_error(
            "no Python interpreter found",
            json!({
                "reason": "python_not_found",
                "hint": "install Python 3 or pass --python",
            }),
        ));
    };
    let packages = resolver.list_installed_packages(Some(&python));
    let message = match packages.len() {
        0 => format!("no packages reported by {}", python.display()),
        1 => "1 package installed".to_string(),
        n => format!("{n} packages installed"),
    };
    Ok(ExecutionOutcome::success(
        message,
        json!({
            "python": python,
            "packages": packages,
        }),
    ))
}
