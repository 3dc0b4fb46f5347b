use anyhow::Result;
use serde_json::json;

use crate::context::CommandContext;
use crate::outcome::ExecutionOutcome;
use crate::PYSCOPE_VERSION;

/// The effective configuration and the layers it was built from.
///
/// # Errors
/// Returns an error if the layer list cannot be serialized.
pub fn config_show(ctx: &CommandContext) -> Result<ExecutionOutcome> {
    let settings = ctx.settings();
    let resolution = settings.resolution();
    let lines = [
        format!("python = {}", resolution.python_command),
        format!("enable-virtual-env = {}", resolution.enable_virtual_env),
        format!("auto-detect-venv = {}", resolution.auto_detect_venv),
        format!("package-manager = {}", resolution.package_manager),
        format!("probe-timeout-secs = {}", settings.probe_timeout().as_secs()),
    ];
    Ok(ExecutionOutcome::success(
        format!("effective configuration\n{}", lines.join("\n")),
        json!({
            "version": PYSCOPE_VERSION,
            "python_command": resolution.python_command,
            "enable_virtual_env": resolution.enable_virtual_env,
            "auto_detect_venv": resolution.auto_detect_venv,
            "package_manager": resolution.package_manager,
            "probe_timeout_secs": settings.probe_timeout().as_secs(),
            "sources": serde_json::to_value(settings.sources())?,
        }),
    ))
}
