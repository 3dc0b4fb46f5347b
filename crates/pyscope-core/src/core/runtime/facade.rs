use std::fmt;

use serde_json::{json, Value};

use crate::config::ConfigError;
use crate::context::CommandInfo;
use crate::outcome::{CommandStatus, ExecutionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Detect,
    Env,
    Python,
    Tools,
    Packages,
    Config,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandGroup::Detect => "detect",
            CommandGroup::Env => "env",
            CommandGroup::Python => "python",
            CommandGroup::Tools => "tools",
            CommandGroup::Packages => "packages",
            CommandGroup::Config => "config",
        };
        f.write_str(name)
    }
}

/// Turns a configuration failure anywhere in the chain into a user error.
pub fn config_error_outcome(err: &anyhow::Error) -> Option<ExecutionOutcome> {
    let config = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ConfigError>())?;
    Some(ExecutionOutcome::user_error(
        config.to_string(),
        json!({
            "reason": "invalid_config",
            "hint": config.hint(),
        }),
    ))
}

#[must_use]
pub fn exit_code(status: &CommandStatus) -> i32 {
    match status {
        CommandStatus::Ok => 0,
        CommandStatus::UserError => 1,
        CommandStatus::Failure => 2,
    }
}

#[must_use]
pub fn to_json_response(info: CommandInfo, outcome: &ExecutionOutcome) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": format_status_message(info, &outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(info: CommandInfo, message: &str) -> String {
    let group_name = info.group.to_string();
    let prefix = if group_name == info.name {
        format!("pyscope {}", info.name)
    } else {
        format!("pyscope {} {}", group_name, info.name)
    };
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}
