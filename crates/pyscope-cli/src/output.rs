use atty::Stream;
use color_eyre::Result;
use pyscope_core::{CommandGroup, CommandInfo, CommandStatus, ExecutionOutcome};
use serde_json::Value;

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

pub fn emit_output(
    opts: &OutputOptions,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = pyscope_core::exit_code(&outcome.status);
    let style = Style::new(opts.no_color, atty::is(Stream::Stdout));

    if opts.json {
        let payload = pyscope_core::to_json_response(info, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }
    if opts.quiet {
        return Ok(code);
    }

    let message = pyscope_core::format_status_message(info, &outcome.message);
    println!("{}", style.status(&outcome.status, &message));
    if outcome.status == CommandStatus::Ok {
        for line in detail_lines(&style, info, &outcome.details) {
            println!("{line}");
        }
        if let Some(hint) = outcome.hint() {
            println!("{}", style.info(&format!("Tip: {hint}")));
        }
    } else {
        if let Some(reason) = outcome
            .details
            .get("reason")
            .and_then(Value::as_str)
            .and_then(reason_display)
        {
            println!();
            println!("Why:");
            println!("  • {reason}");
        }
        if let Some(hint) = outcome.hint() {
            println!();
            println!("Fix:");
            println!("{}", style.info(&format!("  • {hint}")));
        }
    }
    Ok(code)
}

fn detail_lines(style: &Style, info: CommandInfo, details: &Value) -> Vec<String> {
    match info.group {
        CommandGroup::Detect => detect_lines(details),
        CommandGroup::Env => env_lines(style, details),
        CommandGroup::Tools if info.name == "tools" => tool_table(style, details),
        CommandGroup::Packages => string_list(details, "packages")
            .into_iter()
            .map(|name| format!("  {name}"))
            .collect(),
        _ => Vec::new(),
    }
}

fn detect_lines(details: &Value) -> Vec<String> {
    let Some(project) = details.get("project") else {
        return Vec::new();
    };
    let markers = string_list(details, "markers");
    let mut lines = Vec::new();
    if !markers.is_empty() {
        lines.push(format!("  markers:         {}", markers.join(", ")));
    }
    lines.push(format!(
        "  venv:            {}",
        path_or(project.get("venv_path"), "none")
    ));
    lines.push(format!(
        "  python:          {}",
        path_or(project.get("python_path"), "not found")
    ));
    if let Some(manager) = project.get("package_manager").and_then(Value::as_str) {
        lines.push(format!("  package manager: {manager}"));
    }
    lines
}

fn env_lines(style: &Style, details: &Value) -> Vec<String> {
    let Some(envs) = details.get("environments").and_then(Value::as_array) else {
        return Vec::new();
    };
    envs.iter()
        .filter_map(|env| {
            let name = env.get("name")?.as_str()?;
            let kind = env.get("kind")?.as_str()?;
            let path = env.get("path")?.as_str()?;
            let active = env.get("active").and_then(Value::as_bool).unwrap_or(false);
            let marker = if active { " (active)" } else { "" };
            Some(format!(
                "  {name:<14} {kind:<6} {}{marker}",
                style.dimmed(path)
            ))
        })
        .collect()
}

fn tool_table(style: &Style, details: &Value) -> Vec<String> {
    let Some(tools) = details.get("tools").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut lines = vec![style.table_header(&format!(
        "  {:<16} {:<12} {}",
        "Kind", "Tool", "Status"
    ))];
    for tool in tools {
        let (Some(kind), Some(name)) = (
            tool.get("kind").and_then(Value::as_str),
            tool.get("name").and_then(Value::as_str),
        ) else {
            continue;
        };
        let available = tool.get("available").and_then(Value::as_bool).unwrap_or(false);
        let builtin = tool.get("builtin").and_then(Value::as_bool).unwrap_or(false);
        let status = if builtin {
            "builtin".to_string()
        } else if available {
            path_or(tool.get("path"), "available")
        } else {
            "missing".to_string()
        };
        lines.push(format!(
            "  {kind:<16} {name:<12} {}",
            style.available(&status, available)
        ));
    }
    lines
}

fn string_list(details: &Value, key: &str) -> Vec<String> {
    details
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn path_or(value: Option<&Value>, fallback: &str) -> String {
    value
        .and_then(Value::as_str)
        .map_or_else(|| fallback.to_string(), ToString::to_string)
}

fn reason_display(code: &str) -> Option<&'static str> {
    match code {
        "python_not_found" => Some("No interpreter was found in a virtual environment or on PATH."),
        "tool_unavailable" => Some("The tool is recognized but not installed on PATH."),
        "unknown_tool" => Some("The tool name is not in the supported list for that kind."),
        "invalid_config" => Some("The configuration could not be loaded."),
        "internal_error" => Some("pyscope hit an unexpected error."),
        _ => None,
    }
}
