use atty::Stream;
use color_eyre::Result;
use serde_json::Value;
use trymod_core::{
    format_status_message, to_json_response, CommandInfo, CommandStatus, ExecutionOutcome,
    ProgressEvent, Reporter,
};

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

/// Prints progress notices as they happen, colored like the final status.
pub struct ConsoleReporter {
    style: Style,
}

impl ConsoleReporter {
    pub fn new(no_color: bool) -> Self {
        Self {
            style: Style::new(no_color, atty::is(Stream::Stdout)),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &ProgressEvent) {
        let line = match event {
            ProgressEvent::Starting => self
                .style
                .success("Gonna start a REPL with packages installed and loaded for you"),
            ProgressEvent::AlreadyInstalled { name } => self
                .style
                .notice(&format!("'{name}' was already installed since before!")),
            ProgressEvent::Downloading { name } => self
                .style
                .warning(&format!("Couldn't find '{name}' locally, gonna download it now")),
            ProgressEvent::Aliased { name, target } => self
                .style
                .info(&format!("Linked '{name}' to installed directory '{target}'")),
            ProgressEvent::Bound { name, key } => self.style.success(&format!(
                "Package '{name}' was loaded and assigned to '{key}' in the current scope"
            )),
            ProgressEvent::SessionStarting => "REPL started...".to_string(),
            ProgressEvent::ClearingCache { path } => {
                format!("Removing folder {}", path.display())
            }
            ProgressEvent::CacheCleared { .. } => return,
        };
        println!("{line}");
    }
}

/// Renders the outcome and returns the process exit code.
pub fn emit_output(
    opts: &OutputOptions,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let mut code = match outcome.status {
        CommandStatus::Ok => 0,
        CommandStatus::UserError => 1,
        CommandStatus::Failure => 2,
    };
    if let Some(exit_code) = outcome.details.get("code").and_then(Value::as_i64) {
        code = i32::try_from(exit_code).unwrap_or(code);
    }

    if opts.json {
        let payload = to_json_response(info, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }

    match outcome.status {
        CommandStatus::Ok => {
            if opts.quiet || (is_passthrough(&outcome.details) && outcome.message.is_empty()) {
                return Ok(code);
            }
            let style = Style::new(opts.no_color, atty::is(Stream::Stdout));
            let message = format_status_message(info, &outcome.message);
            println!("{}", style.status(&outcome.status, &message));
        }
        CommandStatus::UserError | CommandStatus::Failure => {
            let style = Style::new(opts.no_color, atty::is(Stream::Stderr));
            let diag = outcome
                .details
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or(trymod_core::diag_codes::GENERIC);
            let header = format!(
                "{diag}  {}",
                format_status_message(info, &outcome.message)
            );
            eprintln!("{}", style.error_header(&header));
            let why = why_bullets(&outcome.details);
            if !why.is_empty() {
                eprintln!();
                eprintln!("Why:");
                for reason in why {
                    eprintln!("  • {reason}");
                }
            }
            if let Some(hint) = outcome.details.get("hint").and_then(Value::as_str) {
                eprintln!();
                eprintln!("Fix:");
                eprintln!("{}", style.fix_bullet(&format!("  • {hint}")));
            }
            if let Some(stderr) = outcome
                .details
                .get("stderr")
                .and_then(Value::as_str)
                .filter(|text| !text.trim().is_empty())
            {
                eprintln!();
                eprintln!("npm output:");
                eprintln!("{}", stderr.trim_end());
            }
        }
    }
    Ok(code)
}

fn is_passthrough(details: &Value) -> bool {
    details
        .get("passthrough")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn why_bullets(details: &Value) -> Vec<String> {
    let mut bullets = Vec::new();
    if let Some(display) = details
        .get("reason")
        .and_then(Value::as_str)
        .and_then(reason_display)
    {
        bullets.push(display.to_string());
    }
    if let Some(issues) = details.get("issues").and_then(Value::as_array) {
        for issue in issues {
            let id = issue.get("id").and_then(Value::as_str).unwrap_or_default();
            let message = issue
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if message.is_empty() {
                continue;
            }
            if id.is_empty() {
                bullets.push(message.to_string());
            } else {
                bullets.push(format!("{id}: {message}"));
            }
        }
    }
    bullets
}

fn reason_display(reason: &str) -> Option<&'static str> {
    match reason {
        "missing_argument" => Some("No package names were given"),
        "invalid_specifier" => Some("The specifier has no usable package name"),
        "package_not_found" => Some("The registry has no package by that name"),
        "dependency_load_error" => Some("npm could not be started"),
        "dependency_install_error" => Some("npm failed while installing"),
        "module_load_error" => Some("The installed package could not be loaded"),
        "cache_clear_failure" => Some("The package cache could not be removed"),
        "session_failed" => Some("The node REPL could not be started"),
        "packages_failed" => Some("Some packages failed to load"),
        _ => None,
    }
}
