use std::path::Path;

use anyhow::Result;
use serde_json::{json, Value};
use trymod_domain::{binding_key, PackageSpec};

use crate::cache::clear_installed;
use crate::diagnostics::codes;
use crate::packages::{load_packages, InstalledPackage, LoadPolicy};
use crate::reporter::ProgressEvent;
use crate::session::{bind_packages, start_session};
use crate::tooling::{error_outcome, load_failures_outcome, missing_argument_outcome};
use crate::{CommandContext, ExecutionOutcome};

#[derive(Clone, Debug, Default)]
pub struct TryRequest {
    pub packages: Vec<String>,
    pub policy: LoadPolicy,
}

/// Installs or reuses each requested package, binds them, and starts a REPL.
///
/// # Errors
/// Returns an error only for infrastructure failures; package and session
/// problems are reported through the outcome.
pub fn try_packages(ctx: &CommandContext, request: &TryRequest) -> Result<ExecutionOutcome> {
    if request.packages.is_empty() {
        return Ok(missing_argument_outcome());
    }
    ctx.report(&ProgressEvent::Starting);
    let specs: Vec<PackageSpec> = request
        .packages
        .iter()
        .map(|raw| PackageSpec::parse(raw))
        .collect();
    let report = load_packages(ctx, &specs, request.policy)?;
    if !report.failures.is_empty() {
        return Ok(load_failures_outcome(&report.failures));
    }

    let namespace = bind_packages(&report.loaded, ctx.reporter());
    let cache = ctx.config().cache();
    let mut details = json!({
        "packages": report.loaded.iter().map(package_details).collect::<Vec<_>>(),
        "bindings": namespace,
        "cache_root": cache.root.display().to_string(),
        "history": cache.history.display().to_string(),
        "interactive": ctx.config().session().interactive,
    });

    match start_session(ctx, &namespace) {
        Ok(None) => Ok(ExecutionOutcome::success(
            format!("loaded {}", plural(report.loaded.len(), "package")),
            details,
        )),
        Ok(Some(output)) => {
            if let Value::Object(map) = &mut details {
                map.insert("passthrough".into(), Value::Bool(true));
                map.insert("code".into(), Value::from(output.code));
            }
            if output.success() {
                Ok(ExecutionOutcome::success("", details))
            } else {
                Ok(ExecutionOutcome::failure(
                    format!("REPL exited with status {}", output.code),
                    details,
                ))
            }
        }
        Err(err) => Ok(ExecutionOutcome::failure(
            format!("could not start the REPL: {err:#}"),
            json!({
                "reason": "session_failed",
                "code": codes::SESSION,
                "hint": "install Node.js or point TRYMODULE_NODE at a node executable",
            }),
        )),
    }
}

/// Deletes every cached package.
///
/// # Errors
/// Returns an error only for infrastructure failures; a failed removal is
/// reported through the outcome.
pub fn clear_cache(ctx: &CommandContext) -> Result<ExecutionOutcome> {
    match clear_installed(ctx) {
        Ok(path) => Ok(ExecutionOutcome::success(
            "Cache successfully cleared!",
            json!({ "removed": path.display().to_string() }),
        )),
        Err(err) => Ok(error_outcome(&err)),
    }
}

fn package_details(package: &InstalledPackage) -> Value {
    json!({
        "spec": package.spec.raw(),
        "origin": package.spec.source(),
        "name": package.name,
        "key": binding_key(&package.name),
        "source": package.source,
        "version": package.module.version,
        "location": display(&package.module.location),
        "resolved": display(&package.module.resolved),
    })
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
