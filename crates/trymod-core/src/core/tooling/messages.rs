use serde_json::{json, Map, Value};

use super::diagnostics::codes;
use super::errors::TryError;
use crate::packages::LoadFailure;
use crate::ExecutionOutcome;

/// Outcome for a run without package names.
#[must_use]
pub fn missing_argument_outcome() -> ExecutionOutcome {
    try_error_outcome(&TryError::MissingArgument)
}

pub(crate) fn try_error_outcome(err: &TryError) -> ExecutionOutcome {
    let mut details = Map::new();
    details.insert("reason".into(), Value::String(err.reason().into()));
    details.insert("code".into(), Value::String(err.code().into()));
    if let Some(hint) = err.hint() {
        details.insert("hint".into(), Value::String(hint));
    }
    if let Some(output) = err.output() {
        details.insert("stderr".into(), Value::String(output.to_string()));
    }
    if err.is_user_error() {
        ExecutionOutcome::user_error(err.to_string(), Value::Object(details))
    } else {
        ExecutionOutcome::failure(err.to_string(), Value::Object(details))
    }
}

/// Shapes any error, preferring a [`TryError`] found anywhere in the chain.
pub(crate) fn error_outcome(err: &anyhow::Error) -> ExecutionOutcome {
    if let Some(known) = err.chain().find_map(|cause| cause.downcast_ref::<TryError>()) {
        return try_error_outcome(known);
    }
    ExecutionOutcome::failure(
        format!("{err:#}"),
        json!({
            "reason": "unexpected_error",
            "code": codes::GENERIC,
        }),
    )
}

pub(crate) fn load_failures_outcome(failures: &[LoadFailure]) -> ExecutionOutcome {
    if let [single] = failures {
        let mut outcome = error_outcome(&single.error);
        if let Value::Object(map) = &mut outcome.details {
            map.insert("package".into(), Value::String(single.spec.raw().to_string()));
        }
        return outcome;
    }
    let all_user_errors = failures.iter().all(|failure| {
        failure
            .error
            .chain()
            .find_map(|cause| cause.downcast_ref::<TryError>())
            .is_some_and(TryError::is_user_error)
    });
    let issues: Vec<Value> = failures
        .iter()
        .map(|failure| {
            let code = failure
                .error
                .chain()
                .find_map(|cause| cause.downcast_ref::<TryError>())
                .map_or(codes::GENERIC, TryError::code);
            json!({
                "id": failure.spec.raw(),
                "code": code,
                "message": format!("{:#}", failure.error),
            })
        })
        .collect();
    let message = format!("{} packages could not be loaded", failures.len());
    let details = json!({
        "reason": "packages_failed",
        "issues": issues,
        "hint": "fix or drop the failing packages and retry",
    });
    if all_user_errors {
        ExecutionOutcome::user_error(message, details)
    } else {
        ExecutionOutcome::failure(message, details)
    }
}
