use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, trace};
use trymod_domain::PackageSpec;

use crate::effects::PackageManager;
use crate::process::{run_command, RunOutput};
use crate::TryError;

const NOT_FOUND_MARKERS: [&str; 3] = ["E404", "404 Not Found", "is not in this registry"];

/// Installs packages by shelling out to `npm install --prefix <root>`.
pub struct NpmPackageManager;

impl PackageManager for NpmPackageManager {
    fn install(&self, program: Option<&str>, spec: &PackageSpec, root: &Path) -> Result<String> {
        let npm = resolve_program(program)?;
        let before = saved_dependencies(root);
        let args = install_args(spec, root);
        debug!(npm = %npm, spec = %spec, root = %root.display(), "running npm install");
        let output = run_command(&npm, &args, &[], root).map_err(|err| {
            TryError::DependencyLoadError {
                reason: format!("{err:#}"),
            }
        })?;
        trace!(code = output.code, stdout = %output.stdout, stderr = %output.stderr, "npm finished");
        if !output.success() {
            return Err(classify_failure(spec, &output).into());
        }
        let after = saved_dependencies(root);
        installed_dir_name(spec, &before, &after).ok_or_else(|| {
            TryError::DependencyInstallError {
                spec: spec.raw().to_string(),
                output: format!(
                    "npm succeeded but the installed directory for '{spec}' could not be determined"
                ),
            }
            .into()
        })
    }
}

fn resolve_program(program: Option<&str>) -> Result<String, TryError> {
    if let Some(program) = program {
        return Ok(program.to_string());
    }
    which::which("npm")
        .map(|path| path.display().to_string())
        .map_err(|err| TryError::DependencyLoadError {
            reason: format!("npm executable not found ({err})"),
        })
}

fn install_args(spec: &PackageSpec, root: &Path) -> Vec<String> {
    vec![
        "install".to_string(),
        "--prefix".to_string(),
        root.display().to_string(),
        "--no-audit".to_string(),
        "--no-fund".to_string(),
        "--loglevel".to_string(),
        "error".to_string(),
        spec.raw().to_string(),
    ]
}

fn classify_failure(spec: &PackageSpec, output: &RunOutput) -> TryError {
    let combined = output.combined();
    if NOT_FOUND_MARKERS
        .iter()
        .any(|marker| combined.contains(marker))
    {
        return TryError::PackageNotFound {
            name: spec.normalized().to_string(),
            output: combined,
        };
    }
    TryError::DependencyInstallError {
        spec: spec.raw().to_string(),
        output: combined,
    }
}

#[derive(Debug, Default, Deserialize)]
struct RootManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

/// Dependencies npm recorded in `<root>/package.json`; empty when absent.
fn saved_dependencies(root: &Path) -> BTreeMap<String, String> {
    fs::read_to_string(root.join("package.json"))
        .ok()
        .and_then(|contents| serde_json::from_str::<RootManifest>(&contents).ok())
        .unwrap_or_default()
        .dependencies
}

/// Name of the directory npm created under `node_modules` for `spec`.
///
/// Registry specifiers carry it directly. For everything else a saved
/// dependency entry that names the specifier wins; only when none does is
/// the single entry that changed during the install taken. Sibling installs
/// share the root manifest, so the diff alone can point at another package.
fn installed_dir_name(
    spec: &PackageSpec,
    before: &BTreeMap<String, String>,
    after: &BTreeMap<String, String>,
) -> Option<String> {
    if let Some(name) = spec.registry_name() {
        return Some(name.to_string());
    }
    let alias = spec.normalized();
    let matching = after.iter().find(|(name, value)| {
        name.as_str() == alias || value.contains(spec.raw()) || value.contains(alias)
    });
    if let Some((name, _)) = matching {
        return Some(name.clone());
    }
    let changed: Vec<&String> = after
        .iter()
        .filter(|(name, value)| before.get(*name) != Some(*value))
        .map(|(name, _)| name)
        .collect();
    match changed.as_slice() {
        [only] => Some((*only).clone()),
        _ => None,
    }
}
