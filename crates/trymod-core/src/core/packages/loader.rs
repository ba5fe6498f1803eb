use std::path::Path;
use std::sync::PoisonError;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;
use trymod_domain::PackageSpec;

use super::locks::NameLocks;
use super::module::LoadedModule;
use crate::reporter::ProgressEvent;
use crate::{CommandContext, TryError};

/// How the fan-out reacts when one specifier fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Stop at the first failure; nothing is bound.
    #[default]
    AbortOnFirst,
    /// Let every load finish and report all failures together.
    CollectAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadSource {
    Cached,
    Installed,
}

/// A specifier that resolved to a loadable package.
#[derive(Debug, Clone)]
pub struct InstalledPackage {
    pub spec: PackageSpec,
    /// Normalized name; also the alias under `node_modules`.
    pub name: String,
    pub module: LoadedModule,
    pub source: LoadSource,
}

#[derive(Debug)]
pub struct LoadFailure {
    pub spec: PackageSpec,
    pub error: anyhow::Error,
}

/// Per-specifier results in request order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<InstalledPackage>,
    pub failures: Vec<LoadFailure>,
}

/// Loads every specifier concurrently, one worker each.
///
/// # Errors
/// Returns an error only when the worker pool cannot be created; per-package
/// failures are collected in the report.
pub(crate) fn load_packages(
    ctx: &CommandContext,
    specs: &[PackageSpec],
    policy: LoadPolicy,
) -> Result<LoadReport> {
    let locks = NameLocks::default();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(specs.len().max(1))
        .thread_name(|idx| format!("trymodule-load-{idx}"))
        .build()
        .context("starting package loader threads")?;
    let load = |spec: &PackageSpec| {
        load_package(ctx, &locks, spec).map_err(|error| LoadFailure {
            spec: spec.clone(),
            error,
        })
    };
    let report = match policy {
        LoadPolicy::AbortOnFirst => {
            match pool.install(|| specs.par_iter().map(load).collect::<Result<Vec<_>, _>>()) {
                Ok(loaded) => LoadReport {
                    loaded,
                    failures: Vec::new(),
                },
                Err(failure) => LoadReport {
                    loaded: Vec::new(),
                    failures: vec![failure],
                },
            }
        }
        LoadPolicy::CollectAll => {
            let results: Vec<_> = pool.install(|| specs.par_iter().map(load).collect());
            let mut report = LoadReport::default();
            for result in results {
                match result {
                    Ok(package) => report.loaded.push(package),
                    Err(failure) => report.failures.push(failure),
                }
            }
            report
        }
    };
    Ok(report)
}

/// Loads one specifier from the cache, installing it first when needed.
pub(crate) fn load_package(
    ctx: &CommandContext,
    locks: &NameLocks,
    spec: &PackageSpec,
) -> Result<InstalledPackage> {
    let name = spec.normalized();
    if matches!(name, "" | "." | "..") {
        return Err(TryError::InvalidSpecifier {
            spec: spec.raw().to_string(),
        }
        .into());
    }
    let cache = ctx.config().cache();
    let location = cache.package_location(name);
    let slot = locks.slot(name);
    let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);

    let effects = ctx.effects();
    match effects.modules().load(&location) {
        Ok(module) => {
            ctx.report(&ProgressEvent::AlreadyInstalled {
                name: name.to_string(),
            });
            return Ok(InstalledPackage {
                spec: spec.clone(),
                name: name.to_string(),
                module,
                source: LoadSource::Cached,
            });
        }
        Err(err) => debug!(package = name, error = %format!("{err:#}"), "not loadable from cache"),
    }

    ctx.report(&ProgressEvent::Downloading {
        name: name.to_string(),
    });
    effects.fs().create_dir_all(&cache.root)?;
    let real = effects
        .packages()
        .install(ctx.config().npm().program.as_deref(), spec, &cache.root)
        .with_context(|| format!("installing {spec}"))?;
    debug!(package = name, directory = %real, "installed");

    if real != name {
        let fs = effects.fs();
        if fs.is_dangling_link(&location) {
            debug!(package = name, alias = %location.display(), "replacing dangling alias");
            fs.remove_link(&location)?;
        }
        if !fs.entry_exists(&location) {
            fs.symlink_dir(Path::new(&real), &location)
                .with_context(|| format!("aliasing {name} to {real}"))?;
            ctx.report(&ProgressEvent::Aliased {
                name: name.to_string(),
                target: real.clone(),
            });
        }
    }

    let module = effects
        .modules()
        .load(&location)
        .map_err(|err| TryError::ModuleLoad {
            name: name.to_string(),
            path: location.clone(),
            reason: format!("{err:#}"),
        })?;
    Ok(InstalledPackage {
        spec: spec.clone(),
        name: name.to_string(),
        module,
        source: LoadSource::Installed,
    })
}
