use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

pub(crate) const CACHE_ROOT_ENV: &str = "TRYMODULE_PATH";
pub(crate) const HISTORY_PATH_ENV: &str = "TRYMODULE_HISTORY_PATH";
pub(crate) const NONINTERACTIVE_ENV: &str = "TRYMODULE_NONINTERACTIVE";
pub(crate) const NPM_PROGRAM_ENV: &str = "TRYMODULE_NPM";
pub(crate) const NODE_PROGRAM_ENV: &str = "TRYMODULE_NODE";

const DEFAULT_ROOT_DIR: &str = ".trymodule";
const HISTORY_FILE: &str = "repl_history";
const INSTALLED_DIR: &str = "node_modules";

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Treats any non-empty value as set, except the usual spellings of "off".
    pub(crate) fn flag_is_set(&self, key: &str) -> bool {
        match self.var(key) {
            Some(value) => {
                let lowered = value.trim().to_ascii_lowercase();
                !matches!(lowered.as_str(), "" | "0" | "false" | "no" | "off")
            }
            None => false,
        }
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.var(key).filter(|value| !value.trim().is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) cache: CacheConfig,
    pub(crate) session: SessionConfig,
    pub(crate) npm: PackageManagerConfig,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    ///
    /// # Errors
    /// Returns an error if no cache root override is set and the home
    /// directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        let snapshot = EnvSnapshot::capture();
        Self::from_snapshot(&snapshot, dirs_next::home_dir().as_deref())
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot, home: Option<&Path>) -> Result<Self> {
        let root = match snapshot.non_empty(CACHE_ROOT_ENV) {
            Some(dir) => absolutize(PathBuf::from(dir)),
            None => home
                .ok_or_else(|| anyhow!("home directory not found; set {CACHE_ROOT_ENV}"))?
                .join(DEFAULT_ROOT_DIR),
        };
        let history = snapshot
            .non_empty(HISTORY_PATH_ENV)
            .map_or_else(|| root.join(HISTORY_FILE), |path| absolutize(PathBuf::from(path)));
        Ok(Self {
            cache: CacheConfig {
                installed: root.join(INSTALLED_DIR),
                history,
                root,
            },
            session: SessionConfig {
                interactive: !snapshot.flag_is_set(NONINTERACTIVE_ENV),
                node: snapshot.non_empty(NODE_PROGRAM_ENV).map(ToOwned::to_owned),
            },
            npm: PackageManagerConfig {
                program: snapshot.non_empty(NPM_PROGRAM_ENV).map(ToOwned::to_owned),
            },
        })
    }

    #[must_use]
    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    #[must_use]
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    #[must_use]
    pub fn npm(&self) -> &PackageManagerConfig {
        &self.npm
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::path::absolute(&path).unwrap_or(path)
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Install target handed to the package manager.
    pub root: PathBuf,
    /// `node_modules` under the root; the only subtree `--clear` removes.
    pub installed: PathBuf,
    pub history: PathBuf,
}

impl CacheConfig {
    #[must_use]
    pub fn package_location(&self, name: &str) -> PathBuf {
        self.installed.join(name)
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub interactive: bool,
    pub node: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PackageManagerConfig {
    pub program: Option<String>,
}
