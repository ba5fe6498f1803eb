use std::fmt;

use serde::Serialize;

use crate::name::normalize_package_name;

const REMOTE_PREFIXES: [&str; 9] = [
    "git+", "git:", "github:", "gitlab:", "bitbucket:", "gist:", "file:", "http:", "https:",
];

/// Where a specifier is fetched from, as far as naming is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SpecSource {
    /// `name`, `name@range`, `@scope/name` or `@scope/name@range`.
    Registry { name: String },
    /// URLs, git references, `user/repo` shorthands and local paths.
    Remote,
}

/// A user-supplied package specifier together with its derived alias.
///
/// The raw text is passed to the package manager unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    raw: String,
    normalized: String,
    source: SpecSource,
}

impl PackageSpec {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: normalize_package_name(raw),
            source: classify(raw),
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    #[must_use]
    pub fn source(&self) -> &SpecSource {
        &self.source
    }

    /// Registry package name with any version or tag removed.
    #[must_use]
    pub fn registry_name(&self) -> Option<&str> {
        match &self.source {
            SpecSource::Registry { name } => Some(name),
            SpecSource::Remote => None,
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn classify(raw: &str) -> SpecSource {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.contains("://")
        || trimmed.starts_with(['.', '/', '~'])
        || REMOTE_PREFIXES
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
    {
        return SpecSource::Remote;
    }
    let name = if let Some(scoped) = trimmed.strip_prefix('@') {
        let Some((scope, rest)) = scoped.split_once('/') else {
            return SpecSource::Remote;
        };
        let package = rest.split_once('@').map_or(rest, |(name, _)| name);
        if scope.is_empty() || package.is_empty() || package.contains('/') {
            return SpecSource::Remote;
        }
        format!("@{scope}/{package}")
    } else {
        if trimmed.contains('/') {
            return SpecSource::Remote;
        }
        let package = trimmed.split_once('@').map_or(trimmed, |(name, _)| name);
        if package.is_empty() {
            return SpecSource::Remote;
        }
        package.to_string()
    };
    SpecSource::Registry { name }
}
