use std::io;
use std::path::PathBuf;

use super::diagnostics::codes;

/// Failures the workflow reports to the user by name.
///
/// Everything else travels as a plain `anyhow::Error` and surfaces as a
/// generic failure.
#[derive(thiserror::Error, Debug)]
pub enum TryError {
    #[error("You need to provide package name as first argument")]
    MissingArgument,
    #[error("'{spec}' does not name a package")]
    InvalidSpecifier { spec: String },
    #[error("Could not find package {name}")]
    PackageNotFound { name: String, output: String },
    #[error("npm load error: {reason}")]
    DependencyLoadError { reason: String },
    #[error("npm install error for '{spec}'")]
    DependencyInstallError { spec: String, output: String },
    #[error("'{name}' could not be loaded from {}: {reason}", path.display())]
    ModuleLoad {
        name: String,
        path: PathBuf,
        reason: String,
    },
    #[error("Could not remove cache at {}: {source}", path.display())]
    CacheClearFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TryError {
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingArgument => "missing_argument",
            Self::InvalidSpecifier { .. } => "invalid_specifier",
            Self::PackageNotFound { .. } => "package_not_found",
            Self::DependencyLoadError { .. } => "dependency_load_error",
            Self::DependencyInstallError { .. } => "dependency_install_error",
            Self::ModuleLoad { .. } => "module_load_error",
            Self::CacheClearFailure { .. } => "cache_clear_failure",
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingArgument => codes::MISSING_ARGUMENT,
            Self::InvalidSpecifier { .. } => codes::INVALID_SPECIFIER,
            Self::PackageNotFound { .. } => codes::PACKAGE_NOT_FOUND,
            Self::DependencyLoadError { .. } => codes::DEPENDENCY_LOAD,
            Self::DependencyInstallError { .. } => codes::DEPENDENCY_INSTALL,
            Self::ModuleLoad { .. } => codes::MODULE_LOAD,
            Self::CacheClearFailure { .. } => codes::CACHE_CLEAR,
        }
    }

    /// User errors exit with status 1; everything else is a failure.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument | Self::InvalidSpecifier { .. } | Self::PackageNotFound { .. }
        )
    }

    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingArgument => {
                Some("pass one or more package names, e.g. `trymodule lodash`".to_string())
            }
            Self::InvalidSpecifier { .. } => {
                Some("use a package name, `@scope/name`, or a repository URL".to_string())
            }
            Self::PackageNotFound { name, .. } => {
                Some(format!("check the spelling of '{name}' on the npm registry"))
            }
            Self::DependencyLoadError { .. } => {
                Some("install npm or point TRYMODULE_NPM at an npm executable".to_string())
            }
            Self::DependencyInstallError { .. } => {
                Some("inspect the npm output above, then retry".to_string())
            }
            Self::ModuleLoad { .. } => {
                Some("run `trymodule --clear` to drop the cached copy".to_string())
            }
            Self::CacheClearFailure { .. } => None,
        }
    }

    /// Captured tool output worth echoing back to the user.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::PackageNotFound { output, .. } | Self::DependencyInstallError { output, .. } => {
                Some(output.as_str()).filter(|text| !text.trim().is_empty())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_classified() {
        assert!(TryError::MissingArgument.is_user_error());
        assert!(TryError::PackageNotFound {
            name: "nope".into(),
            output: String::new(),
        }
        .is_user_error());
        assert!(!TryError::DependencyLoadError {
            reason: "npm missing".into(),
        }
        .is_user_error());
    }

    #[test]
    fn not_found_message_names_package() {
        let err = TryError::PackageNotFound {
            name: "left-padd".into(),
            output: "npm ERR! code E404".into(),
        };
        assert_eq!(err.to_string(), "Could not find package left-padd");
        assert_eq!(err.output(), Some("npm ERR! code E404"));
        assert_eq!(err.code(), codes::PACKAGE_NOT_FOUND);
    }
}
