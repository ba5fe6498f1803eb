use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use trymod_domain::binding_key;

use crate::packages::InstalledPackage;
use crate::reporter::{ProgressEvent, Reporter};

/// What a REPL identifier refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub package: String,
    /// Path handed to `require`.
    pub location: PathBuf,
    pub version: Option<String>,
}

/// Identifier to package mapping merged into the REPL context.
///
/// Keys are unique; binding an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Namespace {
    bindings: IndexMap<String, Binding>,
}

impl Namespace {
    pub fn bind(&mut self, key: impl Into<String>, binding: Binding) -> Option<Binding> {
        self.bindings.insert(key.into(), binding)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Binding> {
        self.bindings.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(key, binding)| (key.as_str(), binding))
    }
}

/// Folds loaded packages into a namespace, in request order.
pub(crate) fn bind_packages(packages: &[InstalledPackage], reporter: &dyn Reporter) -> Namespace {
    packages.iter().fold(Namespace::default(), |mut namespace, package| {
        let key = binding_key(&package.name);
        reporter.report(&ProgressEvent::Bound {
            name: package.name.clone(),
            key: key.clone(),
        });
        namespace.bind(
            key,
            Binding {
                package: package.name.clone(),
                location: package.module.location.clone(),
                version: package.module.version.clone(),
            },
        );
        namespace
    })
}
