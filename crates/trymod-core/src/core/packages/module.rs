use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::effects::ModuleLoader;

const INDEX_ENTRIES: [&str; 3] = ["index.js", "index.json", "index.node"];
const ENTRY_EXTENSIONS: [&str; 3] = ["js", "json", "node"];

/// A package directory that node can `require`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedModule {
    /// Path the package was requested through (usually the alias).
    pub location: PathBuf,
    /// Canonical directory after following links.
    pub resolved: PathBuf,
    pub name: Option<String>,
    pub version: Option<String>,
    /// Entry file relative to `resolved`; `None` when only `exports` is declared.
    pub entry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    name: Option<String>,
    version: Option<String>,
    main: Option<String>,
    exports: Option<serde_json::Value>,
}

/// Probes package directories the way node's resolver would find them.
pub struct NodeModuleLoader;

impl ModuleLoader for NodeModuleLoader {
    fn load(&self, location: &Path) -> Result<LoadedModule> {
        let resolved = fs::canonicalize(location)
            .with_context(|| format!("cannot find module {}", location.display()))?;
        if !resolved.is_dir() {
            bail!("{} is not a package directory", location.display());
        }
        let manifest_path = resolved.join("package.json");
        let manifest = if manifest_path.is_file() {
            let contents = fs::read_to_string(&manifest_path)
                .with_context(|| format!("reading {}", manifest_path.display()))?;
            let parsed: PackageManifest = serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", manifest_path.display()))?;
            Some(parsed)
        } else {
            None
        };
        let declared_main = manifest.as_ref().and_then(|m| m.main.as_deref());
        let entry = resolve_entry(&resolved, declared_main);
        let has_exports = manifest.as_ref().is_some_and(|m| m.exports.is_some());
        if entry.is_none() && !has_exports {
            bail!("{} has no loadable entry point", location.display());
        }
        let manifest = manifest.unwrap_or_default();
        Ok(LoadedModule {
            location: location.to_path_buf(),
            resolved,
            name: manifest.name,
            version: manifest.version,
            entry,
        })
    }
}

fn resolve_entry(dir: &Path, main: Option<&str>) -> Option<String> {
    if let Some(main) = main.map(str::trim).filter(|main| !main.is_empty()) {
        let main = main.trim_start_matches("./");
        let mut candidates = vec![main.to_string()];
        candidates.extend(ENTRY_EXTENSIONS.iter().map(|ext| format!("{main}.{ext}")));
        candidates.extend(INDEX_ENTRIES.iter().map(|index| format!("{main}/{index}")));
        if let Some(found) = candidates.into_iter().find(|c| dir.join(c).is_file()) {
            return Some(found);
        }
    }
    INDEX_ENTRIES
        .iter()
        .find(|index| dir.join(index).is_file())
        .map(|index| (*index).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().expect("parent")).expect("dirs");
        fs::write(path, contents).expect("write");
    }

    #[test]
    fn loads_manifest_main() {
        let temp = tempfile::tempdir().expect("tempdir");
        let pkg = temp.path().join("left-pad");
        write(
            &pkg.join("package.json"),
            r#"{"name":"left-pad","version":"1.3.0","main":"lib/pad"}"#,
        );
        write(&pkg.join("lib/pad.js"), "module.exports = 1;");
        let module = NodeModuleLoader.load(&pkg).expect("load");
        assert_eq!(module.name.as_deref(), Some("left-pad"));
        assert_eq!(module.version.as_deref(), Some("1.3.0"));
        assert_eq!(module.entry.as_deref(), Some("lib/pad.js"));
    }

    #[test]
    fn falls_back_to_index_without_manifest() {
        let temp = tempfile::tempdir().expect("tempdir");
        let pkg = temp.path().join("bare");
        write(&pkg.join("index.js"), "module.exports = {};");
        let module = NodeModuleLoader.load(&pkg).expect("load");
        assert_eq!(module.entry.as_deref(), Some("index.js"));
        assert!(module.name.is_none());
    }

    #[test]
    fn exports_only_packages_load() {
        let temp = tempfile::tempdir().expect("tempdir");
        let pkg = temp.path().join("modern");
        write(
            &pkg.join("package.json"),
            r#"{"name":"modern","exports":{".":"./dist/main.cjs"}}"#,
        );
        let module = NodeModuleLoader.load(&pkg).expect("load");
        assert!(module.entry.is_none());
    }

    #[test]
    fn absent_and_broken_packages_fail() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert!(NodeModuleLoader.load(&temp.path().join("missing")).is_err());

        let broken = temp.path().join("broken");
        write(&broken.join("package.json"), "{ not json");
        assert!(NodeModuleLoader.load(&broken).is_err());

        let empty = temp.path().join("empty");
        fs::create_dir_all(&empty).expect("dirs");
        assert!(NodeModuleLoader.load(&empty).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn follows_aliases() {
        let temp = tempfile::tempdir().expect("tempdir");
        let modules = temp.path().join("node_modules");
        write(
            &modules.join("real-name/package.json"),
            r#"{"name":"real-name","version":"2.0.0"}"#,
        );
        write(&modules.join("real-name/index.js"), "");
        std::os::unix::fs::symlink("real-name", modules.join("alias")).expect("symlink");
        let module = NodeModuleLoader.load(&modules.join("alias")).expect("load");
        assert_eq!(module.location, modules.join("alias"));
        assert!(module.resolved.ends_with("real-name"));
    }
}
