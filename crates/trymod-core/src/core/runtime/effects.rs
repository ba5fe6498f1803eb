use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use trymod_domain::PackageSpec;

use super::process::RunOutput;
use crate::packages::{LoadedModule, NodeModuleLoader, NpmPackageManager};
use crate::session::{NodeSession, SessionPlan};

pub trait PackageManager: Send + Sync {
    /// Installs `spec` under `root` and returns the directory name it landed
    /// in below `node_modules`.
    ///
    /// Classified failures are returned as [`crate::TryError`] values.
    fn install(&self, program: Option<&str>, spec: &PackageSpec, root: &Path) -> Result<String>;
}

pub trait ModuleLoader: Send + Sync {
    /// Loads the package at `location`, failing when it is absent or unreadable.
    fn load(&self, location: &Path) -> Result<LoadedModule>;
}

pub trait FileSystem: Send + Sync {
    /// True when anything, including a dangling symlink, exists at `path`.
    fn entry_exists(&self, path: &Path) -> bool;
    /// True when `path` is a symlink whose target does not exist.
    fn is_dangling_link(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Creates `link` pointing at `target`, which may be relative to the link.
    fn symlink_dir(&self, target: &Path, link: &Path) -> Result<()>;
    /// Removes the link itself, never what it points at.
    fn remove_link(&self, link: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

pub trait SessionRunner: Send + Sync {
    fn launch(&self, plan: &SessionPlan) -> Result<RunOutput>;
}

pub trait Effects: Send + Sync {
    fn packages(&self) -> &dyn PackageManager;
    fn modules(&self) -> &dyn ModuleLoader;
    fn fs(&self) -> &dyn FileSystem;
    fn session(&self) -> &dyn SessionRunner;
}

pub type SharedEffects = Arc<dyn Effects>;

pub struct SystemEffects {
    packages: Arc<NpmPackageManager>,
    modules: Arc<NodeModuleLoader>,
    fs: Arc<SystemFileSystem>,
    session: Arc<NodeSession>,
}

impl SystemEffects {
    #[must_use]
    pub fn new() -> Self {
        Self {
            packages: Arc::new(NpmPackageManager),
            modules: Arc::new(NodeModuleLoader),
            fs: Arc::new(SystemFileSystem),
            session: Arc::new(NodeSession),
        }
    }
}

impl Default for SystemEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects for SystemEffects {
    fn packages(&self) -> &dyn PackageManager {
        self.packages.as_ref()
    }

    fn modules(&self) -> &dyn ModuleLoader {
        self.modules.as_ref()
    }

    fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    fn session(&self) -> &dyn SessionRunner {
        self.session.as_ref()
    }
}

pub(crate) struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn entry_exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dangling_link(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
            && fs::metadata(path).is_err()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("creating {}", path.display()))
    }

    fn symlink_dir(&self, target: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        let created = std::os::unix::fs::symlink(target, link);
        #[cfg(windows)]
        let created = std::os::windows::fs::symlink_dir(target, link);
        created.with_context(|| {
            format!(
                "linking {} -> {}",
                link.display(),
                target.display()
            )
        })
    }

    fn remove_link(&self, link: &Path) -> Result<()> {
        #[cfg(unix)]
        let removed = fs::remove_file(link);
        #[cfg(windows)]
        let removed = fs::remove_dir(link);
        removed.with_context(|| format!("removing link {}", link.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory fakes for driving the workflow without npm or node.

    use std::collections::{BTreeMap, HashMap};
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use anyhow::{anyhow, Result};
    use trymod_domain::PackageSpec;

    use super::{Effects, FileSystem, ModuleLoader, PackageManager, SessionRunner};
    use crate::packages::LoadedModule;
    use crate::process::RunOutput;
    use crate::session::SessionPlan;

    /// Shared view of the fake `node_modules` tree: entry path to real path.
    #[derive(Default)]
    pub(crate) struct FakeTree {
        pub(crate) entries: Mutex<BTreeMap<PathBuf, PathBuf>>,
    }

    impl FakeTree {
        pub(crate) fn add_package(&self, path: &Path) {
            self.entries
                .lock()
                .expect("tree lock")
                .insert(path.to_path_buf(), path.to_path_buf());
        }

        /// Records a link whose target was never installed.
        pub(crate) fn add_dangling_link(&self, link: &Path, target: &Path) {
            self.entries
                .lock()
                .expect("tree lock")
                .insert(link.to_path_buf(), target.to_path_buf());
        }

        fn has_entry(&self, path: &Path) -> bool {
            self.entries.lock().expect("tree lock").contains_key(path)
        }

        fn resolve(&self, path: &Path) -> Option<PathBuf> {
            let entries = self.entries.lock().expect("tree lock");
            let real = entries.get(path)?;
            entries.contains_key(real).then(|| real.clone())
        }
    }

    pub(crate) struct FakePackageManager {
        tree: Arc<FakeTree>,
        /// Real directory names keyed by raw specifier; unknown specs are 404s.
        pub(crate) catalog: HashMap<String, String>,
        pub(crate) installs: Mutex<Vec<String>>,
    }

    impl PackageManager for FakePackageManager {
        fn install(&self, _program: Option<&str>, spec: &PackageSpec, root: &Path) -> Result<String> {
            self.installs
                .lock()
                .expect("installs lock")
                .push(spec.raw().to_string());
            let real = self.catalog.get(spec.raw()).ok_or_else(|| {
                anyhow::Error::new(crate::TryError::PackageNotFound {
                    name: spec.normalized().to_string(),
                    output: "npm ERR! code E404".to_string(),
                })
            })?;
            self.tree.add_package(&root.join("node_modules").join(real));
            Ok(real.clone())
        }
    }

    pub(crate) struct FakeModuleLoader {
        tree: Arc<FakeTree>,
    }

    impl ModuleLoader for FakeModuleLoader {
        fn load(&self, location: &Path) -> Result<LoadedModule> {
            let resolved = self
                .tree
                .resolve(location)
                .ok_or_else(|| anyhow!("cannot find module {}", location.display()))?;
            Ok(LoadedModule {
                location: location.to_path_buf(),
                name: resolved
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string()),
                resolved,
                version: Some("1.0.0".to_string()),
                entry: Some("index.js".to_string()),
            })
        }
    }

    pub(crate) struct FakeFileSystem {
        tree: Arc<FakeTree>,
        pub(crate) links: Mutex<Vec<(PathBuf, PathBuf)>>,
        pub(crate) created: Mutex<Vec<PathBuf>>,
        pub(crate) removed: Mutex<Vec<PathBuf>>,
    }

    impl FileSystem for FakeFileSystem {
        fn entry_exists(&self, path: &Path) -> bool {
            self.tree.has_entry(path)
        }

        fn is_dangling_link(&self, path: &Path) -> bool {
            self.tree.has_entry(path) && self.tree.resolve(path).is_none()
        }

        fn create_dir_all(&self, path: &Path) -> Result<()> {
            self.created
                .lock()
                .expect("created lock")
                .push(path.to_path_buf());
            Ok(())
        }

        fn symlink_dir(&self, target: &Path, link: &Path) -> Result<()> {
            let parent = link.parent().ok_or_else(|| anyhow!("link without parent"))?;
            let real = self
                .tree
                .resolve(&parent.join(target))
                .ok_or_else(|| anyhow!("dangling link target {}", target.display()))?;
            self.tree
                .entries
                .lock()
                .expect("tree lock")
                .insert(link.to_path_buf(), real);
            self.links
                .lock()
                .expect("links lock")
                .push((link.to_path_buf(), target.to_path_buf()));
            Ok(())
        }

        fn remove_link(&self, link: &Path) -> Result<()> {
            self.tree
                .entries
                .lock()
                .expect("tree lock")
                .remove(link)
                .map(|_| ())
                .ok_or_else(|| anyhow!("no link at {}", link.display()))
        }

        fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
            let mut entries = self.tree.entries.lock().expect("tree lock");
            let before = entries.len();
            entries.retain(|entry, _| !entry.starts_with(path));
            if entries.len() == before {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
            }
            self.removed
                .lock()
                .expect("removed lock")
                .push(path.to_path_buf());
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeSession {
        pub(crate) plans: Mutex<Vec<SessionPlan>>,
    }

    impl SessionRunner for FakeSession {
        fn launch(&self, plan: &SessionPlan) -> Result<RunOutput> {
            self.plans.lock().expect("plans lock").push(plan.clone());
            Ok(RunOutput {
                code: 0,
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    pub(crate) struct FakeEffects {
        pub(crate) tree: Arc<FakeTree>,
        pub(crate) packages: FakePackageManager,
        pub(crate) modules: FakeModuleLoader,
        pub(crate) fs: FakeFileSystem,
        pub(crate) session: FakeSession,
    }

    impl FakeEffects {
        pub(crate) fn with_catalog(entries: &[(&str, &str)]) -> Self {
            let tree = Arc::new(FakeTree::default());
            Self {
                packages: FakePackageManager {
                    tree: tree.clone(),
                    catalog: entries
                        .iter()
                        .map(|(spec, real)| ((*spec).to_string(), (*real).to_string()))
                        .collect(),
                    installs: Mutex::new(Vec::new()),
                },
                modules: FakeModuleLoader { tree: tree.clone() },
                fs: FakeFileSystem {
                    tree: tree.clone(),
                    links: Mutex::new(Vec::new()),
                    created: Mutex::new(Vec::new()),
                    removed: Mutex::new(Vec::new()),
                },
                session: FakeSession::default(),
                tree,
            }
        }

        pub(crate) fn installs(&self) -> Vec<String> {
            self.packages.installs.lock().expect("installs lock").clone()
        }

        pub(crate) fn links(&self) -> Vec<(PathBuf, PathBuf)> {
            self.fs.links.lock().expect("links lock").clone()
        }

        pub(crate) fn created_dirs(&self) -> Vec<PathBuf> {
            self.fs.created.lock().expect("created lock").clone()
        }
    }

    impl Effects for FakeEffects {
        fn packages(&self) -> &dyn PackageManager {
            &self.packages
        }

        fn modules(&self) -> &dyn ModuleLoader {
            &self.modules
        }

        fn fs(&self) -> &dyn FileSystem {
            &self.fs
        }

        fn session(&self) -> &dyn SessionRunner {
            &self.session
        }
    }
}
