//! Package acquisition: cache probe, npm install, alias, load.

mod loader;
mod locks;
mod module;
mod npm;

pub use loader::{InstalledPackage, LoadFailure, LoadPolicy, LoadReport, LoadSource};
pub use module::{LoadedModule, NodeModuleLoader};
pub use npm::NpmPackageManager;

pub(crate) use loader::load_packages;
