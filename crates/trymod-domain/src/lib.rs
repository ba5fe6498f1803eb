//! Pure naming rules shared by the trymodule crates.

pub mod name;
pub mod spec;

pub use name::{binding_key, normalize_package_name, REPOSITORY_SUFFIX};
pub use spec::{PackageSpec, SpecSource};
