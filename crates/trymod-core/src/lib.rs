#![deny(clippy::all)]

mod core;

pub(crate) use crate::core::config::{self, context};
pub(crate) use crate::core::runtime::{effects, process};
pub(crate) use crate::core::tooling::{diagnostics, outcome, reporter};
pub(crate) use crate::core::{cache, packages, session, tooling};

pub use crate::core::commands::{clear_cache, try_packages, TryRequest};
pub use crate::core::config::context::{CommandContext, CommandGroup, CommandInfo};
pub use crate::core::config::{
    CacheConfig, Config, PackageManagerConfig, SessionConfig,
};
pub use crate::core::packages::{
    InstalledPackage, LoadFailure, LoadPolicy, LoadReport, LoadSource, LoadedModule,
    NodeModuleLoader, NpmPackageManager,
};
pub use crate::core::runtime::effects::{
    Effects, FileSystem, ModuleLoader, PackageManager, SessionRunner, SharedEffects,
    SystemEffects,
};
pub use crate::core::runtime::process::RunOutput;
pub use crate::core::session::{Binding, Namespace, NodeSession, SessionPlan};
pub use crate::core::tooling::diagnostics::codes as diag_codes;
pub use crate::core::tooling::errors::TryError;
pub use crate::core::tooling::missing_argument_outcome;
pub use crate::core::tooling::outcome::{CommandStatus, ExecutionOutcome};
pub use crate::core::tooling::reporter::{
    ProgressEvent, Reporter, SharedReporter, SilentReporter,
};
pub use crate::core::tooling::response::{format_status_message, to_json_response};
