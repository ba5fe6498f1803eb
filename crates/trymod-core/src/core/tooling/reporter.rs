use std::path::PathBuf;
use std::sync::Arc;

/// User-visible progress notices emitted while the workflow runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Starting,
    AlreadyInstalled { name: String },
    Downloading { name: String },
    Aliased { name: String, target: String },
    Bound { name: String, key: String },
    SessionStarting,
    ClearingCache { path: PathBuf },
    CacheCleared { path: PathBuf },
}

/// Sink for [`ProgressEvent`]s; the CLI renders them, tests record them.
pub trait Reporter: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

pub type SharedReporter = Arc<dyn Reporter>;

/// Drops every event. Used for `--json` and `--quiet`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _event: &ProgressEvent) {}
}
