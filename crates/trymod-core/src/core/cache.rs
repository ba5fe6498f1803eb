use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::reporter::ProgressEvent;
use crate::{CommandContext, TryError};

/// Removes the installed-packages subtree of the cache root.
///
/// History and anything else under the root are left alone. A missing
/// subtree counts as a failure.
pub(crate) fn clear_installed(ctx: &CommandContext) -> Result<PathBuf> {
    let target = ctx.config().cache().installed.clone();
    ctx.report(&ProgressEvent::ClearingCache {
        path: target.clone(),
    });
    debug!(path = %target.display(), "removing installed packages");
    ctx.effects()
        .fs()
        .remove_dir_all(&target)
        .map_err(|source| TryError::CacheClearFailure {
            path: target.clone(),
            source,
        })?;
    ctx.report(&ProgressEvent::CacheCleared {
        path: target.clone(),
    });
    Ok(target)
}
