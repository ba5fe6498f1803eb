use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// In-process mutual exclusion keyed by normalized package name.
///
/// Two specifiers that normalize to the same alias serialize their
/// probe/install/alias steps. Other processes sharing the cache are not
/// covered.
#[derive(Debug, Default)]
pub(crate) struct NameLocks {
    slots: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl NameLocks {
    pub(crate) fn slot(&self, name: &str) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(name.to_string()).or_default().clone()
    }
}
