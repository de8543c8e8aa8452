use std::sync::Arc;

use parking_lot::Mutex;
use shared::{MvcError, RegistryKind};

/// Process-wide slot holding at most one registry instance.
pub(crate) struct Singleton<T> {
    kind: RegistryKind,
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> Singleton<T> {
    pub(crate) const fn new(kind: RegistryKind) -> Self {
        Self {
            kind,
            slot: parking_lot::const_mutex(None),
        }
    }

    /// `init` must not touch this same slot.
    pub(crate) fn get_or_init(&self, init: impl FnOnce() -> Arc<T>) -> Arc<T> {
        let mut slot = self.slot.lock();
        if let Some(existing) = slot.as_ref() {
            return Arc::clone(existing);
        }

        let instance = init();
        *slot = Some(Arc::clone(&instance));
        tracing::debug!(registry = %self.kind, "constructed singleton");
        instance
    }

    pub(crate) fn try_init(&self, init: impl FnOnce() -> Arc<T>) -> Result<Arc<T>, MvcError> {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            return Err(MvcError::AlreadyInitialized(self.kind));
        }

        let instance = init();
        *slot = Some(Arc::clone(&instance));
        tracing::debug!(registry = %self.kind, "constructed singleton");
        Ok(instance)
    }

    pub(crate) fn current(&self) -> Option<Arc<T>> {
        self.slot.lock().clone()
    }

    pub(crate) fn clear(&self) {
        if self.slot.lock().take().is_some() {
            tracing::debug!(registry = %self.kind, "disposed singleton");
        }
    }
}
