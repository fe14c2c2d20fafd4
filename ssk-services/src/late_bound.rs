//! Optional slot that can be attached after its owner is shared.
//!
//! Backed by `arc-swap`: readers never lock and always observe either the
//! previous value or the new one. `ArcSwap` only stores sized pointees, so
//! trait objects are kept behind one extra `Arc`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Lock-free, atomically replaceable optional reference.
pub struct LateBound<T: ?Sized> {
    slot: ArcSwapOption<Arc<T>>,
}

impl<T: ?Sized> LateBound<T> {
    /// Create an empty slot.
    pub fn empty() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }

    /// Current value, if attached.
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.load().as_deref().map(Arc::clone)
    }

    /// Attach `value`, replacing whatever was attached before.
    pub fn set(&self, value: Arc<T>) {
        self.slot.store(Some(Arc::new(value)));
    }

    /// Whether a value is attached.
    pub fn is_set(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl<T: ?Sized> Default for LateBound<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> std::fmt::Debug for LateBound<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LateBound")
            .field("set", &self.is_set())
            .finish()
    }
}
