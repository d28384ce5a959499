use std::sync::atomic::{AtomicBool, Ordering};

/// One-shot arming flag that decides whether a pooled record is returned to its pool when its
/// handle goes away without an explicit release.
///
/// Every path that returns a record to its pool must first win [`disarm()`](Self::disarm).
/// Because disarming is a single compare-and-clear, at most one such path ever wins, so a record
/// cannot enter the free-list twice.
#[derive(Debug, Default)]
pub(crate) struct RetentionHook {
    armed: AtomicBool,
}

impl RetentionHook {
    pub(crate) fn new(armed: bool) -> Self {
        Self {
            armed: AtomicBool::new(armed),
        }
    }

    /// Arms the hook. Returns `false` if it was already armed, in which case nothing changes.
    pub(crate) fn arm(&self) -> bool {
        !self.armed.swap(true, Ordering::AcqRel)
    }

    /// Clears the hook. Returns `true` only for the one caller that observed it armed.
    pub(crate) fn disarm(&self) -> bool {
        self.armed
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}
