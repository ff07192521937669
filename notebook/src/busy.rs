//! Single-slot busy flag guarding remote calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Advisory lock: true while a remote call is in flight.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    inner: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }

    /// Set the flag if it is clear. Returns `None` when already busy.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.inner
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                flag: self.inner.clone(),
            })
    }
}

/// Clears the flag when dropped, whether the call succeeded, failed, or the
/// awaiting future was dropped.
#[derive(Debug)]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
