//! Mutual exclusion between backup triggers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-wide "backup in progress" flag shared by the daily and weekly
/// triggers so their runs never overlap, even when the schedules coincide
/// or a run outlasts its cadence.
///
/// Try-acquire semantics only: a trigger that loses the race skips its cycle
/// instead of queueing behind the winner.
#[derive(Clone, Default)]
pub struct BackupLock {
    in_progress: Arc<AtomicBool>,
}

impl BackupLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock if no run holds it. The returned guard releases on
    /// drop.
    pub fn try_acquire(&self) -> Option<BackupLockGuard> {
        self.in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BackupLockGuard {
                in_progress: Arc::clone(&self.in_progress),
            })
    }
}

/// RAII guard for [`BackupLock`].
pub struct BackupLockGuard {
    in_progress: Arc<AtomicBool>,
}

impl Drop for BackupLockGuard {
    fn drop(&mut self) {
        self.in_progress.store(false, Ordering::SeqCst);
    }
}
