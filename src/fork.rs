//! # Fork (Shared Resource)
//!
//! A fork is the unit of contention: an exclusively lockable resource
//! shared by the two philosophers seated on either side of it.
//!
//! The lock itself is a [`tokio::sync::Mutex`], so a philosopher waiting
//! for a fork suspends its task rather than blocking a runtime worker
//! thread. That suspension is load-bearing: under the deadlock strategy
//! every philosopher ends up parked in `acquire` forever, and the table
//! must still be able to run its grace-period join on the same runtime.
//!
//! Alongside the lock, each fork tracks its current holder in an atomic.
//! The holder is diagnostics only: it feeds log lines and the mutual
//! exclusion assertions in tests. It is never used for synchronization.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

/// Sentinel holder id meaning "nobody".
const NO_HOLDER: usize = usize::MAX;

/// An exclusively lockable fork, identified by its seat position.
#[derive(Debug)]
pub struct Fork {
    id: usize,
    lock: Mutex<()>,
    /// Diagnostics only. Written under the lock, so `Relaxed` would do,
    /// but the stronger ordering keeps `holder()` readable cross-task.
    holder: AtomicUsize,
}

/// RAII permit for a held fork. Dropping the guard releases the fork.
///
/// Guards are returned in acquisition order; callers drop them in
/// reverse order to release forks the way they were picked up.
pub struct ForkGuard<'a> {
    fork: &'a Fork,
    _permit: MutexGuard<'a, ()>,
}

impl Fork {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            lock: Mutex::new(()),
            holder: AtomicUsize::new(NO_HOLDER),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Suspends the calling task until the fork is free, then marks it
    /// held by `philosopher`.
    ///
    /// There is no timeout at this layer; bounding the wait is the
    /// table's concern (the grace-period join). No fairness is implied
    /// either: whichever waiter the mutex wakes first proceeds.
    pub async fn acquire(&self, philosopher: usize) -> ForkGuard<'_> {
        let permit = self.lock.lock().await;
        let previous = self.holder.swap(philosopher, Ordering::SeqCst);
        debug_assert_eq!(
            previous, NO_HOLDER,
            "fork {} acquired while still held by {}",
            self.id, previous
        );
        trace!(fork = self.id, philosopher, "fork acquired");
        ForkGuard {
            fork: self,
            _permit: permit,
        }
    }

    /// Current holder, if any. Diagnostics only: the answer can be stale
    /// by the time the caller looks at it.
    pub fn holder(&self) -> Option<usize> {
        match self.holder.load(Ordering::SeqCst) {
            NO_HOLDER => None,
            id => Some(id),
        }
    }
}

impl Drop for ForkGuard<'_> {
    fn drop(&mut self) {
        self.fork.holder.store(NO_HOLDER, Ordering::SeqCst);
        trace!(fork = self.fork.id, "fork released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn acquire_records_holder_and_drop_clears_it() {
        let fork = Fork::new(3);
        assert_eq!(fork.holder(), None);

        let guard = fork.acquire(7).await;
        assert_eq!(fork.holder(), Some(7));

        drop(guard);
        assert_eq!(fork.holder(), None);
    }

    #[tokio::test]
    async fn second_acquire_waits_until_release() {
        let fork = Arc::new(Fork::new(0));

        let guard = fork.acquire(0).await;

        // Philosopher 1 must not get the fork while 0 holds it.
        let contender = {
            let fork = fork.clone();
            tokio::spawn(async move {
                let _guard = fork.acquire(1).await;
                fork.holder()
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());
        assert_eq!(fork.holder(), Some(0));

        drop(guard);
        let observed = contender.await.unwrap();
        assert_eq!(observed, Some(1));
    }
}
