use std::fmt::Debug;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{SyncError, SyncResult};

/// Deferred continuation released once every flag is raised.
pub type ReadyWaiter = Box<dyn FnOnce()>;

/// Join point over a fixed set of one-way readiness flags.
///
/// Flags only ever move from `false` to `true`. Waiters registered before the
/// barrier resolves are released together, in registration order, by the
/// `set_ready` call that raises the last flag; waiters registered afterwards
/// run immediately.
pub struct ReadinessBarrier<K> {
    flags: SmallVec<[(K, bool); 4]>,
    waiters: Vec<ReadyWaiter>,
}

impl<K: Copy + Eq + Debug> ReadinessBarrier<K> {
    /// Creates a barrier over `flags`, all initially lowered. Duplicates collapse.
    #[must_use]
    pub fn new(flags: impl IntoIterator<Item = K>) -> Self {
        let mut unique: SmallVec<[(K, bool); 4]> = SmallVec::new();
        for flag in flags {
            if !unique.iter().any(|(known, _)| *known == flag) {
                unique.push((flag, false));
            }
        }
        Self {
            flags: unique,
            waiters: Vec::new(),
        }
    }

    /// Raises `flag`.
    ///
    /// Returns `Ok(true)` only for the call that completes the barrier. Raising
    /// an already raised flag is a no-op returning `Ok(false)`.
    pub fn set_ready(&mut self, flag: K) -> SyncResult<bool> {
        let Some(slot) = self.flags.iter_mut().find(|(known, _)| *known == flag) else {
            return Err(SyncError::UnknownFlag(format!("{flag:?}")));
        };
        if slot.1 {
            return Ok(false);
        }
        slot.1 = true;
        trace!(?flag, "readiness flag raised");

        if !self.is_all_ready() {
            return Ok(false);
        }

        let waiters = std::mem::take(&mut self.waiters);
        debug!(waiters = waiters.len(), "readiness barrier resolved");
        for waiter in waiters {
            waiter();
        }
        Ok(true)
    }

    /// Runs `waiter` once every flag is raised; immediately if that already holds.
    pub fn when_all_ready(&mut self, waiter: impl FnOnce() + 'static) {
        if self.is_all_ready() {
            waiter();
        } else {
            self.waiters.push(Box::new(waiter));
        }
    }

    #[must_use]
    pub fn is_ready(&self, flag: K) -> bool {
        self.flags
            .iter()
            .any(|(known, raised)| *known == flag && *raised)
    }

    #[must_use]
    pub fn is_all_ready(&self) -> bool {
        self.flags.iter().all(|(_, raised)| *raised)
    }

    /// Flags still holding the barrier closed, in declaration order.
    #[must_use]
    pub fn missing(&self) -> Vec<K> {
        self.flags
            .iter()
            .filter(|(_, raised)| !*raised)
            .map(|(flag, _)| *flag)
            .collect()
    }

    #[must_use]
    pub fn pending_waiters(&self) -> usize {
        self.waiters.len()
    }

    /// Drops every queued waiter without running it.
    pub fn cancel_waiters(&mut self) {
        self.waiters.clear();
    }
}

impl<K: Debug> Debug for ReadinessBarrier<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessBarrier")
            .field("flags", &self.flags)
            .field("waiters", &self.waiters.len())
            .finish()
    }
}
