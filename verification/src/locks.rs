//! Per-claim mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use truthmarket_types::ClaimId;

/// One mutex per claim. Phase checks and the writes they gate run inside
/// [`ClaimLocks::with_claim`], so operations on the same claim serialize
/// while different claims proceed in parallel.
///
/// Not reentrant: code running under a claim's lock must not take it again.
/// An entry lives only while some caller holds or waits on it.
#[derive(Default)]
pub struct ClaimLocks {
    locks: Mutex<HashMap<ClaimId, Arc<Mutex<()>>>>,
}

impl ClaimLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claim<T>(&self, claim: &ClaimId, f: impl FnOnce() -> T) -> T {
        let lock = {
            let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(claim.clone()).or_default())
        };
        let out = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only taken under the map lock: two references means
        // the map's and ours, so nobody else is waiting.
        if Arc::strong_count(&lock) == 2 {
            map.remove(claim);
        }
        out
    }

    /// Number of claims with a live lock entry.
    pub fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
