//! In-flight bookkeeping for group loads

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Set of group ids with a load currently running
#[derive(Debug, Default)]
pub struct LoadTracker {
    in_flight: Mutex<HashSet<i32>>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<i32>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `group_id` in flight. Returns `None` if it already is.
    ///
    /// The id stays marked until the returned guard is dropped.
    pub fn try_begin(&self, group_id: i32) -> Option<InFlightGuard<'_>> {
        if self.lock().insert(group_id) {
            Some(InFlightGuard {
                tracker: self,
                group_id,
            })
        } else {
            None
        }
    }

    pub fn is_in_flight(&self, group_id: i32) -> bool {
        self.lock().contains(&group_id)
    }

    pub fn is_idle(&self) -> bool {
        self.lock().is_empty()
    }

    /// Ids currently loading, ascending
    pub fn in_flight(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.lock().iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// Releases its group id from the tracker when dropped
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    tracker: &'a LoadTracker,
    group_id: i32,
}

impl InFlightGuard<'_> {
    pub fn group_id(&self) -> i32 {
        self.group_id
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.tracker.lock().remove(&self.group_id);
    }
}
