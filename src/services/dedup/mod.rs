//! Time-windowed interaction deduplication cache.
//!
//! Suppresses duplicate interaction writes under client retry storms. Keyed
//! by user + item + action with a short TTL window. Explicitly constructed
//! and injected at service startup so tests can substitute a deterministic
//! window; the ranking pipeline itself never touches it.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::models::InteractionAction;

pub struct InteractionDedupCache {
    entries: DashMap<String, Instant>,
    window: Duration,
}

impl InteractionDedupCache {
    pub fn new(window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            window,
        }
    }

    /// Record an interaction and report whether it is a duplicate inside the
    /// window.
    ///
    /// On concurrent contention over the same key the check degrades to
    /// "not a duplicate" rather than blocking; an occasional double write is
    /// acceptable, a stalled request path is not.
    pub fn check_and_record(
        &self,
        user_id: Uuid,
        item_id: &str,
        action: InteractionAction,
    ) -> bool {
        let key = format!("{}:{}:{}", user_id, item_id, action.as_str());

        match self.entries.try_entry(key) {
            Some(Entry::Occupied(mut occupied)) => {
                if occupied.get().elapsed() < self.window {
                    true
                } else {
                    occupied.insert(Instant::now());
                    false
                }
            }
            Some(Entry::Vacant(vacant)) => {
                vacant.insert(Instant::now());
                false
            }
            None => {
                debug!(
                    user_id = %user_id,
                    item_id = item_id,
                    "Dedup entry contended, treating as not a duplicate"
                );
                false
            }
        }
    }

    /// Drop entries older than the window. Intended for a periodic sweep.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, recorded| recorded.elapsed() < self.window);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
