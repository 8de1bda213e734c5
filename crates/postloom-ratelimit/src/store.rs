// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage abstraction behind the rate limiter.
//!
//! The limiter's only shared mutable state is the per-key timestamp store.
//! It is a trait so tests use the in-memory map and production can swap in
//! a distributed backend, with the same atomicity contract: the
//! prune-and-append step for one key is a single critical section, and
//! different keys never block each other.

use dashmap::DashMap;

/// Outcome of the store's atomic prune-and-admit step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreAdmission {
    pub allowed: bool,
    /// Timestamps counted in the window after this call (including the
    /// one appended on admission).
    pub count: u32,
    /// Oldest timestamp remaining in the window, if any.
    pub oldest_ms: Option<i64>,
}

/// Per-key timestamp store with an atomic sliding-window admission step.
pub trait RateLimitStore: Send + Sync + 'static {
    /// Atomically drop timestamps older than `now_ms - window_ms` for
    /// `key`, then append `now_ms` and admit iff the pruned count is under
    /// `max_requests`.
    fn prune_and_admit(
        &self,
        key: &str,
        now_ms: i64,
        window_ms: i64,
        max_requests: u32,
    ) -> StoreAdmission;

    /// Prune and count without admitting a new request.
    fn count(&self, key: &str, now_ms: i64, window_ms: i64) -> u32;

    /// Oldest timestamp still inside the window, without admitting.
    fn oldest(&self, key: &str, now_ms: i64, window_ms: i64) -> Option<i64>;

    /// Drop all recorded timestamps for `key`.
    fn reset(&self, key: &str);
}

/// In-memory store backed by a sharded concurrent map.
///
/// The dashmap entry guard serializes prune-and-append per key; keys on
/// different shards proceed fully in parallel. Keys whose windows have
/// fully expired keep an empty row until `reset`; pruned rows stay small.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Vec<i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for MemoryStore {
    fn prune_and_admit(
        &self,
        key: &str,
        now_ms: i64,
        window_ms: i64,
        max_requests: u32,
    ) -> StoreAdmission {
        let mut entry = self.entries.entry(key.to_string()).or_default();
        entry.retain(|&t| t > now_ms - window_ms);

        if (entry.len() as u32) < max_requests {
            entry.push(now_ms);
            StoreAdmission {
                allowed: true,
                count: entry.len() as u32,
                oldest_ms: entry.first().copied(),
            }
        } else {
            StoreAdmission {
                allowed: false,
                count: entry.len() as u32,
                oldest_ms: entry.first().copied(),
            }
        }
    }

    fn count(&self, key: &str, now_ms: i64, window_ms: i64) -> u32 {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.retain(|&t| t > now_ms - window_ms);
                entry.len() as u32
            }
            None => 0,
        }
    }

    fn oldest(&self, key: &str, now_ms: i64, window_ms: i64) -> Option<i64> {
        let mut entry = self.entries.get_mut(key)?;
        entry.retain(|&t| t > now_ms - window_ms);
        entry.first().copied()
    }

    fn reset(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn admits_until_max_then_denies() {
        let store = MemoryStore::new();
        for i in 0..3 {
            let admission = store.prune_and_admit("k", 1_000 + i, 60_000, 3);
            assert!(admission.allowed, "request {i} should be admitted");
        }
        let denied = store.prune_and_admit("k", 1_010, 60_000, 3);
        assert!(!denied.allowed);
        assert_eq!(denied.count, 3);
        assert_eq!(denied.oldest_ms, Some(1_000));
    }

    #[test]
    fn expired_timestamps_are_pruned() {
        let store = MemoryStore::new();
        store.prune_and_admit("k", 1_000, 1_000, 1);
        // Window has passed; the old timestamp must not count.
        let admission = store.prune_and_admit("k", 2_500, 1_000, 1);
        assert!(admission.allowed);
        assert_eq!(admission.count, 1);
    }

    #[test]
    fn boundary_timestamp_is_dropped() {
        let store = MemoryStore::new();
        store.prune_and_admit("k", 1_000, 1_000, 1);
        // At exactly now - window the old timestamp is no longer counted.
        let admission = store.prune_and_admit("k", 2_000, 1_000, 1);
        assert!(admission.allowed);
    }

    #[test]
    fn oldest_reports_the_earliest_live_timestamp() {
        let store = MemoryStore::new();
        store.prune_and_admit("k", 1_000, 60_000, 5);
        store.prune_and_admit("k", 2_000, 60_000, 5);
        assert_eq!(store.oldest("k", 2_500, 60_000), Some(1_000));
        // Once 1_000 leaves the window, 2_000 is the oldest.
        assert_eq!(store.oldest("k", 61_500, 60_000), Some(2_000));
        assert_eq!(store.oldest("missing", 2_500, 60_000), None);
    }

    #[test]
    fn reset_clears_the_key() {
        let store = MemoryStore::new();
        store.prune_and_admit("k", 1_000, 60_000, 1);
        assert!(!store.prune_and_admit("k", 1_001, 60_000, 1).allowed);
        store.reset("k");
        assert!(store.prune_and_admit("k", 1_002, 60_000, 1).allowed);
    }

    #[test]
    fn keys_are_independent() {
        let store = MemoryStore::new();
        assert!(store.prune_and_admit("a", 1_000, 60_000, 1).allowed);
        assert!(store.prune_and_admit("b", 1_000, 60_000, 1).allowed);
        assert!(!store.prune_and_admit("a", 1_001, 60_000, 1).allowed);
    }

    #[test]
    fn concurrent_checks_never_overadmit() {
        let store = Arc::new(MemoryStore::new());
        let max = 5u32;
        let mut handles = Vec::new();
        for i in 0..32i64 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                store.prune_and_admit("shared", 1_000 + i, 60_000, max).allowed
            }));
        }
        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&allowed| allowed)
            .count();
        assert_eq!(admitted as u32, max);
    }
}
