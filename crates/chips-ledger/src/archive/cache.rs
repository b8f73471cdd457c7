//! Bounded LRU cache of opened archives, keyed by date.
//!
//! Capacity is small (tens of dates), so recency is tracked with a plain
//! queue and linear touch.

use std::collections::VecDeque;

use ahash::AHashMap;

use super::handle::ArchiveHandle;

/// LRU cache of [`ArchiveHandle`]s.
///
/// # Thread safety
///
/// Not thread-safe. [`super::ArchiveResolver`] guards it with a mutex.
pub struct ArchiveCache {
    capacity: usize,
    entries: AHashMap<String, ArchiveHandle>,
    /// Front = least recently used.
    order: VecDeque<String>,
}

impl ArchiveCache {
    /// Create a cache holding at most `capacity` archives (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, entries: AHashMap::with_capacity(capacity), order: VecDeque::with_capacity(capacity) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, date: &str) -> bool {
        self.entries.contains_key(date)
    }

    /// Look up a date, marking it most recently used.
    pub fn get(&mut self, date: &str) -> Option<ArchiveHandle> {
        let handle = self.entries.get(date)?.clone();
        self.touch(date);
        Some(handle)
    }

    /// Insert or replace a date. Returns the evicted date, if any.
    pub fn insert(&mut self, date: &str, handle: ArchiveHandle) -> Option<String> {
        if self.entries.insert(date.to_string(), handle).is_some() {
            self.touch(date);
            return None;
        }
        self.order.push_back(date.to_string());

        if self.entries.len() > self.capacity {
            let evicted = self.order.pop_front()?;
            self.entries.remove(&evicted);
            return Some(evicted);
        }
        None
    }

    /// Cached dates, least recently used first.
    pub fn dates(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn touch(&mut self, date: &str) {
        if let Some(pos) = self.order.iter().position(|d| d == date) {
            if let Some(d) = self.order.remove(pos) {
                self.order.push_back(d);
            }
        }
    }
}

impl Default for ArchiveCache {
    fn default() -> Self {
        Self::new(chips_core::config::DEFAULT_CACHE_CAPACITY)
    }
}
