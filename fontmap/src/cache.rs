// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded least-recently-used cache.

use core::hash::Hash;
use hashbrown::HashMap;

const NIL: usize = usize::MAX;

/// A slot in the recency list.
struct Slot<K, T> {
    key: K,
    data: T,
    prev: usize,
    next: usize,
}

/// A least-recently-used cache with hashed lookup.
///
/// Entries live in an arena of slots linked into a recency list, most
/// recently used first. Promotion and eviction relink slots in place and
/// never search the list. Every key in the index has exactly one slot in
/// the list and the reverse.
pub(crate) struct LruCache<K, T> {
    index: HashMap<K, usize>,
    slots: Vec<Option<Slot<K, T>>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    max_entries: usize,
}

impl<K: Hash + Eq + Clone, T> LruCache<K, T> {
    /// Creates a cache holding at most `max_entries` entries. A cache with
    /// no room stores nothing.
    pub(crate) fn new(max_entries: usize) -> Self {
        Self {
            index: HashMap::default(),
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            max_entries,
        }
    }

    /// Returns the entry for `key` and marks it most recently used.
    pub(crate) fn get(&mut self, key: &K) -> Option<&T> {
        let index = *self.index.get(key)?;
        self.unlink(index);
        self.push_front(index);
        self.slots[index].as_ref().map(|slot| &slot.data)
    }

    /// Inserts an entry as most recently used, evicting the least recently
    /// used entry when full. Returns the evicted entry.
    ///
    /// An existing entry for `key` is replaced.
    pub(crate) fn insert(&mut self, key: K, data: T) -> Option<(K, T)> {
        if self.max_entries == 0 {
            return None;
        }
        if let Some(index) = self.index.get(&key).copied() {
            self.unlink(index);
            self.push_front(index);
            if let Some(slot) = &mut self.slots[index] {
                slot.data = data;
            }
            return None;
        }
        let evicted = if self.index.len() >= self.max_entries {
            self.pop_back()
        } else {
            None
        };
        let slot = Slot {
            key: key.clone(),
            data,
            prev: NIL,
            next: NIL,
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(slot);
                index
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, index);
        self.push_front(index);
        evicted
    }

    /// Removes all entries.
    pub(crate) fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// Returns the number of entries.
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns the keys from most to least recently used.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        let mut cursor = self.head;
        core::iter::from_fn(move || {
            let slot = self.slots.get(cursor)?.as_ref()?;
            cursor = slot.next;
            Some(&slot.key)
        })
    }

    fn pop_back(&mut self) -> Option<(K, T)> {
        let index = self.tail;
        if index == NIL {
            return None;
        }
        self.unlink(index);
        let slot = self.slots[index].take()?;
        self.free.push(index);
        self.index.remove(&slot.key);
        Some((slot.key, slot.data))
    }

    fn unlink(&mut self, index: usize) {
        let Some(slot) = &self.slots[index] else {
            return;
        };
        let (prev, next) = (slot.prev, slot.next);
        match self.slots.get_mut(prev).and_then(Option::as_mut) {
            Some(prev_slot) => prev_slot.next = next,
            None => self.head = next,
        }
        match self.slots.get_mut(next).and_then(Option::as_mut) {
            Some(next_slot) => next_slot.prev = prev,
            None => self.tail = prev,
        }
        if let Some(slot) = &mut self.slots[index] {
            slot.prev = NIL;
            slot.next = NIL;
        }
    }

    fn push_front(&mut self, index: usize) {
        let old_head = self.head;
        if let Some(slot) = &mut self.slots[index] {
            slot.prev = NIL;
            slot.next = old_head;
        }
        match self.slots.get_mut(old_head).and_then(Option::as_mut) {
            Some(head_slot) => head_slot.prev = index,
            None => self.tail = index,
        }
        self.head = index;
    }
}

#[cfg(test)]
mod tests {
    use super::LruCache;

    fn keys(cache: &LruCache<&'static str, i32>) -> Vec<&'static str> {
        cache.keys().copied().collect()
    }

    #[test]
    fn retrieve_existing_entry() {
        let mut cache = LruCache::new(3);
        assert!(cache.insert("key1", 42).is_none(), "room left");
        assert_eq!(cache.get(&"key1"), Some(&42));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn recency_order() {
        let mut cache = LruCache::new(3);
        cache.insert("key1", 1);
        cache.insert("key2", 2);
        cache.insert("key3", 3);
        assert_eq!(keys(&cache), ["key3", "key2", "key1"]);
        cache.get(&"key1");
        assert_eq!(keys(&cache), ["key1", "key3", "key2"]);
        cache.get(&"key3");
        assert_eq!(keys(&cache), ["key3", "key1", "key2"]);
    }

    #[test]
    fn lru_eviction() {
        let mut cache = LruCache::new(3);
        cache.insert("key1", 1);
        cache.insert("key2", 2);
        cache.insert("key3", 3);

        // Touch key1 so that key2 becomes the oldest.
        assert_eq!(cache.get(&"key1"), Some(&1));

        assert_eq!(cache.insert("key4", 4), Some(("key2", 2)));
        assert_eq!(cache.get(&"key2"), None, "key2 should have been evicted");
        assert_eq!(cache.get(&"key1"), Some(&1), "key1 should remain");
        assert_eq!(cache.len(), 3);

        // The freed slot is reused.
        assert_eq!(cache.insert("key5", 5), Some(("key3", 3)));
        assert_eq!(keys(&cache), ["key5", "key1", "key4"]);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache = LruCache::new(0);
        assert!(cache.insert("key1", 1).is_none(), "nothing to evict");
        assert_eq!(cache.get(&"key1"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = LruCache::new(2);
        cache.insert("key1", 1);
        cache.insert("key2", 2);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(keys(&cache).is_empty(), "list is empty");
        cache.insert("key3", 3);
        assert_eq!(keys(&cache), ["key3"]);
    }
}
