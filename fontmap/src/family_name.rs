// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Case-insensitive handling of font family names.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// Map from case-folded family names to values.
#[derive(Clone, Debug)]
pub(crate) struct NameMap<T> {
    map: HashMap<Arc<[u8]>, T>,
}

impl<T> Default for NameMap<T> {
    fn default() -> Self {
        Self {
            map: HashMap::default(),
        }
    }
}

impl<T> NameMap<T> {
    pub(crate) fn get(&self, name: &str) -> Option<&T> {
        let key = NameKey::from_str(name);
        self.map.get(key.as_bytes())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts the value unless the name is already present. Returns false
    /// if nothing was inserted.
    pub(crate) fn insert(&mut self, name: &str, value: T) -> bool {
        let key = NameKey::from_str(name);
        if self.map.contains_key(key.as_bytes()) {
            return false;
        }
        self.map.insert(key.as_bytes().into(), value);
        true
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<T> {
        let key = NameKey::from_str(name);
        self.map.remove(key.as_bytes())
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}

/// Key for case-insensitive lookup of family names.
#[derive(Default)]
pub(crate) struct NameKey {
    data: SmallVec<[u8; 128]>,
}

impl NameKey {
    pub(crate) fn from_str(s: &str) -> Self {
        let mut res = Self::default();
        let mut buf = [0_u8; 4];
        for ch in s.chars() {
            for ch in ch.to_lowercase() {
                res.data
                    .extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
        res
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Orders two family names ignoring case.
pub(crate) fn cmp_names(a: &str, b: &str) -> Ordering {
    NameKey::from_str(a)
        .as_bytes()
        .cmp(NameKey::from_str(b).as_bytes())
}

/// Compares two family names ignoring case.
pub(crate) fn eq_names(a: &str, b: &str) -> bool {
    cmp_names(a, b) == Ordering::Equal
}

/// Feeds the case-folded form of a name into a hasher.
pub(crate) fn hash_name<H: Hasher>(name: &str, state: &mut H) {
    NameKey::from_str(name).as_bytes().hash(state);
}

#[cfg(test)]
mod tests {
    use super::{NameMap, cmp_names, eq_names};
    use core::cmp::Ordering;

    #[test]
    fn names_fold_case() {
        assert!(eq_names("DejaVu Sans", "dejavu sans"), "case is ignored");
        assert!(!eq_names("DejaVu Sans", "DejaVu Serif"), "names differ");
        assert_eq!(cmp_names("arial", "Bitstream"), Ordering::Less);
    }

    #[test]
    fn name_map_rejects_duplicates() {
        let mut map = NameMap::default();
        assert!(map.insert("Noto Sans", 1), "first insert succeeds");
        assert!(!map.insert("NOTO SANS", 2), "duplicate is rejected");
        assert_eq!(map.get("noto sans"), Some(&1));
        assert_eq!(map.remove("Noto sans"), Some(1));
        assert!(!map.contains("Noto Sans"), "removed");
    }
}
