//! Per-browser reaction flags.
//!
//! Flags record what *this* browser did and are never synchronised with the
//! server. A present key means the flag is set.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::model::ReactionKind;

/// Key under which a reaction flag is stored, e.g. `liked:<id>`.
///
/// # Examples
/// ```
/// use blog_client::{ReactionKind, flag_key};
///
/// assert_eq!(flag_key(ReactionKind::Dislike, "42"), "disliked:42");
/// ```
pub fn flag_key(kind: ReactionKind, post_id: &str) -> String {
    format!("{}:{post_id}", kind.flag_prefix())
}

/// String-keyed boolean storage, such as a browser's local storage.
pub trait FlagStore: Send + Sync {
    /// Whether `key` is set.
    fn get(&self, key: &str) -> bool;

    /// Set `key`.
    fn set(&self, key: &str);

    /// Clear `key`; clearing an unset key is a no-op.
    fn remove(&self, key: &str);

    /// Set or clear `key` according to `value`.
    fn write(&self, key: &str, value: bool) {
        if value {
            self.set(key);
        } else {
            self.remove(key);
        }
    }
}

/// Process-local [`FlagStore`].
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    keys: Mutex<HashSet<String>>,
}

impl MemoryFlagStore {
    fn with_keys<T>(&self, f: impl FnOnce(&mut HashSet<String>) -> T) -> T {
        // The set is always left consistent, so a poisoned lock is still usable.
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut keys)
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> bool {
        self.with_keys(|keys| keys.contains(key))
    }

    fn set(&self, key: &str) {
        self.with_keys(|keys| keys.insert(key.to_owned()));
    }

    fn remove(&self, key: &str) {
        self.with_keys(|keys| keys.remove(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn write_sets_and_clears() {
        let store = MemoryFlagStore::default();
        let key = flag_key(ReactionKind::Like, "a");

        store.write(&key, true);
        assert!(store.get("liked:a"));
        assert!(!store.get("disliked:a"));

        store.write(&key, false);
        assert!(!store.get("liked:a"));
        store.remove(&key);
    }
}
