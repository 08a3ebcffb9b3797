//! One page lifetime of client state.
//!
//! A [`BlogSession`] is created at page load and dropped on navigation. It
//! owns the [`PostCache`], talks to the server through a [`PostsApi`] and
//! keeps this browser's reaction flags in a [`FlagStore`].

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::api::PostsApi;
use crate::cache::{PostCache, SortOrder};
use crate::error::{ClientError, ReactionError};
use crate::flags::{FlagStore, flag_key};
use crate::model::{PostView, ReactionKind};
use crate::reactions::ReactionState;

type PendingKey = (String, ReactionKind);

/// Client cache, local flags and in-flight toggles for one page.
pub struct BlogSession {
    api: Arc<dyn PostsApi>,
    flags: Arc<dyn FlagStore>,
    cache: Mutex<PostCache>,
    pending: Mutex<HashSet<PendingKey>>,
}

/// Clears the in-flight marker for a toggle however it ends.
struct PendingGuard<'a> {
    pending: &'a Mutex<HashSet<PendingKey>>,
    key: Option<PendingKey>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            lock(self.pending).remove(&key);
        }
    }
}

// Neither lock is held across an await and every critical section leaves the
// data consistent, so recovering from poisoning is sound.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BlogSession {
    /// Start a session with an empty cache.
    pub fn new(api: Arc<dyn PostsApi>, flags: Arc<dyn FlagStore>) -> Self {
        Self {
            api,
            flags,
            cache: Mutex::new(PostCache::default()),
            pending: Mutex::new(HashSet::new()),
        }
    }

    /// Replace the cache with the server's current posts.
    ///
    /// # Errors
    /// Returns the API failure; the previous snapshot is kept.
    pub async fn refresh(&self) -> Result<usize, ClientError> {
        let posts = self.api.list_posts().await?;
        let count = posts.len();
        lock(&self.cache).replace(posts);
        debug!(count, "post cache refreshed");
        Ok(count)
    }

    /// Cached posts in display order.
    pub fn posts(&self, order: SortOrder) -> Vec<PostView> {
        lock(&self.cache).sorted(order)
    }

    /// Displayed state of one counter, or `None` when the post is not cached.
    pub fn reaction(&self, post_id: &str, kind: ReactionKind) -> Option<ReactionState> {
        let count = lock(&self.cache).count(post_id, kind)?;
        Some(ReactionState {
            active: self.flags.get(&flag_key(kind, post_id)),
            count,
        })
    }

    /// Toggle this browser's reaction on a post.
    ///
    /// The cache and the local flag change before the request is sent. On
    /// success the server's count replaces the optimistic one; on failure
    /// both are restored exactly and the error is returned.
    ///
    /// # Errors
    /// - [`ReactionError::InFlight`] when the same toggle is still pending.
    /// - [`ReactionError::UnknownPost`] when the post is not cached.
    /// - [`ReactionError::NotPersisted`] when the server did not apply it.
    pub async fn toggle(
        &self,
        post_id: &str,
        kind: ReactionKind,
    ) -> Result<ReactionState, ReactionError> {
        let _guard = self.begin(post_id, kind)?;
        let key = flag_key(kind, post_id);

        let before = {
            let mut cache = lock(&self.cache);
            let count = cache
                .count(post_id, kind)
                .ok_or_else(|| ReactionError::UnknownPost {
                    post_id: post_id.to_owned(),
                })?;
            let before = ReactionState {
                active: self.flags.get(&key),
                count,
            };
            let guess = before.toggled();
            cache.set_count(post_id, kind, guess.count);
            self.flags.write(&key, guess.active);
            before
        };

        match self.api.react(post_id, kind, before.direction()).await {
            Ok(server_count) => {
                let after = before.toggled().confirmed(server_count);
                lock(&self.cache).set_count(post_id, kind, after.count);
                Ok(after)
            }
            Err(source) => {
                lock(&self.cache).set_count(post_id, kind, before.count);
                self.flags.write(&key, before.active);
                warn!(
                    post_id,
                    kind = kind.path_segment(),
                    error = %source,
                    "reaction not saved; rolled back"
                );
                Err(ReactionError::NotPersisted { source })
            }
        }
    }

    fn begin(&self, post_id: &str, kind: ReactionKind) -> Result<PendingGuard<'_>, ReactionError> {
        let key = (post_id.to_owned(), kind);
        if !lock(&self.pending).insert(key.clone()) {
            return Err(ReactionError::InFlight {
                post_id: post_id.to_owned(),
                kind,
            });
        }
        Ok(PendingGuard {
            pending: &self.pending,
            key: Some(key),
        })
    }
}
