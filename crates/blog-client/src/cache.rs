//! Snapshot of the last fetched posts.

use crate::model::{PostView, ReactionKind};

/// Display ordering for cached posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most recently created first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Highest like count first; ties fall back to newest.
    MostLiked,
}

/// Last fetched posts, in server order.
///
/// Counts held here are display values: they may briefly carry an
/// optimistic guess until the server answers.
#[derive(Debug, Clone, Default)]
pub struct PostCache {
    posts: Vec<PostView>,
}

impl PostCache {
    /// Replace the snapshot wholesale.
    pub fn replace(&mut self, posts: Vec<PostView>) {
        self.posts = posts;
    }

    /// Look up one post.
    pub fn get(&self, post_id: &str) -> Option<&PostView> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    /// Displayed value of one counter.
    pub fn count(&self, post_id: &str, kind: ReactionKind) -> Option<u64> {
        self.get(post_id).map(|post| post.count(kind))
    }

    /// Overwrite one displayed counter. Returns `false` when the post is not
    /// cached.
    pub fn set_count(&mut self, post_id: &str, kind: ReactionKind, value: u64) -> bool {
        let Some(post) = self.posts.iter_mut().find(|post| post.id == post_id) else {
            return false;
        };
        post.set_count(kind, value);
        true
    }

    /// Posts in display order.
    pub fn sorted(&self, order: SortOrder) -> Vec<PostView> {
        let mut posts = self.posts.clone();
        match order {
            SortOrder::Newest => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => posts.sort_by_key(|post| post.created_at),
            SortOrder::MostLiked => posts.sort_by(|a, b| {
                b.likes
                    .cmp(&a.likes)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }
        posts
    }

    /// Number of cached posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
