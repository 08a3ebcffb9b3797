//! Wire shapes returned by the blog API.
//!
//! These mirror the server's JSON rather than its domain types, so the
//! client builds without the backend crate.

use serde::{Deserialize, Serialize};

/// A comment as delivered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// Missing on comments written before ids were assigned.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name of the commenter.
    pub author: String,
    /// Comment body.
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// A post as delivered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// Server-assigned identifier.
    pub id: String,
    /// Post title.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Display name of the author.
    pub author: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    /// Like counter as last seen.
    #[serde(default)]
    pub likes: u64,
    /// Dislike counter as last seen.
    #[serde(default)]
    pub dislikes: u64,
    /// Location of an uploaded image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Comments, oldest first.
    #[serde(default)]
    pub comments: Vec<CommentView>,
}

impl PostView {
    /// Current value of one counter.
    pub const fn count(&self, kind: ReactionKind) -> u64 {
        match kind {
            ReactionKind::Like => self.likes,
            ReactionKind::Dislike => self.dislikes,
        }
    }

    pub(crate) const fn set_count(&mut self, kind: ReactionKind, value: u64) {
        match kind {
            ReactionKind::Like => self.likes = value,
            ReactionKind::Dislike => self.dislikes = value,
        }
    }
}

/// Which counter a reaction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionKind {
    /// The `likes` counter.
    Like,
    /// The `dislikes` counter.
    Dislike,
}

impl ReactionKind {
    /// Endpoint segment under `/api/posts/{id}/`.
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }

    /// Field carrying the counter in reaction responses.
    pub const fn counter_field(self) -> &'static str {
        match self {
            Self::Like => "likes",
            Self::Dislike => "dislikes",
        }
    }

    /// Prefix of the local flag key.
    pub const fn flag_prefix(self) -> &'static str {
        match self {
            Self::Like => "liked",
            Self::Dislike => "disliked",
        }
    }
}

/// Whether a reaction adds to or withdraws from a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionDirection {
    /// `POST`: increment.
    Add,
    /// `DELETE`: decrement, clamped at zero.
    Remove,
}
