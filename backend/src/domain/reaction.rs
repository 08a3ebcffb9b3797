//! Like/dislike counter vocabulary.

use serde::{Deserialize, Serialize};

/// Which counter on a post a reaction targets.
///
/// The two counters are independent: liking never touches dislikes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    /// The `likes` counter.
    Like,
    /// The `dislikes` counter.
    Dislike,
}

impl ReactionKind {
    /// Path segment and log label for this counter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }

    /// JSON field carrying this counter on a post.
    pub fn counter_field(self) -> &'static str {
        match self {
            Self::Like => "likes",
            Self::Dislike => "dislikes",
        }
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a reaction adds to or withdraws from a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionDirection {
    /// `+1`.
    Add,
    /// `-1`, floor-clamped at zero.
    Remove,
}

impl ReactionDirection {
    /// Apply this direction to `count`, never going below zero.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::ReactionDirection;
    ///
    /// assert_eq!(ReactionDirection::Add.apply(0), 1);
    /// assert_eq!(ReactionDirection::Remove.apply(0), 0);
    /// ```
    pub fn apply(self, count: u64) -> u64 {
        match self {
            Self::Add => count.saturating_add(1),
            Self::Remove => count.saturating_sub(1),
        }
    }
}
