//! Post and comment aggregates.
//!
//! A [`Post`] is the only top-level entity; comments live inside it and are
//! append-only. Every mutation goes through a method on `Post` so the
//! invariants below hold for any value reachable from the domain:
//!
//! - `title` is non-empty after trimming;
//! - `author` is never blank (blank input becomes [`DEFAULT_AUTHOR`]);
//! - `likes`/`dislikes` are unsigned and decrements clamp at zero;
//! - `updated_at >= created_at`.
//!
//! Timestamps are Unix epoch milliseconds, matching the persisted document.

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{Error, ReactionDirection, ReactionKind};

/// Author recorded when none (or only whitespace) is supplied.
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Unix epoch milliseconds.
pub type Millis = i64;

/// Opaque post identifier; lookups compare the exact string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostId(String);

/// Validation errors for [`PostId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostIdValidationError {
    /// Identifiers must contain at least one non-whitespace character.
    #[error("post id must not be empty")]
    Empty,
}

impl PostId {
    /// Wrap an existing identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, PostIdValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(PostIdValidationError::Empty);
        }
        Ok(Self(value))
    }

    /// Generate a fresh identifier for a newly created post.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PostId {
    type Error = PostIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostId> for String {
    fn from(value: PostId) -> Self {
        value.0
    }
}

/// A comment attached to exactly one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Identifier assigned on append; older records may lack one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name of the commenter.
    pub author: String,
    /// Comment body.
    pub content: String,
    /// Creation time.
    pub created_at: Millis,
}

/// Input for [`Post::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    /// Required; rejected when blank.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Optional author; blank becomes [`DEFAULT_AUTHOR`].
    pub author: Option<String>,
    /// Optional reference to an uploaded image.
    pub image_url: Option<String>,
}

/// Partial update applied by [`Post::apply_changes`]. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    /// Replacement title; rejected when blank.
    pub title: Option<String>,
    /// Replacement body.
    pub content: Option<String>,
    /// Replacement author; blank resets to [`DEFAULT_AUTHOR`].
    pub author: Option<String>,
    /// Replacement image reference.
    pub image_url: Option<String>,
}

/// Input for [`Post::add_comment`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewComment {
    /// Required; rejected when blank.
    pub content: String,
    /// Optional author; blank becomes [`DEFAULT_AUTHOR`].
    pub author: Option<String>,
}

/// Field values used to rebuild a post from storage.
///
/// [`Post::from_parts`] repairs anything that would break an invariant, so
/// adapters can hand over whatever they decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostParts {
    /// Identifier.
    pub id: PostId,
    /// Title as stored.
    pub title: String,
    /// Body as stored.
    pub content: String,
    /// Author as stored; blank becomes [`DEFAULT_AUTHOR`].
    pub author: String,
    /// Creation time.
    pub created_at: Millis,
    /// Last mutation time; raised to `created_at` when earlier.
    pub updated_at: Millis,
    /// Like counter.
    pub likes: u64,
    /// Dislike counter.
    pub dislikes: u64,
    /// Optional image reference.
    pub image_url: Option<String>,
    /// Comments in stored order.
    pub comments: Vec<Comment>,
}

/// The core content entity.
///
/// Serialize-only: stored documents come back through the persistence
/// adapter, which rebuilds posts with [`Post::from_parts`].
///
/// # Examples
/// ```
/// use blog_backend::domain::{NewPost, Post, PostId, ReactionDirection, ReactionKind};
///
/// let mut post = Post::create(
///     PostId::random(),
///     NewPost { title: "Hello".into(), content: "World".into(), ..NewPost::default() },
///     1_000,
/// )
/// .expect("valid post");
/// assert_eq!(post.author(), "Anonymous");
/// assert_eq!(post.react(ReactionKind::Like, ReactionDirection::Remove, 2_000), 0);
/// assert_eq!(post.updated_at(), 2_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    title: String,
    content: String,
    author: String,
    created_at: Millis,
    updated_at: Millis,
    likes: u64,
    dislikes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    comments: Vec<Comment>,
}

fn author_or_default(author: Option<String>) -> String {
    match author {
        Some(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_AUTHOR.to_owned(),
    }
}

fn blank_field_error(field: &str) -> Error {
    Error::invalid_request(format!("{field} must not be empty")).with_details(json!({
        "field": field,
        "code": "blank_field",
    }))
}

fn require_text(value: &str, field: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(blank_field_error(field));
    }
    Ok(())
}

impl Post {
    /// Build a brand-new post with zeroed counters and no comments.
    ///
    /// # Errors
    /// Returns an `invalid_request` error when the title is blank.
    pub fn create(id: PostId, draft: NewPost, now: Millis) -> Result<Self, Error> {
        require_text(&draft.title, "title")?;
        Ok(Self {
            id,
            title: draft.title,
            content: draft.content,
            author: author_or_default(draft.author),
            created_at: now,
            updated_at: now,
            likes: 0,
            dislikes: 0,
            image_url: draft.image_url.filter(|url| !url.trim().is_empty()),
            comments: Vec::new(),
        })
    }

    /// Rebuild a post from stored values, repairing broken invariants.
    pub fn from_parts(parts: PostParts) -> Self {
        let PostParts {
            id,
            title,
            content,
            author,
            created_at,
            updated_at,
            likes,
            dislikes,
            image_url,
            comments,
        } = parts;
        Self {
            id,
            title,
            content,
            author: author_or_default(Some(author)),
            created_at,
            updated_at: updated_at.max(created_at),
            likes,
            dislikes,
            image_url,
            comments,
        }
    }

    /// Identifier.
    pub fn id(&self) -> &PostId {
        &self.id
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Author display name.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Creation time.
    pub fn created_at(&self) -> Millis {
        self.created_at
    }

    /// Last mutation time.
    pub fn updated_at(&self) -> Millis {
        self.updated_at
    }

    /// Like counter.
    pub fn likes(&self) -> u64 {
        self.likes
    }

    /// Dislike counter.
    pub fn dislikes(&self) -> u64 {
        self.dislikes
    }

    /// Counter for the given reaction kind.
    pub fn count(&self, kind: ReactionKind) -> u64 {
        match kind {
            ReactionKind::Like => self.likes,
            ReactionKind::Dislike => self.dislikes,
        }
    }

    /// Image reference, if any.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Comments in append order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    fn touch(&mut self, now: Millis) {
        self.updated_at = now.max(self.created_at);
    }

    /// Apply a partial update.
    ///
    /// Validation happens before any field changes, so a rejected update
    /// leaves the post untouched.
    ///
    /// # Errors
    /// Returns an `invalid_request` error when a provided title is blank.
    pub fn apply_changes(&mut self, changes: PostChanges, now: Millis) -> Result<(), Error> {
        if let Some(title) = changes.title.as_deref() {
            require_text(title, "title")?;
        }
        let PostChanges {
            title,
            content,
            author,
            image_url,
        } = changes;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        if author.is_some() {
            self.author = author_or_default(author);
        }
        if let Some(image_url) = image_url {
            self.image_url = Some(image_url).filter(|url| !url.trim().is_empty());
        }
        self.touch(now);
        Ok(())
    }

    /// Move one counter by one step and return its new value.
    pub fn react(&mut self, kind: ReactionKind, direction: ReactionDirection, now: Millis) -> u64 {
        let counter = match kind {
            ReactionKind::Like => &mut self.likes,
            ReactionKind::Dislike => &mut self.dislikes,
        };
        *counter = direction.apply(*counter);
        let value = *counter;
        self.touch(now);
        value
    }

    /// Append a comment and return it.
    ///
    /// # Errors
    /// Returns an `invalid_request` error when the content is blank.
    pub fn add_comment(&mut self, comment: NewComment, now: Millis) -> Result<Comment, Error> {
        require_text(&comment.content, "content")?;
        let comment = Comment {
            id: Some(Uuid::new_v4().to_string()),
            author: author_or_default(comment.author),
            content: comment.content,
            created_at: now,
        };
        self.comments.push(comment.clone());
        self.touch(now);
        Ok(comment)
    }
}
