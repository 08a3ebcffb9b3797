//! Lenient on-disk representation of posts.
//!
//! The posts document carries no schema version and older writers omitted
//! fields, so every field is optional here. [`normalize_document`] runs once
//! at load and turns whatever parsed into well-formed domain [`Post`]s; no
//! code past this point has to second-guess the stored shape.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::{Comment, DEFAULT_AUTHOR, Millis, Post, PostId, PostParts};

/// A post as it may appear on disk.
///
/// Fields stay untyped so one mistyped value degrades to its default instead
/// of discarding the record.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PostRecord {
    id: Option<Value>,
    title: Option<Value>,
    content: Option<Value>,
    author: Option<Value>,
    created_at: Option<Value>,
    updated_at: Option<Value>,
    likes: Option<Value>,
    dislikes: Option<Value>,
    image_url: Option<Value>,
    comments: Option<Value>,
}

/// A comment as it may appear on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CommentRecord {
    id: Option<Value>,
    author: Option<Value>,
    content: Option<Value>,
    created_at: Option<Value>,
}

/// Identifiers were strings historically but some tools wrote numbers.
fn usable_id(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Text fields; anything that is not a string is dropped.
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text),
        _ => None,
    }
}

/// Numbers, or strings holding a number.
fn number(value: Option<Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|float| float.is_finite())
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "fractional millis truncate toward zero"
)]
fn millis(value: Option<Value>) -> Option<Millis> {
    match value {
        Some(Value::Number(exact)) if exact.is_i64() => exact.as_i64(),
        other => number(other).map(|float| float as Millis),
    }
}

/// Counters clamp to zero; fractional values round down.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "only finite positive floats reach the cast"
)]
fn counter(value: Option<Value>) -> u64 {
    match value {
        Some(Value::Number(exact)) if exact.is_u64() => exact.as_u64().unwrap_or(0),
        other => number(other)
            .filter(|float| *float > 0.0)
            .map_or(0, |float| float as u64),
    }
}

fn author(value: Option<Value>) -> String {
    text(value)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_owned())
}

impl CommentRecord {
    fn into_comment(self) -> Comment {
        Comment {
            id: usable_id(self.id),
            author: author(self.author),
            content: text(self.content).unwrap_or_default(),
            created_at: millis(self.created_at).unwrap_or(0),
        }
    }
}

impl PostRecord {
    /// Convert to a domain post, or `None` when the record has no usable id.
    pub(crate) fn into_post(self) -> Option<Post> {
        let id = PostId::new(usable_id(self.id)?).ok()?;
        let created_at = millis(self.created_at).unwrap_or(0);
        let comments = match self.comments {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                warn!(post_id = %id, "comments field is not a list; dropping it");
                Vec::new()
            }
        };
        let comments = comments
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<CommentRecord>(value) {
                Ok(record) => Some(record.into_comment()),
                Err(err) => {
                    warn!(post_id = %id, error = %err, "dropping unreadable comment");
                    None
                }
            })
            .collect();
        Some(Post::from_parts(PostParts {
            title: text(self.title).unwrap_or_default(),
            content: text(self.content).unwrap_or_default(),
            author: author(self.author),
            created_at,
            updated_at: millis(self.updated_at).unwrap_or(created_at),
            likes: counter(self.likes),
            dislikes: counter(self.dislikes),
            image_url: text(self.image_url).filter(|url| !url.trim().is_empty()),
            comments,
            id,
        }))
    }
}

/// Normalise a parsed posts document.
///
/// A top-level value that is not an array yields an empty collection.
/// Elements that are not objects or lack a usable id are dropped, and for
/// duplicate ids only the first occurrence survives.
pub(crate) fn normalize_document(document: Value) -> Vec<Post> {
    let Value::Array(items) = document else {
        warn!("posts document is not an array; treating as empty");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut posts = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!(index, "dropping non-object post record");
            continue;
        }
        let post = match serde_json::from_value::<PostRecord>(item) {
            Ok(record) => record.into_post(),
            Err(err) => {
                warn!(index, error = %err, "dropping unreadable post record");
                continue;
            }
        };
        let Some(post) = post else {
            warn!(index, "dropping post record without a usable id");
            continue;
        };
        if !seen.insert(post.id().clone()) {
            warn!(index, post_id = %post.id(), "dropping duplicate post id");
            continue;
        }
        posts.push(post);
    }
    posts
}
