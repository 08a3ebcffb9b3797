//! Error types for the blog client.

use thiserror::Error;

use crate::model::ReactionKind;

/// Failure talking to the blog API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Machine-readable code from the error payload, when present.
        code: Option<String>,
        /// Human-readable message from the error payload.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("invalid response: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },
}

impl ClientError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Why a reaction toggle did not take effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactionError {
    /// A toggle of the same counter on the same post is still awaiting the
    /// server. Nothing was changed.
    #[error("{kind:?} on post {post_id} is already in flight")]
    InFlight {
        /// Post being toggled.
        post_id: String,
        /// Counter being toggled.
        kind: ReactionKind,
    },

    /// The post is not in the current snapshot. Nothing was changed.
    #[error("post {post_id} is not loaded")]
    UnknownPost {
        /// Requested post.
        post_id: String,
    },

    /// The server rejected the change or could not be reached. The count and
    /// the local flag were restored to their pre-toggle values.
    #[error("reaction was not saved: {source}")]
    NotPersisted {
        /// Underlying API failure.
        #[source]
        source: ClientError,
    },
}
