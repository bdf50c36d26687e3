use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::user::Author;

/// `post_id` and `author` are fixed at creation; only `text` changes later.
#[derive(Debug, Clone)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) post_id: i64,
    pub(crate) author: Author,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct CommentRequest {
    pub(crate) text: String,
}

impl CommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let text = self.text.trim();
        if text.is_empty() || text.chars().count() > 10_000 {
            return Err(DomainError::Validation {
                field: "text",
                message: "must be 1..10000 chars",
            });
        }
        Ok(Self {
            text: text.to_string(),
        })
    }
}
