//! Mutation rights on authored records.
//!
//! The acting identity is always resolved here: requests without one are
//! rejected by the auth middleware before any service runs.

use super::comment::Comment;
use super::error::DomainError;
use super::post::Post;

pub(crate) trait Authored {
    fn author_id(&self) -> i64;
}

impl Authored for Post {
    fn author_id(&self) -> i64 {
        self.author.id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author.id
    }
}

pub(crate) fn ensure_owner<R: Authored>(record: &R, actor_id: i64) -> Result<(), DomainError> {
    if record.author_id() == actor_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}
