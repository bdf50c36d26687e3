use chrono::{DateTime, Utc};

use super::catalog::{CategoryRef, LocationRef};
use super::error::DomainError;
use super::user::Author;

#[derive(Debug, Clone)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) author: Author,
    pub(crate) category: Option<CategoryRef>,
    pub(crate) location: Option<LocationRef>,
    pub(crate) created_at: DateTime<Utc>,
}

/// A post as it appears in listings, with the number of its comments.
#[derive(Debug, Clone)]
pub(crate) struct PostListing {
    pub(crate) post: Post,
    pub(crate) comment_count: i64,
}

/// Author-supplied fields of a post, shared by create and edit.
///
/// `pub_date` and `is_published` are optional. On create they fall back to the
/// request time and `true`; on edit to the stored values.
#[derive(Debug, Clone)]
pub(crate) struct PostRequest {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: Option<DateTime<Utc>>,
    pub(crate) is_published: Option<bool>,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

impl PostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if let Some(id) = self.category_id {
            validate_positive_i64("category_id", id)?;
        }
        if let Some(id) = self.location_id {
            validate_positive_i64("location_id", id)?;
        }

        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            image: normalize_image(self.image)?,
            ..self
        })
    }
}

/// Staff override of the fields an author does not own alone: publication
/// and classification. Every field is replaced.
#[derive(Debug, Clone)]
pub(crate) struct PostModerationRequest {
    pub(crate) is_published: bool,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

impl PostModerationRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if let Some(id) = self.category_id {
            validate_positive_i64("category_id", id)?;
        }
        if let Some(id) = self.location_id {
            validate_positive_i64("location_id", id)?;
        }
        Ok(self)
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..256 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::Validation {
            field: "text",
            message: "must not be empty",
        });
    }
    Ok(text.to_string())
}

fn normalize_image(image: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(image) = image else {
        return Ok(None);
    };
    let image = image.trim();
    if image.is_empty() {
        return Ok(None);
    }
    if image.len() > 512 {
        return Err(DomainError::Validation {
            field: "image",
            message: "must be at most 512 bytes",
        });
    }
    Ok(Some(image.to_string()))
}
