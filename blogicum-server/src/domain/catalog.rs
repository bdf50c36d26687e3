//! Categories and locations. Both are managed by staff and only referenced by
//! posts.

use chrono::{DateTime, Utc};

use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct Category {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
}

/// Category fields a post needs to decide its own visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryRef {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) is_published: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Location {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocationRef {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) is_published: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryRequest {
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) is_published: bool,
}

impl CategoryRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let slug = normalize_slug(&self.slug)?;
        let title = self.title.trim();
        if title.is_empty() || title.chars().count() > 256 {
            return Err(DomainError::Validation {
                field: "title",
                message: "must be 1..256 chars",
            });
        }
        Ok(Self {
            slug,
            title: title.to_string(),
            description: self.description.trim().to_string(),
            is_published: self.is_published,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LocationRequest {
    pub(crate) name: String,
    pub(crate) is_published: bool,
}

impl LocationRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > 256 {
            return Err(DomainError::Validation {
                field: "name",
                message: "must be 1..256 chars",
            });
        }
        Ok(Self {
            name: name.to_string(),
            is_published: self.is_published,
        })
    }
}

fn normalize_slug(slug: &str) -> Result<String, DomainError> {
    let slug = slug.trim();
    if slug.is_empty() || slug.len() > 64 {
        return Err(DomainError::Validation {
            field: "slug",
            message: "must be 1..64 chars",
        });
    }
    if !slug
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(DomainError::Validation {
            field: "slug",
            message: "may contain only latin letters, digits, '-' and '_'",
        });
    }
    Ok(slug.to_string())
}
