//! Which posts may be shown, and to whom.
//!
//! A post is publicly visible when it is published, its `pub_date` is not in
//! the future and its category (if any) is published. The current time is
//! always passed in by the caller.

use chrono::{DateTime, Utc};

use super::post::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CategoryRule {
    RequirePublished,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VisibilityFilter {
    now: DateTime<Utc>,
    category_rule: CategoryRule,
}

impl VisibilityFilter {
    pub(crate) fn public(now: DateTime<Utc>) -> Self {
        Self {
            now,
            category_rule: CategoryRule::RequirePublished,
        }
    }

    /// For listings already scoped to a category that was looked up as
    /// published.
    pub(crate) fn within_published_category(now: DateTime<Utc>) -> Self {
        Self {
            now,
            category_rule: CategoryRule::Ignore,
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub(crate) fn checks_category(&self) -> bool {
        self.category_rule == CategoryRule::RequirePublished
    }

    pub(crate) fn admits(&self, post: &Post) -> bool {
        let category_ok = match (&post.category, self.category_rule) {
            (_, CategoryRule::Ignore) | (None, _) => true,
            (Some(category), CategoryRule::RequirePublished) => category.is_published,
        };
        post.is_published && post.pub_date <= self.now && category_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostAccess {
    Render,
    NotFound,
}

/// Single-post access: visible posts render for everyone, hidden posts only
/// for their author. Anonymous viewers are `None`.
pub(crate) fn post_access(post: &Post, viewer: Option<i64>, now: DateTime<Utc>) -> PostAccess {
    if VisibilityFilter::public(now).admits(post) || viewer == Some(post.author.id) {
        PostAccess::Render
    } else {
        PostAccess::NotFound
    }
}

/// Composable post filter. Repositories translate it into their own query
/// language; [`PostQuery::matches`] is the reference semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PostQuery {
    pub(crate) visibility: Option<VisibilityFilter>,
    pub(crate) author_id: Option<i64>,
    pub(crate) category_id: Option<i64>,
    pub(crate) category_title: Option<String>,
}

impl PostQuery {
    pub(crate) fn public(now: DateTime<Utc>) -> Self {
        Self {
            visibility: Some(VisibilityFilter::public(now)),
            ..Self::default()
        }
    }

    /// No visibility restriction at all. Only for an author's own posts.
    pub(crate) fn unrestricted() -> Self {
        Self::default()
    }

    pub(crate) fn in_published_category(category_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            visibility: Some(VisibilityFilter::within_published_category(now)),
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    pub(crate) fn by_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub(crate) fn with_category_title(mut self, title: impl Into<String>) -> Self {
        self.category_title = Some(title.into());
        self
    }

    pub(crate) fn matches(&self, post: &Post) -> bool {
        if let Some(visibility) = &self.visibility {
            if !visibility.admits(post) {
                return false;
            }
        }
        if let Some(author_id) = self.author_id {
            if post.author.id != author_id {
                return false;
            }
        }
        if let Some(category_id) = self.category_id {
            if post.category.as_ref().map(|c| c.id) != Some(category_id) {
                return false;
            }
        }
        if let Some(title) = &self.category_title {
            if post.category.as_ref().map(|c| c.title.as_str()) != Some(title.as_str()) {
                return false;
            }
        }
        true
    }
}
