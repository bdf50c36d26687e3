use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::pagination::Pagination;
use crate::domain::post::{Post, PostListing};
use crate::domain::visibility::PostQuery;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) author_id: i64,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub(crate) struct PostModeration {
    pub(crate) is_published: bool,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    /// Applies `patch` only if `owner_id` still owns the post.
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<PostListing>, DomainError>;
    /// Staff update of publication and classification, regardless of author.
    async fn moderate_post(
        &self,
        post_id: i64,
        moderation: PostModeration,
    ) -> Result<Option<PostListing>, DomainError>;
    /// Deletes the post (and its comments) only if `owner_id` owns it.
    async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError>;
    /// Newest `pub_date` first; equal dates keep creation order.
    async fn list_posts(
        &self,
        query: &PostQuery,
        pagination: Pagination,
    ) -> Result<Vec<PostListing>, DomainError>;
    async fn count_posts(&self, query: &PostQuery) -> Result<i64, DomainError>;
}
