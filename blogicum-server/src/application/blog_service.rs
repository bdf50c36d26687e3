use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::data::catalog_repository::CategoryRepository;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::catalog::Category;
use crate::domain::comment::{Comment, CommentRequest};
use crate::domain::error::DomainError;
use crate::domain::ownership::ensure_owner;
use crate::domain::pagination::{Page, Pagination};
use crate::domain::post::{Post, PostListing, PostRequest};
use crate::domain::visibility::{PostAccess, PostQuery, post_access};

#[derive(Debug, Clone)]
pub(crate) struct PostDetail {
    pub(crate) post: Post,
    pub(crate) comments: Vec<Comment>,
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryPosts {
    pub(crate) category: Category,
    pub(crate) posts: Page<PostListing>,
}

pub(crate) struct BlogService<P, C, K>
where
    P: PostRepository,
    C: CommentRepository,
    K: CategoryRepository,
{
    posts: P,
    comments: C,
    categories: K,
    page_size: u32,
}

impl<P, C, K> BlogService<P, C, K>
where
    P: PostRepository,
    C: CommentRepository,
    K: CategoryRepository,
{
    pub(crate) fn new(posts: P, comments: C, categories: K, page_size: u32) -> Self {
        Self {
            posts,
            comments,
            categories,
            page_size,
        }
    }

    /// Public index, optionally narrowed to one category title.
    pub(crate) async fn list_posts(
        &self,
        page: u32,
        category_title: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Page<PostListing>, DomainError> {
        let pagination = Pagination::new(page, self.page_size)?;
        let mut query = PostQuery::public(now);
        if let Some(title) = category_title {
            query = query.with_category_title(title);
        }
        fetch_page(&self.posts, &query, pagination).await
    }

    pub(crate) async fn get_post(
        &self,
        viewer: Option<i64>,
        post_id: i64,
        now: DateTime<Utc>,
    ) -> Result<PostDetail, DomainError> {
        let post = self.load_post(post_id).await?;
        if post_access(&post, viewer, now) == PostAccess::NotFound {
            return Err(DomainError::post_not_found(post_id));
        }

        let comments = self.comments.list_comments(post_id).await?;
        Ok(PostDetail { post, comments })
    }

    pub(crate) async fn category_posts(
        &self,
        slug: &str,
        page: u32,
        now: DateTime<Utc>,
    ) -> Result<CategoryPosts, DomainError> {
        let pagination = Pagination::new(page, self.page_size)?;
        let category = self
            .categories
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("category: {slug}")))?;

        let query = PostQuery::in_published_category(category.id, now);
        let posts = fetch_page(&self.posts, &query, pagination).await?;
        Ok(CategoryPosts { category, posts })
    }

    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: PostRequest,
        now: DateTime<Utc>,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            text: req.text,
            image: req.image,
            pub_date: req.pub_date.unwrap_or(now),
            is_published: req.is_published.unwrap_or(true),
            author_id,
            category_id: req.category_id,
            location_id: req.location_id,
        };
        let post = self.posts.create_post(new_post).await?;
        info!(post_id = post.id, author_id, "post created");
        Ok(post)
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: PostRequest,
    ) -> Result<PostListing, DomainError> {
        let original_post = self.load_post(post_id).await?;
        ensure_owner(&original_post, actor_user_id)
            .inspect_err(|_| warn!(post_id, actor_user_id, "post edit denied"))?;

        let req = req.validate()?;
        let patch = PostPatch {
            title: req.title,
            text: req.text,
            image: req.image,
            pub_date: req.pub_date.unwrap_or(original_post.pub_date),
            is_published: req.is_published.unwrap_or(original_post.is_published),
            category_id: req.category_id,
            location_id: req.location_id,
        };
        let updated = self
            .posts
            .update_post_owned(post_id, actor_user_id, patch)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        info!(post_id, actor_user_id, "post updated");
        Ok(updated)
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let original_post = self.load_post(post_id).await?;
        ensure_owner(&original_post, actor_user_id)
            .inspect_err(|_| warn!(post_id, actor_user_id, "post delete denied"))?;

        let deleted = self.posts.delete_post_owned(post_id, actor_user_id).await?;
        if !deleted {
            return Err(DomainError::post_not_found(post_id));
        }
        info!(post_id, actor_user_id, "post deleted");
        Ok(())
    }

    /// Comments are only accepted on posts the commenter can see.
    pub(crate) async fn add_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: CommentRequest,
        now: DateTime<Utc>,
    ) -> Result<Comment, DomainError> {
        let post = self.load_post(post_id).await?;
        if post_access(&post, Some(actor_user_id), now) == PostAccess::NotFound {
            return Err(DomainError::post_not_found(post_id));
        }

        let req = req.validate()?;
        let comment = self
            .comments
            .create_comment(NewComment {
                text: req.text,
                post_id,
                author_id: actor_user_id,
            })
            .await?;
        info!(comment_id = comment.id, post_id, actor_user_id, "comment created");
        Ok(comment)
    }

    pub(crate) async fn update_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        let comment = self.load_comment(post_id, comment_id).await?;
        ensure_owner(&comment, actor_user_id)
            .inspect_err(|_| warn!(comment_id, actor_user_id, "comment edit denied"))?;

        let req = req.validate()?;
        self.comments
            .update_comment_owned(comment_id, actor_user_id, req.text)
            .await?
            .ok_or_else(|| DomainError::comment_not_found(comment_id))
    }

    pub(crate) async fn delete_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        let comment = self.load_comment(post_id, comment_id).await?;
        ensure_owner(&comment, actor_user_id)
            .inspect_err(|_| warn!(comment_id, actor_user_id, "comment delete denied"))?;

        let deleted = self
            .comments
            .delete_comment_owned(comment_id, actor_user_id)
            .await?;
        if !deleted {
            return Err(DomainError::comment_not_found(comment_id));
        }
        info!(comment_id, post_id, actor_user_id, "comment deleted");
        Ok(())
    }

    async fn load_post(&self, post_id: i64) -> Result<Post, DomainError> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    /// A comment addressed through the wrong post counts as missing.
    async fn load_comment(&self, post_id: i64, comment_id: i64) -> Result<Comment, DomainError> {
        self.comments
            .get_comment(comment_id)
            .await?
            .filter(|comment| comment.post_id == post_id)
            .ok_or_else(|| DomainError::comment_not_found(comment_id))
    }
}

/// Count, then fetch the requested slice. Pages past the end are empty.
pub(crate) async fn fetch_page<P: PostRepository>(
    posts: &P,
    query: &PostQuery,
    pagination: Pagination,
) -> Result<Page<PostListing>, DomainError> {
    let total = posts.count_posts(query).await?;
    let items = if pagination.offset() < total {
        posts.list_posts(query, pagination).await?
    } else {
        Vec::new()
    };
    Ok(Page::new(items, pagination, total))
}
