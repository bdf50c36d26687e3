use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::blog_service::{CategoryPosts, PostDetail};
use crate::domain::catalog::{CategoryRef, LocationRef};
use crate::domain::pagination::Page;
use crate::domain::post::{Post, PostListing, PostRequest};
use crate::domain::user::Author;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::catalog::CategoryDto;
use crate::presentation::handlers::comments::CommentDto;
use crate::presentation::middleware::auth::{AuthenticatedUser, Viewer};

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexQuery {
    /// 1-based page number.
    #[validate(range(min = 1))]
    pub(crate) page: Option<u32>,
    /// Exact category title.
    pub(crate) category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct PageQuery {
    /// 1-based page number.
    #[validate(range(min = 1))]
    pub(crate) page: Option<u32>,
}

impl PageQuery {
    pub(crate) fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}

/// Body of post create and edit. Omitted `pub_date` and `is_published` mean
/// "now" and "published" on create, "unchanged" on edit.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PostInputDto {
    #[validate(length(min = 1, max = 256))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) text: String,
    #[validate(length(max = 512))]
    pub(crate) image: Option<String>,
    pub(crate) pub_date: Option<DateTime<Utc>>,
    pub(crate) is_published: Option<bool>,
    #[validate(range(min = 1))]
    pub(crate) category_id: Option<i64>,
    #[validate(range(min = 1))]
    pub(crate) location_id: Option<i64>,
}

impl From<PostInputDto> for PostRequest {
    fn from(dto: PostInputDto) -> Self {
        Self {
            title: dto.title,
            text: dto.text,
            image: dto.image,
            pub_date: dto.pub_date,
            is_published: dto.is_published,
            category_id: dto.category_id,
            location_id: dto.location_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthorDto {
    pub(crate) id: i64,
    pub(crate) username: String,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            username: author.username,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryRefDto {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) title: String,
}

impl From<CategoryRef> for CategoryRefDto {
    fn from(category: CategoryRef) -> Self {
        Self {
            id: category.id,
            slug: category.slug,
            title: category.title,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LocationRefDto {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl From<LocationRef> for LocationRefDto {
    fn from(location: LocationRef) -> Self {
        Self {
            id: location.id,
            name: location.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) author: AuthorDto,
    pub(crate) category: Option<CategoryRefDto>,
    pub(crate) location: Option<LocationRefDto>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) comment_count: i64,
}

impl PostDto {
    fn new(post: Post, comment_count: i64) -> Self {
        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            image: post.image,
            pub_date: post.pub_date,
            is_published: post.is_published,
            author: post.author.into(),
            category: post.category.map(CategoryRefDto::from),
            location: post.location.map(LocationRefDto::from),
            created_at: post.created_at,
            comment_count,
        }
    }
}

impl From<PostListing> for PostDto {
    fn from(listing: PostListing) -> Self {
        Self::new(listing.post, listing.comment_count)
    }
}

/// A freshly created post has no comments yet.
impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self::new(post, 0)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostPageDto {
    pub(crate) items: Vec<PostDto>,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) total_items: i64,
    pub(crate) total_pages: u32,
    pub(crate) has_next: bool,
    pub(crate) has_previous: bool,
}

impl From<Page<PostListing>> for PostPageDto {
    fn from(page: Page<PostListing>) -> Self {
        let has_next = page.has_next();
        let has_previous = page.has_previous();
        Self {
            items: page.items.into_iter().map(PostDto::from).collect(),
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
            has_next,
            has_previous,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    pub(crate) post: PostDto,
    pub(crate) comments: Vec<CommentDto>,
}

impl From<PostDetail> for PostDetailDto {
    fn from(detail: PostDetail) -> Self {
        let comment_count = i64::try_from(detail.comments.len()).unwrap_or(i64::MAX);
        Self {
            post: PostDto::new(detail.post, comment_count),
            comments: detail.comments.into_iter().map(CommentDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryPostsDto {
    pub(crate) category: CategoryDto,
    pub(crate) posts: PostPageDto,
}

impl From<CategoryPosts> for CategoryPostsDto {
    fn from(result: CategoryPosts) -> Self {
        Self {
            category: result.category.into(),
            posts: result.posts.into(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(IndexQuery),
    responses(
        (status = 200, description = "Visible posts, newest first", body = PostPageDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid token"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> AppResult<(StatusCode, Json<PostPageDto>)> {
    query.validate()?;
    let page = query.page.unwrap_or(1);
    let category = query.category.filter(|title| !title.is_empty());

    let result = state
        .blog_service
        .list_posts(page, category, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(PostPageDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{post_id}",
    tag = "posts",
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post with its comments", body = PostDetailDto),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(post_id): Path<i64>,
) -> AppResult<(StatusCode, Json<PostDetailDto>)> {
    let result = state
        .blog_service
        .get_post(viewer.user_id(), post_id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(PostDetailDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/api/category/{category_slug}",
    tag = "posts",
    params(
        ("category_slug" = String, Path, description = "Category slug"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Visible posts of a published category", body = CategoryPostsDto),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found or unpublished"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn category_posts(
    State(state): State<AppState>,
    Path(category_slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Json<CategoryPostsDto>)> {
    query.validate()?;

    let result = state
        .blog_service
        .category_posts(&category_slug, query.page(), Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(CategoryPostsDto::from(result))))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = PostInputDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category or location not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<PostInputDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let result = state
        .blog_service
        .create_post(auth.user_id, dto.into(), Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(result))))
}

#[utoipa::path(
    put,
    path = "/api/posts/{post_id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    request_body = PostInputDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(post_id): Path<i64>,
    Json(dto): Json<PostInputDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let result = state
        .blog_service
        .update_post(auth.user_id, post_id, dto.into())
        .await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post and its comments deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(post_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.blog_service.delete_post(auth.user_id, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
