use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::catalog::{Category, CategoryRequest, Location, LocationRequest};
use crate::domain::post::PostModerationRequest;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::posts::PostDto;
use crate::presentation::middleware::auth::AuthenticatedUser;

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryDto {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            slug: category.slug,
            title: category.title,
            description: category.description,
            is_published: category.is_published,
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LocationDto {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Location> for LocationDto {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name,
            is_published: location.is_published,
            created_at: location.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CategoryInputDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) slug: String,
    #[validate(length(min = 1, max = 256))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default = "default_true")]
    pub(crate) is_published: bool,
}

impl From<CategoryInputDto> for CategoryRequest {
    fn from(dto: CategoryInputDto) -> Self {
        Self {
            slug: dto.slug,
            title: dto.title,
            description: dto.description,
            is_published: dto.is_published,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LocationInputDto {
    #[validate(length(min = 1, max = 256))]
    pub(crate) name: String,
    #[serde(default = "default_true")]
    pub(crate) is_published: bool,
}

impl From<LocationInputDto> for LocationRequest {
    fn from(dto: LocationInputDto) -> Self {
        Self {
            name: dto.name,
            is_published: dto.is_published,
        }
    }
}

/// Every field is replaced; a missing `category_id` clears the category.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PostModerationDto {
    pub(crate) is_published: bool,
    #[validate(range(min = 1))]
    pub(crate) category_id: Option<i64>,
    #[validate(range(min = 1))]
    pub(crate) location_id: Option<i64>,
}

impl From<PostModerationDto> for PostModerationRequest {
    fn from(dto: PostModerationDto) -> Self {
        Self {
            is_published: dto.is_published,
            category_id: dto.category_id,
            location_id: dto.location_id,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "catalog",
    responses(
        (status = 200, description = "Published categories", body = [CategoryDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_published_categories(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<CategoryDto>>)> {
    let result = state.catalog_service.list_published_categories().await?;
    Ok((
        StatusCode::OK,
        Json(result.into_iter().map(CategoryDto::from).collect()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All categories", body = [CategoryDto]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn admin_list_categories(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<(StatusCode, Json<Vec<CategoryDto>>)> {
    let result = state.catalog_service.list_categories(auth.user_id).await?;
    Ok((
        StatusCode::OK,
        Json(result.into_iter().map(CategoryDto::from).collect()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CategoryInputDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 409, description = "Slug already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn admin_create_category(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CategoryInputDto>,
) -> AppResult<(StatusCode, Json<CategoryDto>)> {
    dto.validate()?;

    let result = state
        .catalog_service
        .create_category(auth.user_id, dto.into())
        .await?;
    Ok((StatusCode::CREATED, Json(CategoryDto::from(result))))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{category_id}",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("category_id" = i64, Path, description = "Category id")
    ),
    request_body = CategoryInputDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn admin_update_category(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(category_id): Path<i64>,
    Json(dto): Json<CategoryInputDto>,
) -> AppResult<(StatusCode, Json<CategoryDto>)> {
    dto.validate()?;

    let result = state
        .catalog_service
        .update_category(auth.user_id, category_id, dto.into())
        .await?;
    Ok((StatusCode::OK, Json(CategoryDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/api/admin/locations",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All locations", body = [LocationDto]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn admin_list_locations(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<(StatusCode, Json<Vec<LocationDto>>)> {
    let result = state.catalog_service.list_locations(auth.user_id).await?;
    Ok((
        StatusCode::OK,
        Json(result.into_iter().map(LocationDto::from).collect()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin/locations",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    request_body = LocationInputDto,
    responses(
        (status = 201, description = "Location created", body = LocationDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn admin_create_location(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<LocationInputDto>,
) -> AppResult<(StatusCode, Json<LocationDto>)> {
    dto.validate()?;

    let result = state
        .catalog_service
        .create_location(auth.user_id, dto.into())
        .await?;
    Ok((StatusCode::CREATED, Json(LocationDto::from(result))))
}

#[utoipa::path(
    put,
    path = "/api/admin/locations/{location_id}",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("location_id" = i64, Path, description = "Location id")
    ),
    request_body = LocationInputDto,
    responses(
        (status = 200, description = "Location updated", body = LocationDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Location not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn admin_update_location(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(location_id): Path<i64>,
    Json(dto): Json<LocationInputDto>,
) -> AppResult<(StatusCode, Json<LocationDto>)> {
    dto.validate()?;

    let result = state
        .catalog_service
        .update_location(auth.user_id, location_id, dto.into())
        .await?;
    Ok((StatusCode::OK, Json(LocationDto::from(result))))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{category_id}",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("category_id" = i64, Path, description = "Category id")
    ),
    responses(
        (status = 204, description = "Category deleted; its posts become uncategorized"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn admin_delete_category(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(category_id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .catalog_service
        .delete_category(auth.user_id, category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/admin/locations/{location_id}",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("location_id" = i64, Path, description = "Location id")
    ),
    responses(
        (status = 204, description = "Location deleted; its posts lose the location"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Location not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn admin_delete_location(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(location_id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .catalog_service
        .delete_location(auth.user_id, location_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/admin/posts/{post_id}",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    request_body = PostModerationDto,
    responses(
        (status = 200, description = "Post moderated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Post, category or location not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn admin_moderate_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(post_id): Path<i64>,
    Json(dto): Json<PostModerationDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let result = state
        .catalog_service
        .moderate_post(auth.user_id, post_id, dto.into())
        .await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}
