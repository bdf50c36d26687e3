use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::profile_service::ProfilePosts;
use crate::domain::user::{UpdateProfileRequest, User};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::auth::AccountDto;
use crate::presentation::handlers::posts::{PageQuery, PostPageDto};
use crate::presentation::middleware::auth::{AuthenticatedUser, Viewer};

/// What anyone may see about a user. No email.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PublicProfileDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for PublicProfileDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfilePostsDto {
    pub(crate) profile: PublicProfileDto,
    pub(crate) posts: PostPageDto,
}

impl From<ProfilePosts> for ProfilePostsDto {
    fn from(result: ProfilePosts) -> Self {
        Self {
            profile: result.user.into(),
            posts: result.posts.into(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdateProfileDto {
    #[serde(default)]
    #[validate(length(max = 150))]
    pub(crate) first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub(crate) last_name: String,
    #[validate(length(min = 3, max = 254))]
    pub(crate) email: String,
}

#[utoipa::path(
    get,
    path = "/api/profile/{username}",
    tag = "profile",
    params(
        ("username" = String, Path, description = "Username"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Profile and posts; the owner also sees hidden posts", body = ProfilePostsDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Json<ProfilePostsDto>)> {
    query.validate()?;

    let result = state
        .profile_service
        .profile(viewer.user_id(), &username, query.page(), Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(ProfilePostsDto::from(result))))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    tag = "profile",
    security(
        ("bearer_auth" = [])
    ),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = AccountDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<UpdateProfileDto>,
) -> AppResult<(StatusCode, Json<AccountDto>)> {
    dto.validate()?;

    let req = UpdateProfileRequest {
        first_name: dto.first_name,
        last_name: dto.last_name,
        email: dto.email,
    };
    let result = state
        .profile_service
        .update_profile(auth.user_id, req)
        .await?;

    Ok((StatusCode::OK, Json(AccountDto::from(result))))
}
