use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::auth_service::Session;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct SignUpDto {
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
    #[validate(must_match(other = "password"))]
    pub(crate) password_confirmation: String,
}

impl From<SignUpDto> for RegisterRequest {
    fn from(dto: SignUpDto) -> Self {
        Self {
            username: dto.username,
            email: dto.email,
            password: dto.password,
            password_confirmation: dto.password_confirmation,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct SignInDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) username: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

impl From<SignInDto> for LoginRequest {
    fn from(dto: SignInDto) -> Self {
        Self {
            username: dto.username,
            password: dto.password,
        }
    }
}

/// The caller's own account, email included.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AccountDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) is_staff: bool,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for AccountDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
            created_at: user.created_at,
        }
    }
}

/// Send `access_token` back as `Authorization: Bearer <token>`.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct SessionDto {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    /// Seconds until the token expires.
    pub(crate) expires_in: i64,
    pub(crate) account: AccountDto,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.access_token,
            token_type: "Bearer".to_string(),
            expires_in: session.expires_in,
            account: session.account.into(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = SignUpDto,
    responses(
        (status = 201, description = "Account created and signed in", body = SessionDto),
        (status = 400, description = "Validation error or password confirmation mismatch"),
        (status = 409, description = "Username or email already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(dto): Json<SignUpDto>,
) -> AppResult<(StatusCode, Json<SessionDto>)> {
    dto.validate()?;

    let session = state.auth_service.register(dto.into()).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = SignInDto,
    responses(
        (status = 200, description = "Signed in", body = SessionDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<SignInDto>,
) -> AppResult<Json<SessionDto>> {
    dto.validate()?;

    let session = state.auth_service.login(dto.into()).await?;
    Ok(Json(session.into()))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's account", body = AccountDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account no longer exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn me(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<Json<AccountDto>> {
    let account = state.auth_service.current_account(auth.user_id).await?;
    Ok(Json(account.into()))
}
