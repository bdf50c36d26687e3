use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use tracing::debug;

use crate::presentation::AppState;
use crate::presentation::app_error::AppError;

#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) user_id: i64,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// The caller on optional-auth routes; `None` for anonymous requests.
#[derive(Debug, Clone)]
pub(crate) struct Viewer(pub(crate) Option<AuthenticatedUser>);

impl Viewer {
    pub(crate) fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|user| user.user_id)
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

/// Rejects requests without a valid bearer token.
pub(crate) async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = parse_bearer_token(request.headers())?.ok_or(AppError::Unauthorized)?;
    let user = authenticate(&state, token)?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// A missing header means anonymous; a present but invalid one is still 401.
pub(crate) async fn optional_jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = parse_bearer_token(request.headers())? {
        let user = authenticate(&state, token)?;
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}

fn authenticate(state: &AppState, token: &str) -> Result<AuthenticatedUser, AppError> {
    let claims = state
        .jwt
        .verify_token(token)
        .map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            AppError::Unauthorized
        })?;
    debug!(user_id = claims.user_id, username = %claims.username, "request authenticated");

    Ok(AuthenticatedUser {
        user_id: claims.user_id,
    })
}

/// `Ok(None)` when there is no `Authorization` header at all.
pub(crate) fn parse_bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AppError::Unauthorized)?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or(AppError::Unauthorized)?;
    let token = parts.next().ok_or(AppError::Unauthorized)?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized);
    }

    Ok(Some(token))
}
