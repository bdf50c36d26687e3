use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use super::AppState;
use super::handlers::auth::{login, me, register};
use super::middleware::auth::jwt_auth_middleware;

pub(crate) mod catalog;
pub(crate) mod posts;
pub(crate) mod profile;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let account = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));
    let auth = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(account);

    Router::new()
        .nest("/api/auth", auth)
        .merge(posts::router(state.clone()))
        .merge(profile::router(state.clone()))
        .merge(catalog::router(state))
}
