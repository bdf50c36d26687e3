use axum::Router;
use axum::middleware;
use axum::routing::{get, put};

use crate::presentation::AppState;
use crate::presentation::handlers::profile::{get_profile, update_profile};
use crate::presentation::middleware::auth::{jwt_auth_middleware, optional_jwt_auth_middleware};

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let viewer_aware = Router::new()
        .route("/api/profile/{username}", get(get_profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_jwt_auth_middleware,
        ));

    let protected = Router::new()
        .route("/api/profile", put(update_profile))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    viewer_aware.merge(protected)
}
