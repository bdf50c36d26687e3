use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::handlers::comments::{add_comment, delete_comment, update_comment};
use crate::presentation::handlers::posts::{
    category_posts, create_post, delete_post, get_post, list_posts, update_post,
};
use crate::presentation::middleware::auth::{jwt_auth_middleware, optional_jwt_auth_middleware};

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/api/category/{category_slug}", get(category_posts));

    let viewer_aware = Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/{post_id}", get(get_post))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_jwt_auth_middleware,
        ));

    let protected = Router::new()
        .route("/api/posts", post(create_post))
        .route("/api/posts/{post_id}", put(update_post).delete(delete_post))
        .route("/api/posts/{post_id}/comments", post(add_comment))
        .route(
            "/api/posts/{post_id}/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(viewer_aware).merge(protected)
}
