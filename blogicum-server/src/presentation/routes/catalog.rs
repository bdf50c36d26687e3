use axum::Router;
use axum::middleware;
use axum::routing::{get, put};

use crate::presentation::AppState;
use crate::presentation::handlers::catalog::{
    admin_create_category, admin_create_location, admin_delete_category, admin_delete_location,
    admin_list_categories, admin_list_locations, admin_moderate_post, admin_update_category,
    admin_update_location, list_published_categories,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

/// Staff checks happen in the service; the middleware only authenticates.
pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/api/categories", get(list_published_categories));

    let admin = Router::new()
        .route(
            "/api/admin/categories",
            get(admin_list_categories).post(admin_create_category),
        )
        .route(
            "/api/admin/categories/{category_id}",
            put(admin_update_category).delete(admin_delete_category),
        )
        .route(
            "/api/admin/locations",
            get(admin_list_locations).post(admin_create_location),
        )
        .route(
            "/api/admin/locations/{location_id}",
            put(admin_update_location).delete(admin_delete_location),
        )
        .route("/api/admin/posts/{post_id}", put(admin_moderate_post))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(admin)
}
