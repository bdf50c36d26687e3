use sqlx::PgPool;
use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::catalog_service::CatalogService;
use crate::application::profile_service::ProfileService;
use crate::data::repositories::postgres::catalog_repository::PostgresCatalogRepository;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) type PgAuthService = AuthService<PostgresUserRepository>;
pub(crate) type PgBlogService =
    BlogService<PostgresPostRepository, PostgresCommentRepository, PostgresCatalogRepository>;
pub(crate) type PgProfileService = ProfileService<PostgresUserRepository, PostgresPostRepository>;
pub(crate) type PgCatalogService = CatalogService<
    PostgresCatalogRepository,
    PostgresCatalogRepository,
    PostgresUserRepository,
    PostgresPostRepository,
>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) pool: PgPool,
    pub(crate) auth_service: Arc<PgAuthService>,
    pub(crate) blog_service: Arc<PgBlogService>,
    pub(crate) profile_service: Arc<PgProfileService>,
    pub(crate) catalog_service: Arc<PgCatalogService>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    /// Wires every service to Postgres repositories sharing one pool.
    pub(crate) fn new(pool: PgPool, jwt: Arc<JwtService>, posts_per_page: u32) -> Self {
        let users = PostgresUserRepository::new(pool.clone());
        let posts = PostgresPostRepository::new(pool.clone());
        let comments = PostgresCommentRepository::new(pool.clone());
        let catalog = PostgresCatalogRepository::new(pool.clone());

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), Arc::clone(&jwt))),
            blog_service: Arc::new(BlogService::new(
                posts.clone(),
                comments,
                catalog.clone(),
                posts_per_page,
            )),
            profile_service: Arc::new(ProfileService::new(
                users.clone(),
                posts.clone(),
                posts_per_page,
            )),
            catalog_service: Arc::new(CatalogService::new(catalog.clone(), catalog, users, posts)),
            jwt,
            pool,
        }
    }
}
