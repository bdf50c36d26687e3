use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::app_error::ErrorBody;
use crate::presentation::handlers::auth::{AccountDto, SessionDto, SignInDto, SignUpDto};
use crate::presentation::handlers::catalog::{
    CategoryDto, CategoryInputDto, LocationDto, LocationInputDto, PostModerationDto,
};
use crate::presentation::handlers::comments::{CommentDto, CommentInputDto};
use crate::presentation::handlers::posts::{
    AuthorDto, CategoryPostsDto, CategoryRefDto, LocationRefDto, PostDetailDto, PostDto,
    PostInputDto, PostPageDto,
};
use crate::presentation::handlers::profile::{
    ProfilePostsDto, PublicProfileDto, UpdateProfileDto,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Blogicum API", description = "Posts, comments, categories and profiles"),
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::me,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::category_posts,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::comments::add_comment,
        crate::presentation::handlers::comments::update_comment,
        crate::presentation::handlers::comments::delete_comment,
        crate::presentation::handlers::profile::get_profile,
        crate::presentation::handlers::profile::update_profile,
        crate::presentation::handlers::catalog::list_published_categories,
        crate::presentation::handlers::catalog::admin_list_categories,
        crate::presentation::handlers::catalog::admin_create_category,
        crate::presentation::handlers::catalog::admin_update_category,
        crate::presentation::handlers::catalog::admin_list_locations,
        crate::presentation::handlers::catalog::admin_create_location,
        crate::presentation::handlers::catalog::admin_update_location,
        crate::presentation::handlers::catalog::admin_delete_category,
        crate::presentation::handlers::catalog::admin_delete_location,
        crate::presentation::handlers::catalog::admin_moderate_post
    ),
    components(
        schemas(
            ErrorBody,
            SignUpDto,
            SignInDto,
            SessionDto,
            AccountDto,
            AuthorDto,
            CategoryRefDto,
            LocationRefDto,
            PostInputDto,
            PostDto,
            PostPageDto,
            PostDetailDto,
            CategoryPostsDto,
            CommentInputDto,
            CommentDto,
            PublicProfileDto,
            ProfilePostsDto,
            UpdateProfileDto,
            CategoryDto,
            CategoryInputDto,
            LocationDto,
            LocationInputDto,
            PostModerationDto
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and the current account"),
        (name = "posts", description = "Post listings and post mutations"),
        (name = "comments", description = "Comments on posts"),
        (name = "profile", description = "User profiles"),
        (name = "catalog", description = "Public category list"),
        (name = "admin", description = "Staff-only catalog management and post moderation")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
