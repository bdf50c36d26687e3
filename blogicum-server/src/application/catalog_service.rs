use tracing::{info, warn};

use crate::data::catalog_repository::{
    CategoryFields, CategoryRepository, LocationFields, LocationRepository,
};
use crate::data::post_repository::{PostModeration, PostRepository};
use crate::data::user_repository::UserRepository;
use crate::domain::catalog::{Category, CategoryRequest, Location, LocationRequest};
use crate::domain::error::DomainError;
use crate::domain::post::{PostListing, PostModerationRequest};

/// Category and location management plus post moderation. Everything except
/// the public category list requires a staff account, checked against the
/// store on every call.
pub(crate) struct CatalogService<K, L, U, P>
where
    K: CategoryRepository,
    L: LocationRepository,
    U: UserRepository,
    P: PostRepository,
{
    categories: K,
    locations: L,
    users: U,
    posts: P,
}

impl<K, L, U, P> CatalogService<K, L, U, P>
where
    K: CategoryRepository,
    L: LocationRepository,
    U: UserRepository,
    P: PostRepository,
{
    pub(crate) fn new(categories: K, locations: L, users: U, posts: P) -> Self {
        Self {
            categories,
            locations,
            users,
            posts,
        }
    }

    pub(crate) async fn list_published_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.categories.list_categories(true).await
    }

    pub(crate) async fn list_categories(
        &self,
        actor_user_id: i64,
    ) -> Result<Vec<Category>, DomainError> {
        self.require_staff(actor_user_id).await?;
        self.categories.list_categories(false).await
    }

    pub(crate) async fn create_category(
        &self,
        actor_user_id: i64,
        req: CategoryRequest,
    ) -> Result<Category, DomainError> {
        self.require_staff(actor_user_id).await?;
        let req = req.validate()?;

        let category = self.categories.create_category(category_fields(req)).await?;
        info!(category_id = category.id, slug = %category.slug, "category created");
        Ok(category)
    }

    pub(crate) async fn update_category(
        &self,
        actor_user_id: i64,
        category_id: i64,
        req: CategoryRequest,
    ) -> Result<Category, DomainError> {
        self.require_staff(actor_user_id).await?;
        let req = req.validate()?;

        let category = self
            .categories
            .update_category(category_id, category_fields(req))
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("category id: {category_id}")))?;
        info!(category_id, is_published = category.is_published, "category updated");
        Ok(category)
    }

    pub(crate) async fn delete_category(
        &self,
        actor_user_id: i64,
        category_id: i64,
    ) -> Result<(), DomainError> {
        self.require_staff(actor_user_id).await?;

        if !self.categories.delete_category(category_id).await? {
            return Err(DomainError::NotFound(format!("category id: {category_id}")));
        }
        info!(category_id, actor_user_id, "category deleted");
        Ok(())
    }

    pub(crate) async fn list_locations(
        &self,
        actor_user_id: i64,
    ) -> Result<Vec<Location>, DomainError> {
        self.require_staff(actor_user_id).await?;
        self.locations.list_locations().await
    }

    pub(crate) async fn create_location(
        &self,
        actor_user_id: i64,
        req: LocationRequest,
    ) -> Result<Location, DomainError> {
        self.require_staff(actor_user_id).await?;
        let req = req.validate()?;

        let location = self
            .locations
            .create_location(LocationFields {
                name: req.name,
                is_published: req.is_published,
            })
            .await?;
        info!(location_id = location.id, "location created");
        Ok(location)
    }

    pub(crate) async fn update_location(
        &self,
        actor_user_id: i64,
        location_id: i64,
        req: LocationRequest,
    ) -> Result<Location, DomainError> {
        self.require_staff(actor_user_id).await?;
        let req = req.validate()?;

        let location = self
            .locations
            .update_location(
                location_id,
                LocationFields {
                    name: req.name,
                    is_published: req.is_published,
                },
            )
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("location id: {location_id}")))?;
        info!(location_id, is_published = location.is_published, "location updated");
        Ok(location)
    }

    pub(crate) async fn delete_location(
        &self,
        actor_user_id: i64,
        location_id: i64,
    ) -> Result<(), DomainError> {
        self.require_staff(actor_user_id).await?;

        if !self.locations.delete_location(location_id).await? {
            return Err(DomainError::NotFound(format!("location id: {location_id}")));
        }
        info!(location_id, actor_user_id, "location deleted");
        Ok(())
    }

    /// Publishes, hides or reclassifies any post. Authorship is untouched.
    pub(crate) async fn moderate_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: PostModerationRequest,
    ) -> Result<PostListing, DomainError> {
        self.require_staff(actor_user_id).await?;
        let req = req.validate()?;

        let moderated = self
            .posts
            .moderate_post(
                post_id,
                PostModeration {
                    is_published: req.is_published,
                    category_id: req.category_id,
                    location_id: req.location_id,
                },
            )
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        info!(
            post_id,
            actor_user_id,
            is_published = moderated.post.is_published,
            "post moderated"
        );
        Ok(moderated)
    }

    async fn require_staff(&self, actor_user_id: i64) -> Result<(), DomainError> {
        let is_staff = self
            .users
            .get_user(actor_user_id)
            .await?
            .is_some_and(|user| user.is_staff);
        if !is_staff {
            warn!(actor_user_id, "catalog access denied");
            return Err(DomainError::Forbidden);
        }
        Ok(())
    }
}

fn category_fields(req: CategoryRequest) -> CategoryFields {
    CategoryFields {
        slug: req.slug,
        title: req.title,
        description: req.description,
        is_published: req.is_published,
    }
}
