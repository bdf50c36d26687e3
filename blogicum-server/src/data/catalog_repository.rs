use async_trait::async_trait;

use crate::domain::catalog::{Category, Location};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct CategoryFields {
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) is_published: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct LocationFields {
    pub(crate) name: String,
    pub(crate) is_published: bool,
}

#[async_trait]
pub(crate) trait CategoryRepository: Send + Sync {
    async fn create_category(&self, input: CategoryFields) -> Result<Category, DomainError>;
    async fn update_category(
        &self,
        id: i64,
        input: CategoryFields,
    ) -> Result<Option<Category>, DomainError>;
    /// Posts of a deleted category stay, uncategorized.
    async fn delete_category(&self, id: i64) -> Result<bool, DomainError>;
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;
    async fn list_categories(&self, published_only: bool) -> Result<Vec<Category>, DomainError>;
}

#[async_trait]
pub(crate) trait LocationRepository: Send + Sync {
    async fn create_location(&self, input: LocationFields) -> Result<Location, DomainError>;
    async fn update_location(
        &self,
        id: i64,
        input: LocationFields,
    ) -> Result<Option<Location>, DomainError>;
    /// Posts of a deleted location stay, without a location.
    async fn delete_location(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_locations(&self) -> Result<Vec<Location>, DomainError>;
}
