use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::catalog_repository::{
    CategoryFields, CategoryRepository, LocationFields, LocationRepository,
};
use crate::domain::catalog::{Category, Location};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    slug: String,
    title: String,
    description: String,
    is_published: bool,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            is_published: row.is_published,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LocationRow {
    id: i64,
    name: String,
    is_published: bool,
    created_at: DateTime<Utc>,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_published: row.is_published,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCatalogRepository {
    async fn create_category(&self, input: CategoryFields) -> Result<Category, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (slug, title, description, is_published)
            VALUES ($1, $2, $3, $4)
            RETURNING id, slug, title, description, is_published, created_at
            "#,
        )
        .bind(input.slug)
        .bind(input.title)
        .bind(input.description)
        .bind(input.is_published)
        .fetch_one(&self.pool)
        .await
        .map_err(map_catalog_db_error)?;

        Ok(row.into())
    }

    async fn update_category(
        &self,
        id: i64,
        input: CategoryFields,
    ) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET slug = $2,
                title = $3,
                description = $4,
                is_published = $5
            WHERE id = $1
            RETURNING id, slug, title, description, is_published, created_at
            "#,
        )
        .bind(id)
        .bind(input.slug)
        .bind(input.title)
        .bind(input.description)
        .bind(input.is_published)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_catalog_db_error)?;

        Ok(row.map(Category::from))
    }

    async fn delete_category(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_catalog_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, slug, title, description, is_published, created_at
            FROM categories
            WHERE slug = $1 AND is_published
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_catalog_db_error)?;

        Ok(row.map(Category::from))
    }

    async fn list_categories(&self, published_only: bool) -> Result<Vec<Category>, DomainError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, slug, title, description, is_published, created_at
            FROM categories
            WHERE is_published OR NOT $1
            ORDER BY title ASC, id ASC
            "#,
        )
        .bind(published_only)
        .fetch_all(&self.pool)
        .await
        .map_err(map_catalog_db_error)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresCatalogRepository {
    async fn create_location(&self, input: LocationFields) -> Result<Location, DomainError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            INSERT INTO locations (name, is_published)
            VALUES ($1, $2)
            RETURNING id, name, is_published, created_at
            "#,
        )
        .bind(input.name)
        .bind(input.is_published)
        .fetch_one(&self.pool)
        .await
        .map_err(map_catalog_db_error)?;

        Ok(row.into())
    }

    async fn update_location(
        &self,
        id: i64,
        input: LocationFields,
    ) -> Result<Option<Location>, DomainError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            UPDATE locations
            SET name = $2,
                is_published = $3
            WHERE id = $1
            RETURNING id, name, is_published, created_at
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.is_published)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_catalog_db_error)?;

        Ok(row.map(Location::from))
    }

    async fn delete_location(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_catalog_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        let rows = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, name, is_published, created_at
            FROM locations
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_catalog_db_error)?;

        Ok(rows.into_iter().map(Location::from).collect())
    }
}

fn map_catalog_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return DomainError::AlreadyExists("category slug".to_string());
        }
    }
    DomainError::Unexpected(err.to_string())
}
