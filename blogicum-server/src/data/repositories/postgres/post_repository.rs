use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::data::post_repository::{NewPost, PostModeration, PostPatch, PostRepository};
use crate::domain::catalog::{CategoryRef, LocationRef};
use crate::domain::error::DomainError;
use crate::domain::pagination::Pagination;
use crate::domain::post::{Post, PostListing};
use crate::domain::user::Author;
use crate::domain::visibility::PostQuery;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    text: String,
    image: Option<String>,
    pub_date: DateTime<Utc>,
    is_published: bool,
    created_at: DateTime<Utc>,
    author_id: i64,
    author_username: String,
    category_id: Option<i64>,
    category_slug: Option<String>,
    category_title: Option<String>,
    category_is_published: Option<bool>,
    location_id: Option<i64>,
    location_name: Option<String>,
    location_is_published: Option<bool>,
    comment_count: i64,
}

const POST_COLUMNS: &str = r#"
    p.id,
    p.title,
    p.text,
    p.image,
    p.pub_date,
    p.is_published,
    p.created_at,
    u.id AS author_id,
    u.username AS author_username,
    c.id AS category_id,
    c.slug AS category_slug,
    c.title AS category_title,
    c.is_published AS category_is_published,
    l.id AS location_id,
    l.name AS location_name,
    l.is_published AS location_is_published,
    (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count
"#;

const POST_JOINS: &str = r#"
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN locations l ON l.id = p.location_id
"#;

/// `source` must expose a relation aliased as `p` with the `posts` columns.
fn select_posts(source: &str) -> String {
    format!("{source} SELECT {POST_COLUMNS} FROM p {POST_JOINS}")
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let sql = select_posts(
            r#"
            WITH p AS (
                INSERT INTO posts
                    (title, text, image, pub_date, is_published, author_id, category_id, location_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            "#,
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(input.title)
            .bind(input.text)
            .bind(input.image)
            .bind(input.pub_date)
            .bind(input.is_published)
            .bind(input.author_id)
            .bind(input.category_id)
            .bind(input.location_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        map_row_to_listing(row).map(|listing| listing.post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p {POST_JOINS} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(|row| map_row_to_listing(row).map(|listing| listing.post))
            .transpose()
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<PostListing>, DomainError> {
        let sql = select_posts(
            r#"
            WITH p AS (
                UPDATE posts
                SET title = $3,
                    text = $4,
                    image = $5,
                    pub_date = $6,
                    is_published = $7,
                    category_id = $8,
                    location_id = $9
                WHERE id = $1 AND author_id = $2
                RETURNING *
            )
            "#,
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id)
            .bind(owner_id)
            .bind(patch.title)
            .bind(patch.text)
            .bind(patch.image)
            .bind(patch.pub_date)
            .bind(patch.is_published)
            .bind(patch.category_id)
            .bind(patch.location_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_listing).transpose()
    }

    async fn moderate_post(
        &self,
        post_id: i64,
        moderation: PostModeration,
    ) -> Result<Option<PostListing>, DomainError> {
        let sql = select_posts(
            r#"
            WITH p AS (
                UPDATE posts
                SET is_published = $2,
                    category_id = $3,
                    location_id = $4
                WHERE id = $1
                RETURNING *
            )
            "#,
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id)
            .bind(moderation.is_published)
            .bind(moderation.category_id)
            .bind(moderation.location_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_listing).transpose()
    }

    async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1 AND author_id = $2
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        query: &PostQuery,
        pagination: Pagination,
    ) -> Result<Vec<PostListing>, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {POST_COLUMNS} FROM posts p {POST_JOINS}"
        ));
        push_post_filters(&mut builder, query);
        builder.push(" ORDER BY p.pub_date DESC, p.id ASC LIMIT ");
        builder.push_bind(pagination.limit());
        builder.push(" OFFSET ");
        builder.push_bind(pagination.offset());

        let rows = builder
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_listing).collect()
    }

    async fn count_posts(&self, query: &PostQuery) -> Result<i64, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM posts p LEFT JOIN categories c ON c.id = p.category_id",
        );
        push_post_filters(&mut builder, query);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)
    }
}

/// SQL rendering of [`PostQuery`]. Expects `posts` as `p` and a left-joined
/// `categories` as `c`.
fn push_post_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &PostQuery) {
    builder.push(" WHERE TRUE");

    if let Some(visibility) = query.visibility {
        builder.push(" AND p.is_published AND p.pub_date <= ");
        builder.push_bind(visibility.now());
        if visibility.checks_category() {
            builder.push(" AND (c.id IS NULL OR c.is_published)");
        }
    }
    if let Some(author_id) = query.author_id {
        builder.push(" AND p.author_id = ");
        builder.push_bind(author_id);
    }
    if let Some(category_id) = query.category_id {
        builder.push(" AND p.category_id = ");
        builder.push_bind(category_id);
    }
    if let Some(title) = &query.category_title {
        builder.push(" AND c.title = ");
        builder.push_bind(title.clone());
    }
}

fn map_row_to_listing(row: PostRow) -> Result<PostListing, DomainError> {
    let post_id = row.id;
    let incomplete = |what: &str| DomainError::Unexpected(format!("post {post_id}: incomplete {what}"));

    let category = match row.category_id {
        None => None,
        Some(id) => Some(CategoryRef {
            id,
            slug: row.category_slug.ok_or_else(|| incomplete("category"))?,
            title: row.category_title.ok_or_else(|| incomplete("category"))?,
            is_published: row
                .category_is_published
                .ok_or_else(|| incomplete("category"))?,
        }),
    };
    let location = match row.location_id {
        None => None,
        Some(id) => Some(LocationRef {
            id,
            name: row.location_name.ok_or_else(|| incomplete("location"))?,
            is_published: row
                .location_is_published
                .ok_or_else(|| incomplete("location"))?,
        }),
    };

    Ok(PostListing {
        post: Post {
            id: row.id,
            title: row.title,
            text: row.text,
            image: row.image,
            pub_date: row.pub_date,
            is_published: row.is_published,
            author: Author {
                id: row.author_id,
                username: row.author_username,
            },
            category,
            location,
            created_at: row.created_at,
        },
        comment_count: row.comment_count,
    })
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23503") {
            let resource = match db_err.constraint() {
                Some("posts_category_id_fkey") => "category",
                Some("posts_location_id_fkey") => "location",
                _ => "author",
            };
            return DomainError::NotFound(resource.to_string());
        }
    }
    DomainError::Unexpected(err.to_string())
}

#[cfg(test)]
mod tests {
    use sqlx::{Postgres, QueryBuilder};

    use super::push_post_filters;
    use crate::domain::visibility::PostQuery;
    use crate::domain::visibility::tests::fixed_now;

    fn where_clause(query: &PostQuery) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("");
        push_post_filters(&mut builder, query);
        builder.sql().to_string()
    }

    #[test]
    fn public_query_checks_publication_date_and_category() {
        assert_eq!(
            where_clause(&PostQuery::public(fixed_now())),
            " WHERE TRUE AND p.is_published AND p.pub_date <= $1 \
             AND (c.id IS NULL OR c.is_published)"
        );
    }

    #[test]
    fn category_title_filter_is_an_exact_match() {
        let query = PostQuery::public(fixed_now()).with_category_title("Travel");
        assert_eq!(
            where_clause(&query),
            " WHERE TRUE AND p.is_published AND p.pub_date <= $1 \
             AND (c.id IS NULL OR c.is_published) AND c.title = $2"
        );
    }

    #[test]
    fn published_category_listing_skips_category_clause() {
        let sql = where_clause(&PostQuery::in_published_category(5, fixed_now()));
        assert_eq!(
            sql,
            " WHERE TRUE AND p.is_published AND p.pub_date <= $1 AND p.category_id = $2"
        );
        assert!(!sql.contains("c.is_published"));
    }

    #[test]
    fn own_profile_query_has_no_visibility_clause() {
        assert_eq!(
            where_clause(&PostQuery::unrestricted().by_author(7)),
            " WHERE TRUE AND p.author_id = $1"
        );
    }

    #[test]
    fn foreign_profile_query_combines_visibility_and_author() {
        assert_eq!(
            where_clause(&PostQuery::public(fixed_now()).by_author(7)),
            " WHERE TRUE AND p.is_published AND p.pub_date <= $1 \
             AND (c.id IS NULL OR c.is_published) AND p.author_id = $2"
        );
    }
}
