//! PostgreSQL implementation of CategoryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use market_core::{Category, CategoryRepository, DomainError, RepoResult, Uid};

use crate::models::CategoryModel;

use super::error::{category_not_found, map_db_error, map_unique_violation_by_constraint};

const CATEGORY_COLUMNS: &str =
    "id, name, slug, description, image, active, owner_id, created_at, updated_at";

/// PostgreSQL implementation of CategoryRepository
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Category>> {
        let result = sqlx::query_as::<_, CategoryModel>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Category::from))
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let result = sqlx::query_as::<_, CategoryModel>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE LOWER(name) = LOWER($1)"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Category::from))
    }

    #[instrument(skip(self))]
    async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, category), fields(category_id = %category.id, slug = %category.slug))]
    async fn create(&self, category: &Category) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO categories (id, name, slug, description, image, active, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(category.id.into_inner())
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&category.image)
        .bind(category.active)
        .bind(category.owner_id.into_inner())
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation_by_constraint(e, |constraint| {
                if constraint.contains("slug") {
                    DomainError::SlugExists
                } else {
                    DomainError::CategoryNameExists
                }
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self, category), fields(category_id = %category.id))]
    async fn update(&self, category: &Category) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE categories
            SET name = $2, slug = $3, description = $4, image = $5, active = $6, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(category.id.into_inner())
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&category.image)
        .bind(category.active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation_by_constraint(e, |constraint| {
                if constraint.contains("slug") {
                    DomainError::SlugExists
                } else {
                    DomainError::CategoryNameExists
                }
            })
        })?;

        if result.rows_affected() == 0 {
            return Err(category_not_found(category.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(category_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, active: Option<bool>) -> RepoResult<Vec<Category>> {
        let models = sqlx::query_as::<_, CategoryModel>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE ($1::bool IS NULL OR active = $1) ORDER BY name"
        ))
        .bind(active)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_by_owner(
        &self,
        owner_id: Uid,
        active: Option<bool>,
    ) -> RepoResult<Vec<Category>> {
        let models = sqlx::query_as::<_, CategoryModel>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE owner_id = $1 AND ($2::bool IS NULL OR active = $2) ORDER BY name"
        ))
        .bind(owner_id.into_inner())
        .bind(active)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(Category::from).collect())
    }
}
