//! PostgreSQL implementation of ProductRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use market_core::{Page, Product, ProductFilter, ProductRepository, RepoResult, Uid};

use crate::models::ProductModel;

use super::error::{map_db_error, product_not_found};

const PRODUCT_COLUMNS: &str = "id, seller_id, title, description, category, price, \
     discount_price, discount_expires_at, stock, active, images, video, features, tags, \
     brand, featured, created_at, updated_at";

/// PostgreSQL implementation of ProductRepository
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new PgProductRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Product>> {
        let result = sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Product::from))
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn create(&self, product: &Product) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO products (id, seller_id, title, description, category, price,
                                  discount_price, discount_expires_at, stock, active, images,
                                  video, features, tags, brand, featured, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ",
        )
        .bind(product.id.into_inner())
        .bind(product.seller_id.into_inner())
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.discount_price)
        .bind(product.discount_expires_at)
        .bind(product.stock)
        .bind(product.active)
        .bind(&product.images)
        .bind(&product.video)
        .bind(&product.features)
        .bind(&product.tags)
        .bind(&product.brand)
        .bind(product.featured)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update(&self, product: &Product) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET title = $2, description = $3, category = $4, price = $5, discount_price = $6,
                discount_expires_at = $7, stock = $8, active = $9, images = $10, video = $11,
                features = $12, tags = $13, brand = $14, featured = $15, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(product.id.into_inner())
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.discount_price)
        .bind(product.discount_expires_at)
        .bind(product.stock)
        .bind(product.active)
        .bind(&product.images)
        .bind(&product.video)
        .bind(&product.features)
        .bind(&product.tags)
        .bind(&product.brand)
        .bind(product.featured)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(product_not_found(product.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(product_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, filter))]
    async fn list_active(
        &self,
        filter: &ProductFilter,
        page: Page,
    ) -> RepoResult<(Vec<Product>, i64)> {
        const WHERE_CLAUSE: &str = "active \
             AND ($1::text IS NULL OR category = $1) \
             AND ($2::numeric IS NULL OR price >= $2) \
             AND ($3::numeric IS NULL OR price <= $3) \
             AND ($4::text IS NULL OR $4 = ANY(tags)) \
             AND ($5::bool IS NULL OR featured = $5)";

        let models = sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {WHERE_CLAUSE} \
             ORDER BY created_at DESC LIMIT $6 OFFSET $7"
        ))
        .bind(&filter.category)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(&filter.tag)
        .bind(filter.featured)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM products WHERE {WHERE_CLAUSE}"
        ))
        .bind(&filter.category)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(&filter.tag)
        .bind(filter.featured)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, page: Page) -> RepoResult<(Vec<Product>, i64)> {
        const WHERE_CLAUSE: &str = "active AND ( \
             title ILIKE '%' || $1 || '%' \
             OR description ILIKE '%' || $1 || '%' \
             OR EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE t ILIKE '%' || $1 || '%'))";

        let models = sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {WHERE_CLAUSE} \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(query)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM products WHERE {WHERE_CLAUSE}"
        ))
        .bind(query)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    #[instrument(skip(self))]
    async fn list_by_seller(
        &self,
        seller_id: Uid,
        active: Option<bool>,
        page: Page,
    ) -> RepoResult<(Vec<Product>, i64)> {
        let models = sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE seller_id = $1 AND ($2::bool IS NULL OR active = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(seller_id.into_inner())
        .bind(active)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let total = self.count_by_seller(seller_id, active).await?;

        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    #[instrument(skip(self))]
    async fn count_by_seller(&self, seller_id: Uid, active: Option<bool>) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE seller_id = $1 AND ($2::bool IS NULL OR active = $2)",
        )
        .bind(seller_id.into_inner())
        .bind(active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_by_category_name(&self, category_name: &str) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE category = $1")
            .bind(category_name)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
