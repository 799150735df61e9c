//! PostgreSQL implementation of ReviewRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use market_core::{DomainError, RepoResult, Review, ReviewRepository, Uid};

use crate::models::ReviewModel;

use super::error::{map_db_error, map_unique_violation};

const REVIEW_COLUMNS: &str = "id, product_id, buyer_id, order_id, rating, comment, created_at";

/// PostgreSQL implementation of ReviewRepository
#[derive(Clone)]
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    /// Create a new PgReviewRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    #[instrument(skip(self, review), fields(review_id = %review.id, order_id = %review.order_id))]
    async fn create(&self, review: &Review) -> RepoResult<()> {
        // The unique index on order_id closes the race between the service's
        // existence check and this insert.
        sqlx::query(
            r"
            INSERT INTO reviews (id, product_id, buyer_id, order_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(review.id.into_inner())
        .bind(review.product_id.into_inner())
        .bind(review.buyer_id.into_inner())
        .bind(review.order_id.into_inner())
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReviewAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_order(&self, order_id: Uid) -> RepoResult<Option<Review>> {
        let result = sqlx::query_as::<_, ReviewModel>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE order_id = $1"
        ))
        .bind(order_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Review::from))
    }

    #[instrument(skip(self))]
    async fn list_by_product(&self, product_id: Uid) -> RepoResult<Vec<Review>> {
        let models = sqlx::query_as::<_, ReviewModel>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = $1 ORDER BY created_at DESC"
        ))
        .bind(product_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(Review::from).collect())
    }
}
