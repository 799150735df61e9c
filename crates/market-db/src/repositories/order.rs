//! PostgreSQL implementation of OrderRepository
//!
//! Order creation runs as a single transaction: every line item's stock is
//! decremented with a conditional update (`stock >= quantity` in the WHERE
//! clause), then the order and its items are inserted. Any failed
//! condition rolls the whole transaction back, so stock can never be
//! overdrawn even under concurrent order creation.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use tracing::instrument;

use market_core::{
    DomainError, Order, OrderRepository, OrderStatus, Page, RepoResult, RevenueStats,
    StatusCount, TopProduct, Uid,
};

use crate::mappers::order_from_models;
use crate::models::{OrderItemModel, OrderModel};

use super::error::{map_db_error, map_unique_violation, order_not_found};

const ORDER_COLUMNS: &str = "id, order_number, buyer_id, seller_id, total_amount, \
     shipping_address, payment_method, payment_status, status, created_at, updated_at";

/// PostgreSQL implementation of OrderRepository
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new PgOrderRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch item rows for a set of orders and group them by order id
    async fn items_for(
        &self,
        order_ids: &[i64],
    ) -> RepoResult<std::collections::HashMap<i64, Vec<OrderItemModel>>> {
        let rows = sqlx::query_as::<_, OrderItemModel>(
            "SELECT order_id, product_id, quantity, unit_price \
             FROM order_items WHERE order_id = ANY($1) ORDER BY product_id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut grouped: std::collections::HashMap<i64, Vec<OrderItemModel>> =
            std::collections::HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row);
        }
        Ok(grouped)
    }

    /// Assemble entities for a page of order rows
    async fn assemble(&self, models: Vec<OrderModel>) -> RepoResult<Vec<Order>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut items = self.items_for(&ids).await?;

        models
            .into_iter()
            .map(|model| {
                let order_items = items.remove(&model.id).unwrap_or_default();
                order_from_models(model, order_items)
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    #[instrument(skip(self, order), fields(order_id = %order.id, order_number = %order.order_number))]
    async fn create(&self, order: &Order) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Conditional decrement per line item; zero rows affected means the
        // remaining stock does not cover the quantity and the whole
        // transaction is abandoned.
        for item in &order.items {
            let result = sqlx::query(
                "UPDATE products SET stock = stock - $2, updated_at = NOW() \
                 WHERE id = $1 AND stock >= $2",
            )
            .bind(item.product_id.into_inner())
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(DomainError::InsufficientStock(item.product_id.to_string()));
            }
        }

        sqlx::query(
            r"
            INSERT INTO orders (id, order_number, buyer_id, seller_id, total_amount,
                                shipping_address, payment_method, payment_status, status,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(order.id.into_inner())
        .bind(&order.order_number)
        .bind(order.buyer_id.into_inner())
        .bind(order.seller_id.into_inner())
        .bind(order.total_amount)
        .bind(&order.shipping_address)
        .bind(order.payment_method.as_str())
        .bind(order.payment_status.as_str())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::OrderNumberExists))?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order.id.into_inner())
            .bind(item.product_id.into_inner())
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Order>> {
        let model = sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let items = self
            .items_for(&[model.id])
            .await?
            .remove(&model.id)
            .unwrap_or_default();

        order_from_models(model, items).map(Some)
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: Uid, status: OrderStatus) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(order_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_buyer(
        &self,
        buyer_id: Uid,
        status: Option<OrderStatus>,
        page: Page,
    ) -> RepoResult<(Vec<Order>, i64)> {
        let status_str = status.map(|s| s.as_str().to_string());

        let models = sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE buyer_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(buyer_id.into_inner())
        .bind(&status_str)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE buyer_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(buyer_id.into_inner())
        .bind(&status_str)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok((self.assemble(models).await?, total))
    }

    #[instrument(skip(self))]
    async fn list_by_seller(
        &self,
        seller_id: Uid,
        status: Option<OrderStatus>,
        page: Page,
    ) -> RepoResult<(Vec<Order>, i64)> {
        let status_str = status.map(|s| s.as_str().to_string());

        let models = sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE seller_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(seller_id.into_inner())
        .bind(&status_str)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE seller_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(seller_id.into_inner())
        .bind(&status_str)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok((self.assemble(models).await?, total))
    }

    #[instrument(skip(self))]
    async fn count(&self, seller_id: Option<Uid>) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE ($1::bigint IS NULL OR seller_id = $1)",
        )
        .bind(seller_id.map(Uid::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn status_breakdown(&self, seller_id: Option<Uid>) -> RepoResult<Vec<StatusCount>> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS count, COALESCE(SUM(total_amount), 0) AS total_amount \
             FROM orders WHERE ($1::bigint IS NULL OR seller_id = $1) \
             GROUP BY status ORDER BY status",
        )
        .bind(seller_id.map(Uid::into_inner))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter()
            .map(|row| {
                let status: String = row.get("status");
                let status = status.parse().map_err(|_| {
                    DomainError::DatabaseError(format!("invalid order status: {status}"))
                })?;
                Ok(StatusCount {
                    status,
                    count: row.get("count"),
                    total_amount: row.get("total_amount"),
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn revenue_stats(&self, seller_id: Option<Uid>) -> RepoResult<RevenueStats> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(total_amount), 0) AS total_revenue, \
                    COALESCE(AVG(total_amount), 0) AS average_order_value, \
                    COUNT(*) AS completed_orders \
             FROM orders WHERE status = 'completed' AND ($1::bigint IS NULL OR seller_id = $1)",
        )
        .bind(seller_id.map(Uid::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(RevenueStats {
            total_revenue: row.get::<Decimal, _>("total_revenue"),
            average_order_value: row.get::<Decimal, _>("average_order_value"),
            completed_orders: row.get("completed_orders"),
        })
    }

    #[instrument(skip(self))]
    async fn top_products(
        &self,
        seller_id: Option<Uid>,
        limit: i64,
    ) -> RepoResult<Vec<TopProduct>> {
        let rows = sqlx::query(
            "SELECT oi.product_id, COALESCE(p.title, '(deleted product)') AS title, \
                    p.images[1] AS image, \
                    SUM(oi.quantity) AS quantity_sold, \
                    SUM(oi.quantity * oi.unit_price) AS revenue \
             FROM order_items oi \
             JOIN orders o ON o.id = oi.order_id \
             LEFT JOIN products p ON p.id = oi.product_id \
             WHERE ($1::bigint IS NULL OR o.seller_id = $1) \
             GROUP BY oi.product_id, p.title, p.images \
             ORDER BY quantity_sold DESC \
             LIMIT $2",
        )
        .bind(seller_id.map(Uid::into_inner))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| TopProduct {
                product_id: Uid::new(row.get("product_id")),
                title: row.get("title"),
                image: row.get("image"),
                quantity_sold: row.get("quantity_sold"),
                revenue: row.get("revenue"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn recent(&self, seller_id: Option<Uid>, limit: i64) -> RepoResult<Vec<Order>> {
        let models = sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE ($1::bigint IS NULL OR seller_id = $1) \
             ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(seller_id.map(Uid::into_inner))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.assemble(models).await
    }
}
