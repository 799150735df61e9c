//! Dashboard service
//!
//! Aggregated statistics for the seller and admin dashboards.

use market_core::{Role, Uid};
use tracing::instrument;

use crate::dto::{
    AdminDashboardResponse, AdminStats, SellerDashboardResponse, SellerStats,
    StatusCountResponse, TopProductResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::order::OrderService;

const TOP_PRODUCT_LIMIT: i64 = 10;
const SELLER_RECENT_ORDERS: i64 = 5;
const ADMIN_RECENT_ORDERS: i64 = 10;

/// Dashboard service
pub struct DashboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DashboardService<'a> {
    /// Create a new DashboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The calling seller's dashboard
    #[instrument(skip(self))]
    pub async fn seller_dashboard(&self, seller_id: Uid) -> ServiceResult<SellerDashboardResponse> {
        let total_products = self.ctx.product_repo().count_by_seller(seller_id, None).await?;
        let active_products = self
            .ctx
            .product_repo()
            .count_by_seller(seller_id, Some(true))
            .await?;
        let total_orders = self.ctx.order_repo().count(Some(seller_id)).await?;
        let revenue = self.ctx.order_repo().revenue_stats(Some(seller_id)).await?;
        let breakdown = self.ctx.order_repo().status_breakdown(Some(seller_id)).await?;
        let top_products = self
            .ctx
            .order_repo()
            .top_products(Some(seller_id), TOP_PRODUCT_LIMIT)
            .await?;
        let recent = self
            .ctx
            .order_repo()
            .recent(Some(seller_id), SELLER_RECENT_ORDERS)
            .await?;

        let order_service = OrderService::new(self.ctx);
        let products = order_service.resolve_products(&recent).await?;
        let recent_orders = recent
            .iter()
            .map(|order| crate::dto::order_response(order, &products))
            .collect();

        Ok(SellerDashboardResponse {
            stats: SellerStats {
                total_products,
                active_products,
                total_orders,
                total_revenue: revenue.total_revenue,
                average_order_value: revenue.average_order_value,
                completed_orders: revenue.completed_orders,
            },
            status_breakdown: breakdown.iter().map(StatusCountResponse::from).collect(),
            top_products: top_products.iter().map(TopProductResponse::from).collect(),
            recent_orders,
        })
    }

    /// The marketplace-wide admin dashboard
    #[instrument(skip(self))]
    pub async fn admin_dashboard(&self) -> ServiceResult<AdminDashboardResponse> {
        let total_accounts = self.ctx.account_repo().count(None).await?;
        let total_sellers = self.ctx.account_repo().count(Some(Role::Seller)).await?;
        let total_buyers = self.ctx.account_repo().count(Some(Role::Buyer)).await?;
        let total_products = self.ctx.product_repo().count().await?;
        let total_orders = self.ctx.order_repo().count(None).await?;
        let revenue = self.ctx.order_repo().revenue_stats(None).await?;
        let breakdown = self.ctx.order_repo().status_breakdown(None).await?;
        let top_products = self
            .ctx
            .order_repo()
            .top_products(None, TOP_PRODUCT_LIMIT)
            .await?;
        let recent = self.ctx.order_repo().recent(None, ADMIN_RECENT_ORDERS).await?;

        let order_service = OrderService::new(self.ctx);
        let products = order_service.resolve_products(&recent).await?;
        let recent_orders = recent
            .iter()
            .map(|order| crate::dto::order_response(order, &products))
            .collect();

        Ok(AdminDashboardResponse {
            stats: AdminStats {
                total_accounts,
                total_sellers,
                total_buyers,
                total_products,
                total_orders,
                total_revenue: revenue.total_revenue,
                average_order_value: revenue.average_order_value,
                completed_orders: revenue.completed_orders,
            },
            status_breakdown: breakdown.iter().map(StatusCountResponse::from).collect(),
            top_products: top_products.iter().map(TopProductResponse::from).collect(),
            recent_orders,
        })
    }
}
