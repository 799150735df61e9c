//! Order workflow engine
//!
//! Validates a cart, locks in pricing, decrements stock, persists the
//! order, and drives the status lifecycle with its notification side
//! effects. Order creation and the stock decrement commit together at the
//! store; notification dispatch happens after the fact and can never
//! change the outcome.

use std::collections::HashMap;

use chrono::Utc;
use market_core::{
    generate_order_number, DomainError, Order, OrderItem, OrderStatus, Page, Product, Uid,
};
use market_notify::{Notification, NotificationLine};
use tracing::{info, instrument, warn};

use crate::dto::{
    order_response, CreateOrderRequest, OrderResponse, Paginated, ReviewResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// How many times a colliding order number is regenerated before giving up
const ORDER_NUMBER_RETRIES: usize = 3;

/// Order workflow engine
pub struct OrderService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OrderService<'a> {
    /// Create a new OrderService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Place an order.
    ///
    /// Every line item is validated (existence, active flag, stock,
    /// single-seller invariant) before anything is written; the store then
    /// re-checks stock with a conditional decrement inside the same
    /// transaction as the insert, so racing orders cannot oversell.
    #[instrument(skip(self, request), fields(buyer_id = %buyer_id))]
    pub async fn create_order(
        &self,
        buyer_id: Uid,
        request: CreateOrderRequest,
    ) -> ServiceResult<OrderResponse> {
        let now = Utc::now();
        let mut seller_id: Option<Uid> = None;
        let mut items = Vec::with_capacity(request.items.len());
        let mut products: HashMap<Uid, Product> = HashMap::new();

        for line in &request.items {
            let product_id: Uid = line
                .product_id
                .parse()
                .map_err(|_| ServiceError::validation("Invalid product id format"))?;

            let product = self
                .ctx
                .product_repo()
                .find_by_id(product_id)
                .await?
                .ok_or(DomainError::ProductNotFound(product_id))?;

            if !product.active {
                return Err(DomainError::ProductInactive(product.title.clone()).into());
            }

            if !product.has_stock(line.quantity) {
                return Err(DomainError::InsufficientStock(product.title.clone()).into());
            }

            match seller_id {
                None => seller_id = Some(product.seller_id),
                Some(seller) if seller != product.seller_id => {
                    return Err(DomainError::MixedSellers.into());
                }
                Some(_) => {}
            }

            // Snapshot the effective price; later product edits never touch
            // this order.
            let unit_price = product.effective_price_at(now);
            items.push(OrderItem::new(product_id, line.quantity, unit_price));
            products.insert(product_id, product);
        }

        // Unreachable given the per-item validation, but guarded anyway.
        let seller_id = seller_id.ok_or(DomainError::EmptyOrder)?;

        let mut order = Order::new(
            self.ctx.generate_id(),
            generate_order_number(),
            buyer_id,
            seller_id,
            items,
            request.shipping_address,
            request.payment_method,
        );

        self.persist_with_retry(&mut order, &products).await?;

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = %order.total_amount,
            "Order created"
        );

        let response = order_response(&order, &products);

        // Confirmation is dispatched after the order is durable; its fate
        // never reaches the caller.
        self.notify_confirmation(&order, &products).await;

        Ok(response)
    }

    /// Seller-driven status transition with notification side effect
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        seller_id: Uid,
        order_id: Uid,
        new_status: OrderStatus,
    ) -> ServiceResult<OrderResponse> {
        let mut order = self
            .ctx
            .order_repo()
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?;

        if !order.is_sold_by(seller_id) {
            return Err(ServiceError::permission_denied(
                "Not authorized to update this order",
            ));
        }

        if !order.status.can_transition_to(new_status) {
            return Err(DomainError::InvalidStatusTransition {
                from: order.status,
                to: new_status,
            }
            .into());
        }

        self.ctx.order_repo().update_status(order_id, new_status).await?;
        order.status = new_status;

        info!(order_id = %order_id, status = %new_status, "Order status updated");

        let products = self.resolve_products(std::slice::from_ref(&order)).await?;
        let response = order_response(&order, &products);

        // The mutation is durable; whatever happens to the notification is
        // logged and forgotten.
        self.notify_status_change(&order, &products).await;

        Ok(response)
    }

    /// A buyer's orders, optionally filtered by status
    #[instrument(skip(self))]
    pub async fn list_buyer_orders(
        &self,
        buyer_id: Uid,
        status: Option<OrderStatus>,
        page: Page,
    ) -> ServiceResult<Paginated<OrderResponse>> {
        let (orders, total) = self
            .ctx
            .order_repo()
            .list_by_buyer(buyer_id, status, page)
            .await?;

        self.paginate(orders, total, page).await
    }

    /// A seller's orders, optionally filtered by status
    #[instrument(skip(self))]
    pub async fn list_seller_orders(
        &self,
        seller_id: Uid,
        status: Option<OrderStatus>,
        page: Page,
    ) -> ServiceResult<Paginated<OrderResponse>> {
        let (orders, total) = self
            .ctx
            .order_repo()
            .list_by_seller(seller_id, status, page)
            .await?;

        self.paginate(orders, total, page).await
    }

    /// A buyer's single order plus its review, if written
    #[instrument(skip(self))]
    pub async fn get_buyer_order(
        &self,
        buyer_id: Uid,
        order_id: Uid,
    ) -> ServiceResult<(OrderResponse, Option<ReviewResponse>)> {
        let order = self
            .ctx
            .order_repo()
            .find_by_id(order_id)
            .await?
            .filter(|order| order.is_bought_by(buyer_id))
            .ok_or(DomainError::OrderNotFound(order_id))?;

        let review = self.ctx.review_repo().find_by_order(order_id).await?;
        let products = self.resolve_products(std::slice::from_ref(&order)).await?;

        Ok((
            order_response(&order, &products),
            review.as_ref().map(ReviewResponse::from),
        ))
    }

    /// Build order responses for a page of orders
    pub(crate) async fn paginate(
        &self,
        orders: Vec<Order>,
        total: i64,
        page: Page,
    ) -> ServiceResult<Paginated<OrderResponse>> {
        let products = self.resolve_products(&orders).await?;
        let items = orders
            .iter()
            .map(|order| order_response(order, &products))
            .collect();

        Ok(Paginated::new(items, total, page.page, page.limit))
    }

    /// Look up the surviving products referenced by a set of orders
    pub(crate) async fn resolve_products(
        &self,
        orders: &[Order],
    ) -> ServiceResult<HashMap<Uid, Product>> {
        let mut products = HashMap::new();
        for order in orders {
            for item in &order.items {
                if products.contains_key(&item.product_id) {
                    continue;
                }
                if let Some(product) =
                    self.ctx.product_repo().find_by_id(item.product_id).await?
                {
                    products.insert(item.product_id, product);
                }
            }
        }
        Ok(products)
    }

    /// Persist the order, regenerating the order number on the rare
    /// store-level collision.
    async fn persist_with_retry(
        &self,
        order: &mut Order,
        products: &HashMap<Uid, Product>,
    ) -> ServiceResult<()> {
        let mut attempts = 0;
        loop {
            match self.ctx.order_repo().create(order).await {
                Ok(()) => return Ok(()),
                Err(DomainError::OrderNumberExists) if attempts < ORDER_NUMBER_RETRIES => {
                    attempts += 1;
                    warn!(
                        order_number = %order.order_number,
                        attempts,
                        "Order number collision, regenerating"
                    );
                    order.order_number = generate_order_number();
                }
                // The store's conditional decrement lost a race; rewrite the
                // product id into the title the buyer knows.
                Err(DomainError::InsufficientStock(id_str)) => {
                    let title = id_str
                        .parse::<Uid>()
                        .ok()
                        .and_then(|id| products.get(&id))
                        .map_or(id_str, |product| product.title.clone());
                    return Err(DomainError::InsufficientStock(title).into());
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    async fn notify_confirmation(&self, order: &Order, products: &HashMap<Uid, Product>) {
        let Some(buyer) = self.buyer_for(order).await else {
            return;
        };

        self.ctx.dispatcher().dispatch(Notification::OrderConfirmation {
            to: buyer.email,
            buyer_name: buyer.name,
            order_number: order.order_number.clone(),
            total_amount: order.total_amount,
            items: notification_lines(order, products),
            shipping_address: order.shipping_address.clone(),
            payment_method: order.payment_method.to_string(),
        });
    }

    async fn notify_status_change(&self, order: &Order, products: &HashMap<Uid, Product>) {
        let Some(buyer) = self.buyer_for(order).await else {
            return;
        };

        let notification = if order.status == OrderStatus::Completed {
            Notification::OrderDelivered {
                to: buyer.email,
                buyer_name: buyer.name,
                order_number: order.order_number.clone(),
                total_amount: order.total_amount,
                items: notification_lines(order, products),
            }
        } else {
            Notification::OrderStatusUpdate {
                to: buyer.email,
                buyer_name: buyer.name,
                order_number: order.order_number.clone(),
                status: order.status,
            }
        };

        self.ctx.dispatcher().dispatch(notification);
    }

    async fn buyer_for(&self, order: &Order) -> Option<market_core::Account> {
        match self.ctx.account_repo().find_by_id(order.buyer_id).await {
            Ok(Some(account)) => Some(account),
            Ok(None) => None,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "Buyer lookup for notification failed");
                None
            }
        }
    }
}

fn notification_lines(
    order: &Order,
    products: &HashMap<Uid, Product>,
) -> Vec<NotificationLine> {
    order
        .items
        .iter()
        .map(|item| NotificationLine {
            title: products
                .get(&item.product_id)
                .map_or_else(|| "Product".to_string(), |p| p.title.clone()),
            quantity: item.quantity,
            unit_price: item.unit_price,
        })
        .collect()
}
