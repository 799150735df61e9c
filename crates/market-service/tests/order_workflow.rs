//! Behavior tests for the order workflow engine

mod support;

use chrono::{Duration, Utc};
use market_core::{DomainError, OrderStatus, Page, PaymentMethod, Role, Uid};
use market_service::{
    CreateOrderRequest, OrderItemRequest, OrderService, ServiceError,
};
use rust_decimal::Decimal;
use support::TestHarness;

fn order_request(items: Vec<(Uid, i32)>) -> CreateOrderRequest {
    CreateOrderRequest {
        items: items
            .into_iter()
            .map(|(product_id, quantity)| OrderItemRequest {
                product_id: product_id.to_string(),
                quantity,
            })
            .collect(),
        shipping_address: "12 Market Street, Springfield".to_string(),
        payment_method: PaymentMethod::CashOnDelivery,
    }
}

#[tokio::test]
async fn order_totals_and_stock_follow_the_cart() {
    let harness = TestHarness::new();
    let buyer = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;
    let p = harness.seed_product(seller.id, 100, 5).await;
    let q = harness.seed_product(seller.id, 50, 10).await;

    let service = OrderService::new(&harness.ctx);
    let order = service
        .create_order(buyer.id, order_request(vec![(p.id, 2), (q.id, 1)]))
        .await
        .unwrap();

    assert_eq!(order.total_amount, Decimal::from(250));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(harness.stock_of(p.id), 3);
    assert_eq!(harness.stock_of(q.id), 9);
    assert!(order.order_number.starts_with("ORD-"));

    // Exactly one confirmation attempt
    harness.settle().await;
    assert_eq!(harness.sent_matching("Order confirmation"), 1);
}

#[tokio::test]
async fn snapshot_prices_survive_product_edits() {
    let harness = TestHarness::new();
    let buyer = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;
    let mut product = harness.seed_product(seller.id, 100, 5).await;

    let service = OrderService::new(&harness.ctx);
    let order = service
        .create_order(buyer.id, order_request(vec![(product.id, 1)]))
        .await
        .unwrap();
    assert_eq!(order.total_amount, Decimal::from(100));

    // Triple the price after the fact
    product.price = Decimal::from(300);
    harness.ctx.product_repo().update(&product).await.unwrap();

    let order_id: Uid = order.id.parse().unwrap();
    let (fetched, _) = service.get_buyer_order(buyer.id, order_id).await.unwrap();
    assert_eq!(fetched.total_amount, Decimal::from(100));
    assert_eq!(fetched.items[0].unit_price, Decimal::from(100));
}

#[tokio::test]
async fn valid_unexpired_discount_is_charged() {
    let harness = TestHarness::new();
    let buyer = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;

    let mut product = harness.seed_product(seller.id, 100, 5).await;
    product.discount_price = Some(Decimal::from(80));
    product.discount_expires_at = Some(Utc::now() + Duration::hours(1));
    harness.ctx.product_repo().update(&product).await.unwrap();

    let service = OrderService::new(&harness.ctx);
    let order = service
        .create_order(buyer.id, order_request(vec![(product.id, 2)]))
        .await
        .unwrap();
    assert_eq!(order.total_amount, Decimal::from(160));
}

#[tokio::test]
async fn expired_discount_is_not_charged() {
    let harness = TestHarness::new();
    let buyer = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;

    let mut product = harness.seed_product(seller.id, 100, 5).await;
    product.discount_price = Some(Decimal::from(80));
    product.discount_expires_at = Some(Utc::now() - Duration::hours(1));
    harness.ctx.product_repo().update(&product).await.unwrap();

    let service = OrderService::new(&harness.ctx);
    let order = service
        .create_order(buyer.id, order_request(vec![(product.id, 1)]))
        .await
        .unwrap();
    assert_eq!(order.total_amount, Decimal::from(100));
}

#[tokio::test]
async fn mixed_sellers_rejected_before_any_stock_moves() {
    let harness = TestHarness::new();
    let buyer = harness.seed_account(Role::Buyer).await;
    let seller_a = harness.seed_account(Role::Seller).await;
    let seller_b = harness.seed_account(Role::Seller).await;
    let p = harness.seed_product(seller_a.id, 100, 5).await;
    let q = harness.seed_product(seller_b.id, 50, 5).await;

    let service = OrderService::new(&harness.ctx);
    let result = service
        .create_order(buyer.id, order_request(vec![(p.id, 1), (q.id, 1)]))
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::Domain(DomainError::MixedSellers))
    ));
    assert_eq!(harness.stock_of(p.id), 5);
    assert_eq!(harness.stock_of(q.id), 5);
}

#[tokio::test]
async fn inactive_missing_and_understocked_products_fail() {
    let harness = TestHarness::new();
    let buyer = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;
    let service = OrderService::new(&harness.ctx);

    // Missing
    let result = service
        .create_order(buyer.id, order_request(vec![(Uid::new(999_999), 1)]))
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::Domain(DomainError::ProductNotFound(_)))
    ));

    // Inactive
    let mut product = harness.seed_product(seller.id, 100, 5).await;
    product.active = false;
    harness.ctx.product_repo().update(&product).await.unwrap();
    let result = service
        .create_order(buyer.id, order_request(vec![(product.id, 1)]))
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::Domain(DomainError::ProductInactive(_)))
    ));

    // Understocked, with the product's title in the error
    let scarce = harness.seed_product(seller.id, 100, 2).await;
    let result = service
        .create_order(buyer.id, order_request(vec![(scarce.id, 3)]))
        .await;
    match result {
        Err(ServiceError::Domain(DomainError::InsufficientStock(title))) => {
            assert_eq!(title, scarce.title);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    assert_eq!(harness.stock_of(scarce.id), 2);
}

#[tokio::test]
async fn concurrent_orders_cannot_oversell() {
    let harness = TestHarness::new();
    let buyer_a = harness.seed_account(Role::Buyer).await;
    let buyer_b = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;
    let product = harness.seed_product(seller.id, 100, 5).await;

    let service = OrderService::new(&harness.ctx);
    let (r1, r2) = tokio::join!(
        service.create_order(buyer_a.id, order_request(vec![(product.id, 3)])),
        service.create_order(buyer_b.id, order_request(vec![(product.id, 3)])),
    );

    let successes = [r1.is_ok(), r2.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one racing order may win");
    assert_eq!(harness.stock_of(product.id), 2);
}

#[tokio::test]
async fn concurrent_orders_within_stock_both_succeed() {
    let harness = TestHarness::new();
    let buyer_a = harness.seed_account(Role::Buyer).await;
    let buyer_b = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;
    let product = harness.seed_product(seller.id, 100, 5).await;

    let service = OrderService::new(&harness.ctx);
    let (r1, r2) = tokio::join!(
        service.create_order(buyer_a.id, order_request(vec![(product.id, 2)])),
        service.create_order(buyer_b.id, order_request(vec![(product.id, 3)])),
    );

    assert!(r1.is_ok() && r2.is_ok());
    assert_eq!(harness.stock_of(product.id), 0);
}

#[tokio::test]
async fn status_walks_the_happy_path_and_notifies() {
    let harness = TestHarness::new();
    let buyer = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;
    let product = harness.seed_product(seller.id, 100, 5).await;

    let service = OrderService::new(&harness.ctx);
    let order = service
        .create_order(buyer.id, order_request(vec![(product.id, 1)]))
        .await
        .unwrap();
    let order_id: Uid = order.id.parse().unwrap();

    for status in [
        OrderStatus::Approved,
        OrderStatus::Processing,
        OrderStatus::OutForDelivery,
        OrderStatus::Completed,
    ] {
        let updated = service
            .update_status(seller.id, order_id, status)
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }

    harness.settle().await;
    // Three generic updates plus one delivered notification
    assert_eq!(harness.sent_matching("delivered"), 1);
}

#[tokio::test]
async fn invalid_transitions_are_rejected() {
    let harness = TestHarness::new();
    let buyer = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;
    let product = harness.seed_product(seller.id, 100, 10).await;

    let service = OrderService::new(&harness.ctx);
    let order = service
        .create_order(buyer.id, order_request(vec![(product.id, 1)]))
        .await
        .unwrap();
    let order_id: Uid = order.id.parse().unwrap();

    // Cannot skip straight to completed
    let result = service
        .update_status(seller.id, order_id, OrderStatus::Completed)
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::Domain(
            DomainError::InvalidStatusTransition { .. }
        ))
    ));

    // Terminal states are final
    service
        .update_status(seller.id, order_id, OrderStatus::Rejected)
        .await
        .unwrap();
    let result = service
        .update_status(seller.id, order_id, OrderStatus::Approved)
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::Domain(
            DomainError::InvalidStatusTransition { .. }
        ))
    ));
}

#[tokio::test]
async fn only_the_selling_account_may_move_status() {
    let harness = TestHarness::new();
    let buyer = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;
    let other_seller = harness.seed_account(Role::Seller).await;
    let product = harness.seed_product(seller.id, 100, 5).await;

    let service = OrderService::new(&harness.ctx);
    let order = service
        .create_order(buyer.id, order_request(vec![(product.id, 1)]))
        .await
        .unwrap();
    let order_id: Uid = order.id.parse().unwrap();

    let result = service
        .update_status(other_seller.id, order_id, OrderStatus::Approved)
        .await;
    assert!(matches!(result, Err(ServiceError::PermissionDenied(_))));
}

#[tokio::test]
async fn notification_failure_never_fails_the_request() {
    let harness = TestHarness::new();
    harness
        .notifier
        .fail
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let buyer = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;
    let product = harness.seed_product(seller.id, 100, 5).await;

    let service = OrderService::new(&harness.ctx);
    let order = service
        .create_order(buyer.id, order_request(vec![(product.id, 1)]))
        .await
        .expect("order creation must succeed despite notifier failure");
    let order_id: Uid = order.id.parse().unwrap();

    for status in [
        OrderStatus::Approved,
        OrderStatus::Processing,
        OrderStatus::OutForDelivery,
        OrderStatus::Completed,
    ] {
        service
            .update_status(seller.id, order_id, status)
            .await
            .expect("status change must succeed despite notifier failure");
    }

    // The status change was durable
    let (fetched, _) = service.get_buyer_order(buyer.id, order_id).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Completed);

    // Each event got exactly one attempt, none retried
    harness.settle().await;
    assert_eq!(harness.sent.lock().unwrap().len(), 5);
}

#[tokio::test]
async fn buyers_only_see_their_own_orders() {
    let harness = TestHarness::new();
    let buyer = harness.seed_account(Role::Buyer).await;
    let stranger = harness.seed_account(Role::Buyer).await;
    let seller = harness.seed_account(Role::Seller).await;
    let product = harness.seed_product(seller.id, 100, 5).await;

    let service = OrderService::new(&harness.ctx);
    let order = service
        .create_order(buyer.id, order_request(vec![(product.id, 1)]))
        .await
        .unwrap();
    let order_id: Uid = order.id.parse().unwrap();

    let result = service.get_buyer_order(stranger.id, order_id).await;
    assert!(matches!(
        result,
        Err(ServiceError::Domain(DomainError::OrderNotFound(_)))
    ));

    let page = service
        .list_buyer_orders(buyer.id, None, Page::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 1);

    let empty = service
        .list_buyer_orders(stranger.id, None, Page::default())
        .await
        .unwrap();
    assert_eq!(empty.pagination.total, 0);
}
