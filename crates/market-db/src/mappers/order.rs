//! Order entity <-> model mapper

use market_core::{DomainError, Order, OrderItem, Uid};

use crate::models::{OrderItemModel, OrderModel};

impl From<OrderItemModel> for OrderItem {
    fn from(model: OrderItemModel) -> Self {
        OrderItem {
            product_id: Uid::new(model.product_id),
            quantity: model.quantity,
            unit_price: model.unit_price,
        }
    }
}

/// Assemble an order entity from its row and item rows.
///
/// Parses the stored status / payment strings; unknown values indicate a
/// corrupted row and surface as database errors.
pub fn order_from_models(
    model: OrderModel,
    items: Vec<OrderItemModel>,
) -> Result<Order, DomainError> {
    let status = model
        .status
        .parse()
        .map_err(|_| DomainError::DatabaseError(format!("invalid order status: {}", model.status)))?;
    let payment_method = model.payment_method.parse().map_err(|_| {
        DomainError::DatabaseError(format!("invalid payment method: {}", model.payment_method))
    })?;
    let payment_status = model.payment_status.parse().map_err(|_| {
        DomainError::DatabaseError(format!("invalid payment status: {}", model.payment_status))
    })?;

    Ok(Order {
        id: Uid::new(model.id),
        order_number: model.order_number,
        buyer_id: Uid::new(model.buyer_id),
        seller_id: Uid::new(model.seller_id),
        items: items.into_iter().map(OrderItem::from).collect(),
        total_amount: model.total_amount,
        shipping_address: model.shipping_address,
        payment_method,
        payment_status,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
