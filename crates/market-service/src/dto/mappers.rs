//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use std::collections::HashMap;

use chrono::Utc;
use market_core::{Account, Category, Order, Product, Review, StatusCount, TopProduct, Uid};

use super::responses::{
    AccountResponse, CategoryResponse, OrderItemResponse, OrderResponse, ProductResponse,
    ProductSummary, ReviewResponse, StatusCountResponse, TopProductResponse,
};

// ============================================================================
// Account Mappers
// ============================================================================

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            phone: account.phone.clone(),
            address: account.address.clone(),
            banned: account.banned,
            created_at: account.created_at,
        }
    }
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

// ============================================================================
// Product Mappers
// ============================================================================

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            seller_id: product.seller_id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price,
            discount_price: product.discount_price,
            discount_expires_at: product.discount_expires_at,
            effective_price: product.effective_price_at(Utc::now()),
            stock: product.stock,
            active: product.active,
            images: product.images.clone(),
            video: product.video.clone(),
            features: product.features.clone(),
            tags: product.tags.clone(),
            brand: product.brand.clone(),
            featured: product.featured,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self::from(&product)
    }
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            image: product.images.first().cloned(),
            price: product.price,
        }
    }
}

// ============================================================================
// Category Mappers
// ============================================================================

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            image: category.image.clone(),
            active: category.active,
            owner_id: category.owner_id.to_string(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self::from(&category)
    }
}

// ============================================================================
// Order Mappers
// ============================================================================

/// Build an order response, joining in compact product references from the
/// given lookup. Snapshotted prices always come from the order itself;
/// deleted products simply produce no reference.
pub fn order_response(order: &Order, products: &HashMap<Uid, Product>) -> OrderResponse {
    let items = order
        .items
        .iter()
        .map(|item| OrderItemResponse {
            product_id: item.product_id.to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total(),
            product: products.get(&item.product_id).map(ProductSummary::from),
        })
        .collect();

    OrderResponse {
        id: order.id.to_string(),
        order_number: order.order_number.clone(),
        buyer_id: order.buyer_id.to_string(),
        seller_id: order.seller_id.to_string(),
        items,
        total_amount: order.total_amount,
        shipping_address: order.shipping_address.clone(),
        payment_method: order.payment_method,
        payment_status: order.payment_status,
        status: order.status,
        created_at: order.created_at,
        updated_at: order.updated_at,
    }
}

// ============================================================================
// Review Mappers
// ============================================================================

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.to_string(),
            product_id: review.product_id.to_string(),
            buyer_id: review.buyer_id.to_string(),
            order_id: review.order_id.to_string(),
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: review.created_at,
        }
    }
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self::from(&review)
    }
}

// ============================================================================
// Dashboard Mappers
// ============================================================================

impl From<&StatusCount> for StatusCountResponse {
    fn from(entry: &StatusCount) -> Self {
        Self {
            status: entry.status,
            count: entry.count,
            total_amount: entry.total_amount,
        }
    }
}

impl From<&TopProduct> for TopProductResponse {
    fn from(entry: &TopProduct) -> Self {
        Self {
            product_id: entry.product_id.to_string(),
            title: entry.title.clone(),
            image: entry.image.clone(),
            quantity_sold: entry.quantity_sold,
            revenue: entry.revenue,
        }
    }
}
