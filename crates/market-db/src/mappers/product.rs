//! Product entity <-> model mapper

use market_core::{Product, Uid};

use crate::models::ProductModel;

impl From<ProductModel> for Product {
    fn from(model: ProductModel) -> Self {
        Product {
            id: Uid::new(model.id),
            seller_id: Uid::new(model.seller_id),
            title: model.title,
            description: model.description,
            category: model.category,
            price: model.price,
            discount_price: model.discount_price,
            discount_expires_at: model.discount_expires_at,
            stock: model.stock,
            active: model.active,
            images: model.images,
            video: model.video,
            features: model.features,
            tags: model.tags,
            brand: model.brand,
            featured: model.featured,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
