//! Category entity <-> model mapper

use market_core::{Category, Uid};

use crate::models::CategoryModel;

impl From<CategoryModel> for Category {
    fn from(model: CategoryModel) -> Self {
        Category {
            id: Uid::new(model.id),
            name: model.name,
            slug: model.slug,
            description: model.description,
            image: model.image,
            active: model.active,
            owner_id: Uid::new(model.owner_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
