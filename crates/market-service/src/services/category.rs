//! Category service
//!
//! Seller-owned categories with globally unique names and slugs.

use market_core::{Category, DomainError, Uid};
use tracing::{info, instrument, warn};

use crate::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Category service
pub struct CategoryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CategoryService<'a> {
    /// Create a new CategoryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All categories, optionally filtered by active flag
    #[instrument(skip(self))]
    pub async fn list(&self, active: Option<bool>) -> ServiceResult<Vec<CategoryResponse>> {
        let categories = self.ctx.category_repo().list(active).await?;
        Ok(categories.iter().map(CategoryResponse::from).collect())
    }

    /// The calling seller's categories
    #[instrument(skip(self))]
    pub async fn list_by_owner(
        &self,
        owner_id: Uid,
        active: Option<bool>,
    ) -> ServiceResult<Vec<CategoryResponse>> {
        let categories = self
            .ctx
            .category_repo()
            .list_by_owner(owner_id, active)
            .await?;
        Ok(categories.iter().map(CategoryResponse::from).collect())
    }

    /// Create a category owned by the calling seller.
    ///
    /// The name is globally unique (case-insensitive); a slug collision at
    /// the store gets one retry with a disambiguation suffix.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        owner_id: Uid,
        request: CreateCategoryRequest,
    ) -> ServiceResult<CategoryResponse> {
        if self
            .ctx
            .category_repo()
            .find_by_name(&request.name)
            .await?
            .is_some()
        {
            return Err(ServiceError::Domain(DomainError::CategoryNameExists));
        }

        let mut category = Category::new(self.ctx.generate_id(), request.name, owner_id);
        category.description = request.description;
        category.image = request.image;
        category.active = request.active;

        if let Err(e) = self.ctx.category_repo().create(&category).await {
            match e {
                DomainError::SlugExists => {
                    warn!(slug = %category.slug, "Slug collision, retrying with suffix");
                    category.disambiguate_slug();
                    self.ctx.category_repo().create(&category).await?;
                }
                other => return Err(other.into()),
            }
        }

        info!(category_id = %category.id, slug = %category.slug, "Category created");

        Ok(CategoryResponse::from(&category))
    }

    /// Update a category; only the owning seller may do this
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        owner_id: Uid,
        category_id: Uid,
        request: UpdateCategoryRequest,
    ) -> ServiceResult<CategoryResponse> {
        let mut category = self.owned_category(owner_id, category_id).await?;

        if let Some(name) = request.name {
            if !name.eq_ignore_ascii_case(&category.name) {
                if let Some(existing) = self.ctx.category_repo().find_by_name(&name).await? {
                    if existing.id != category.id {
                        return Err(ServiceError::Domain(DomainError::CategoryNameExists));
                    }
                }
            }
            category.set_name(name);
        }
        if request.description.is_some() {
            category.description = request.description;
        }
        if request.image.is_some() {
            category.image = request.image;
        }
        if let Some(active) = request.active {
            category.active = active;
        }

        if let Err(e) = self.ctx.category_repo().update(&category).await {
            match e {
                DomainError::SlugExists => {
                    warn!(slug = %category.slug, "Slug collision on rename, retrying with suffix");
                    category.disambiguate_slug();
                    self.ctx.category_repo().update(&category).await?;
                }
                other => return Err(other.into()),
            }
        }

        info!(category_id = %category.id, "Category updated");

        Ok(CategoryResponse::from(&category))
    }

    /// Delete a category; blocked while any product still references its
    /// name
    #[instrument(skip(self))]
    pub async fn delete(&self, owner_id: Uid, category_id: Uid) -> ServiceResult<()> {
        let category = self.owned_category(owner_id, category_id).await?;

        let in_use = self
            .ctx
            .product_repo()
            .count_by_category_name(&category.name)
            .await?;
        if in_use > 0 {
            return Err(ServiceError::Domain(DomainError::CategoryInUse {
                count: in_use,
            }));
        }

        self.ctx.category_repo().delete(category.id).await?;

        info!(category_id = %category_id, "Category deleted");
        Ok(())
    }

    async fn owned_category(&self, owner_id: Uid, category_id: Uid) -> ServiceResult<Category> {
        let category = self
            .ctx
            .category_repo()
            .find_by_id(category_id)
            .await?
            .ok_or(DomainError::CategoryNotFound(category_id))?;

        if !category.is_owned_by(owner_id) {
            return Err(ServiceError::Domain(DomainError::NotResourceOwner));
        }

        Ok(category)
    }
}
