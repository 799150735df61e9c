//! Catalog service
//!
//! Public product browsing and seller-scoped product management.

use market_core::{DomainError, Page, Product, ProductFilter, Uid};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::dto::{
    CreateProductRequest, Paginated, ProductResponse, ReviewResponse, UpdateProductRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Catalog service
pub struct CatalogService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CatalogService<'a> {
    /// Create a new CatalogService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Public product listing with filters
    #[instrument(skip(self, filter))]
    pub async fn list_products(
        &self,
        filter: ProductFilter,
        page: Page,
    ) -> ServiceResult<Paginated<ProductResponse>> {
        let (products, total) = self.ctx.product_repo().list_active(&filter, page).await?;

        Ok(Paginated::new(
            products.iter().map(ProductResponse::from).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    /// Free-text product search
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        query: &str,
        page: Page,
    ) -> ServiceResult<Paginated<ProductResponse>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::validation("Search query is required"));
        }

        let (products, total) = self.ctx.product_repo().search(query, page).await?;

        Ok(Paginated::new(
            products.iter().map(ProductResponse::from).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    /// Product detail with its reviews
    #[instrument(skip(self))]
    pub async fn get_product(
        &self,
        product_id: Uid,
    ) -> ServiceResult<(ProductResponse, Vec<ReviewResponse>)> {
        let product = self
            .ctx
            .product_repo()
            .find_by_id(product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(product_id))?;

        let reviews = self.ctx.review_repo().list_by_product(product_id).await?;

        Ok((
            ProductResponse::from(&product),
            reviews.iter().map(ReviewResponse::from).collect(),
        ))
    }

    /// A seller's own products, optionally filtered by active flag
    #[instrument(skip(self))]
    pub async fn list_seller_products(
        &self,
        seller_id: Uid,
        active: Option<bool>,
        page: Page,
    ) -> ServiceResult<Paginated<ProductResponse>> {
        let (products, total) = self
            .ctx
            .product_repo()
            .list_by_seller(seller_id, active, page)
            .await?;

        Ok(Paginated::new(
            products.iter().map(ProductResponse::from).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    /// Create a product owned by the calling seller
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_product(
        &self,
        seller_id: Uid,
        request: CreateProductRequest,
    ) -> ServiceResult<ProductResponse> {
        validate_prices(request.price, request.discount_price)?;

        let mut product = Product::new(
            self.ctx.generate_id(),
            seller_id,
            request.title,
            request.description,
            request.category,
            request.price,
            request.stock,
        );
        product.discount_price = request.discount_price;
        product.discount_expires_at = request.discount_expires_at;
        product.images = request.images;
        product.video = request.video;
        product.features = request.features;
        product.tags = request.tags;
        product.brand = request.brand;
        product.featured = request.featured;

        self.ctx.product_repo().create(&product).await?;

        info!(product_id = %product.id, seller_id = %seller_id, "Product created");

        Ok(ProductResponse::from(&product))
    }

    /// Update a product; only the owning seller may do this
    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        seller_id: Uid,
        product_id: Uid,
        request: UpdateProductRequest,
    ) -> ServiceResult<ProductResponse> {
        let mut product = self.owned_product(seller_id, product_id).await?;

        if let Some(title) = request.title {
            product.title = title;
        }
        if let Some(description) = request.description {
            product.description = description;
        }
        if let Some(category) = request.category {
            product.category = category;
        }
        if let Some(price) = request.price {
            product.price = price;
        }
        if request.discount_price.is_some() {
            product.discount_price = request.discount_price;
        }
        if request.discount_expires_at.is_some() {
            product.discount_expires_at = request.discount_expires_at;
        }
        if let Some(stock) = request.stock {
            product.stock = stock;
        }
        if let Some(images) = request.images {
            product.images = images;
        }
        if request.video.is_some() {
            product.video = request.video;
        }
        if let Some(features) = request.features {
            product.features = features;
        }
        if let Some(tags) = request.tags {
            product.tags = tags;
        }
        if request.brand.is_some() {
            product.brand = request.brand;
        }
        if let Some(featured) = request.featured {
            product.featured = featured;
        }
        if let Some(active) = request.active {
            product.active = active;
        }

        validate_prices(product.price, product.discount_price)?;
        if product.images.is_empty() {
            return Err(ServiceError::validation("At least one image is required"));
        }

        self.ctx.product_repo().update(&product).await?;

        info!(product_id = %product.id, "Product updated");

        Ok(ProductResponse::from(&product))
    }

    /// Delete a product; only the owning seller may do this
    #[instrument(skip(self))]
    pub async fn delete_product(&self, seller_id: Uid, product_id: Uid) -> ServiceResult<()> {
        let product = self.owned_product(seller_id, product_id).await?;

        self.ctx.product_repo().delete(product.id).await?;

        info!(product_id = %product_id, seller_id = %seller_id, "Product deleted");
        Ok(())
    }

    async fn owned_product(&self, seller_id: Uid, product_id: Uid) -> ServiceResult<Product> {
        let product = self
            .ctx
            .product_repo()
            .find_by_id(product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(product_id))?;

        if !product.is_owned_by(seller_id) {
            return Err(ServiceError::Domain(DomainError::NotResourceOwner));
        }

        Ok(product)
    }
}

fn validate_prices(price: Decimal, discount_price: Option<Decimal>) -> ServiceResult<()> {
    if price <= Decimal::ZERO {
        return Err(ServiceError::validation("Price must be positive"));
    }
    if let Some(discount) = discount_price {
        if discount <= Decimal::ZERO {
            return Err(ServiceError::validation("Discount price must be positive"));
        }
    }
    Ok(())
}
