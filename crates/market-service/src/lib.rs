//! # market-service
//!
//! Application layer: business services and their request/response DTOs.
//! Services receive a `ServiceContext` carrying every injected dependency
//! (repositories, JWT service, id generator, notification dispatcher).

pub mod dto;
pub mod services;

// Re-export commonly used types at crate root
pub use dto::{
    AccountResponse, AdminDashboardResponse, AdminStats, AuthResponse, BanRequest,
    CategoryResponse, CreateCategoryRequest, CreateOrderRequest, CreateProductRequest,
    CreateReviewRequest, ForgotPasswordRequest, HealthResponse, LoginRequest, OrderItemRequest,
    OrderItemResponse, OrderResponse, PageMeta, Paginated, ProductResponse, ProductSummary,
    ReadinessResponse, RefreshTokenRequest, RegisterRequest, ResetPasswordRequest,
    ReviewResponse, SellerDashboardResponse, SellerStats, StatusCountResponse,
    TopProductResponse, UpdateCategoryRequest, UpdateOrderStatusRequest, UpdateProductRequest,
    UpdateProfileRequest,
};
pub use services::{
    AdminService, AuthService, CatalogService, CategoryService, DashboardService, OrderService,
    ReviewService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
