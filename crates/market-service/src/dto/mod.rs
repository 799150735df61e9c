//! Request and response DTOs

mod mappers;
mod requests;
mod responses;

pub use mappers::order_response;
pub use requests::{
    BanRequest, CreateCategoryRequest, CreateOrderRequest, CreateProductRequest,
    CreateReviewRequest, ForgotPasswordRequest, LoginRequest, OrderItemRequest,
    RefreshTokenRequest, RegisterRequest, ResetPasswordRequest, UpdateCategoryRequest,
    UpdateOrderStatusRequest, UpdateProductRequest, UpdateProfileRequest,
};
pub use responses::{
    AccountResponse, AdminDashboardResponse, AdminStats, AuthResponse, CategoryResponse,
    HealthResponse, OrderItemResponse, OrderResponse, PageMeta, Paginated, ProductResponse,
    ProductSummary, ReadinessResponse, ReviewResponse, SellerDashboardResponse, SellerStats,
    StatusCountResponse, TopProductResponse,
};
