//! PostgreSQL repository implementations

mod account;
mod category;
mod error;
mod order;
mod product;
mod review;

pub use account::PgAccountRepository;
pub use category::PgCategoryRepository;
pub use order::PgOrderRepository;
pub use product::PgProductRepository;
pub use review::PgReviewRepository;
