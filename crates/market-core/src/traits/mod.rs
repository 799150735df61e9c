//! Repository traits (ports)

mod repositories;

pub use repositories::{
    AccountRepository, CategoryRepository, OrderRepository, Page, ProductFilter,
    ProductRepository, RepoResult, RevenueStats, ReviewRepository, StatusCount, TopProduct,
};
