//! Request extractors

mod auth;
mod pagination;
mod validated;

pub use auth::{AdminAccount, AuthAccount, BuyerAccount, SellerAccount};
pub use pagination::PageQuery;
pub use validated::ValidatedJson;
