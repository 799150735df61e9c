//! Pagination extractor
//!
//! Extracts `page` / `limit` query parameters into the domain's offset
//! pagination window. Out-of-range values clamp instead of erroring.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use market_core::Page;
use serde::Deserialize;

use crate::response::ApiError;

/// Default page size
const DEFAULT_LIMIT: i64 = 10;

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize)]
struct RawPageParams {
    #[serde(default)]
    page: Option<i64>,
    #[serde(default)]
    limit: Option<i64>,
}

/// Validated pagination window extractor
#[derive(Debug, Clone, Copy)]
pub struct PageQuery(pub Page);

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPageParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(PageQuery(Page::new(
            raw.page.unwrap_or(1),
            raw.limit.unwrap_or(DEFAULT_LIMIT),
        )))
    }
}
