//! Category entity - a seller-owned, globally unique product grouping

use chrono::{DateTime, Utc};

use crate::value_objects::{slugify, Uid};

/// Product category. Name is globally unique (case-insensitive); the slug
/// is derived from the name and unique as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub active: bool,
    pub owner_id: Uid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new Category, deriving the slug from the name.
    ///
    /// Names that slugify to nothing get a time-based placeholder slug.
    pub fn new(id: Uid, name: String, owner_id: Uid) -> Self {
        let now = Utc::now();
        let slug = Self::slug_for(&name, now);
        Self {
            id,
            name,
            slug,
            description: None,
            image: None,
            active: true,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check ownership
    #[inline]
    pub fn is_owned_by(&self, seller_id: Uid) -> bool {
        self.owner_id == seller_id
    }

    /// Rename the category, re-deriving the slug
    pub fn set_name(&mut self, name: String) {
        let now = Utc::now();
        self.slug = Self::slug_for(&name, now);
        self.name = name;
        self.updated_at = now;
    }

    /// Append a disambiguation suffix after a slug collision at the store
    pub fn disambiguate_slug(&mut self) {
        self.slug = format!("{}-{}", self.slug, Utc::now().timestamp_millis());
    }

    fn slug_for(name: &str, now: DateTime<Utc>) -> String {
        let slug = slugify(name);
        if slug.is_empty() {
            format!("category-{}", now.timestamp_millis())
        } else {
            slug
        }
    }
}
