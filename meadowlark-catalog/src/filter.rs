use serde::{Deserialize, Serialize};

use crate::vacation::Vacation;

/// Exact-match criteria for catalog lookups. Unset fields match anything;
/// set fields must all match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub available: Option<bool>,
}

impl CatalogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_sku(sku: impl Into<String>) -> Self {
        Self { sku: Some(sku.into()), ..Self::default() }
    }

    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self { slug: Some(slug.into()), ..Self::default() }
    }

    pub fn by_category(category: impl Into<String>) -> Self {
        Self { category: Some(category.into()), ..Self::default() }
    }

    pub fn available() -> Self {
        Self { available: Some(true), ..Self::default() }
    }

    pub fn matches(&self, vacation: &Vacation) -> bool {
        self.category.as_deref().map_or(true, |c| vacation.category == c)
            && self.slug.as_deref().map_or(true, |s| vacation.slug == s)
            && self.sku.as_deref().map_or(true, |s| vacation.sku == s)
            && self.available.map_or(true, |a| vacation.available == a)
    }
}
