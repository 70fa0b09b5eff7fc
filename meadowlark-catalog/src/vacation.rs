use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable vacation package in the catalog.
///
/// Prices are kept in integer cents. `packages_sold` only ever grows, and
/// only through a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vacation {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub sku: String,
    pub description: String,
    pub price_in_cents: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub in_season: bool,
    pub available: bool,
    #[serde(default)]
    pub requires_waiver: bool,
    pub maximum_guests: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub packages_sold: u64,
}

/// Formats an amount in cents as dollars, e.g. `159920` -> `$1599.20`.
pub fn format_cents(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let cents = amount.unsigned_abs();
    format!("{}${}.{:02}", sign, cents / 100, cents % 100)
}

impl Vacation {
    /// Renders the price as dollars, e.g. `9995` -> `$99.95`.
    pub fn display_price(&self) -> String {
        format_cents(self.price_in_cents)
    }

    pub fn summary(&self) -> VacationSummary {
        VacationSummary {
            sku: self.sku.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            price: self.display_price(),
            in_season: self.in_season,
        }
    }

    /// Rejects records that cannot be looked up or booked.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.sku.trim().is_empty() {
            return Err(CatalogError::InvalidVacation(format!("{} has no SKU", self.name)));
        }
        if self.slug.trim().is_empty() {
            return Err(CatalogError::InvalidVacation(format!("{} has no slug", self.sku)));
        }
        if self.price_in_cents < 0 {
            return Err(CatalogError::InvalidVacation(format!("{} has a negative price", self.sku)));
        }
        Ok(())
    }
}

/// What the vacations listing shows for each package.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VacationSummary {
    pub sku: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: String,
    pub in_season: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid vacation: {0}")]
    InvalidVacation(String),

    #[error("Unknown SKU: {0}")]
    UnknownSku(String),
}
