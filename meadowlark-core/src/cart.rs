use std::sync::Arc;

use meadowlark_catalog::{CatalogError, CatalogFilter, Vacation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::repository::VacationRepository;
use crate::session::SessionData;
use crate::{CoreError, CoreResult};

/// One line in the cart: a snapshot of the vacation and how many guests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub product: Vacation,
    pub guests: u32,
}

/// Ordered cart lines plus the notes cart validation derives from them.
/// `warnings` and `errors` are rebuilt on every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Cart {
    /// Appends a line. Adding the same vacation twice yields two lines.
    /// A missing or zero guest count falls back to `default_guests`.
    pub fn add_item(&mut self, product: Vacation, guests: Option<u32>, default_guests: u32) -> &CartItem {
        let guests = match guests {
            Some(0) | None => default_guests,
            Some(n) => n,
        };
        self.items.push(CartItem { product, guests });
        &self.items[self.items.len() - 1]
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_in_cents(&self) -> i64 {
        self.items
            .iter()
            .map(|item| item.product.price_in_cents * i64::from(item.guests))
            .sum()
    }
}

/// Resolves SKUs against the catalog and puts the result in the session cart.
#[derive(Clone)]
pub struct CartService {
    vacations: Arc<dyn VacationRepository>,
    default_guests: u32,
}

impl CartService {
    pub fn new(vacations: Arc<dyn VacationRepository>, default_guests: u32) -> Self {
        Self { vacations, default_guests: default_guests.max(1) }
    }

    pub async fn add_to_cart(
        &self,
        session: &mut SessionData,
        sku: &str,
        guests: Option<u32>,
    ) -> CoreResult<CartItem> {
        let vacation = self
            .vacations
            .find_one(&CatalogFilter::by_sku(sku))
            .await
            .map_err(|e| CoreError::InternalError(e.to_string()))?;

        let Some(vacation) = vacation else {
            warn!("Cart add for unknown SKU {}", sku);
            return Err(CatalogError::UnknownSku(sku.to_string()).into());
        };

        let item = session.cart_mut().add_item(vacation, guests, self.default_guests).clone();
        info!("Added {} x{} to cart", item.product.sku, item.guests);
        Ok(item)
    }
}
