use std::sync::Arc;

use meadowlark_catalog::{CatalogFilter, Vacation};
use tracing::{error, info, warn};

use crate::flash::{set_flash, Flash};
use crate::repository::VacationRepository;
use crate::session::SessionData;

pub const BOOKING_FAILED: &str = "Something went wrong with your reservation; please contact us.";
pub const BOOKING_CONFIRMED: &str = "Your vacation has been booked.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOutcome {
    pub booked: bool,
    pub flash: Flash,
    pub vacation: Option<Vacation>,
}

/// Books a vacation package by SKU.
///
/// There is no capacity check: `packages_sold` is not compared against
/// anything. Failures never propagate, they become a warning flash.
#[derive(Clone)]
pub struct BookingService {
    vacations: Arc<dyn VacationRepository>,
}

impl BookingService {
    pub fn new(vacations: Arc<dyn VacationRepository>) -> Self {
        Self { vacations }
    }

    pub async fn book(&self, sku: &str, session: &mut SessionData) -> BookingOutcome {
        let outcome = match self.try_book(sku).await {
            Some(vacation) => {
                info!("Booked {} (packages sold: {})", vacation.sku, vacation.packages_sold);
                BookingOutcome {
                    booked: true,
                    flash: Flash::success("Thank you!", BOOKING_CONFIRMED),
                    vacation: Some(vacation),
                }
            }
            None => BookingOutcome {
                booked: false,
                flash: Flash::warning("Ooops!", BOOKING_FAILED),
                vacation: None,
            },
        };

        set_flash(session, outcome.flash.clone());
        outcome
    }

    async fn try_book(&self, sku: &str) -> Option<Vacation> {
        match self.vacations.find_one(&CatalogFilter::by_sku(sku)).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("Booking requested for unknown SKU {}", sku);
                return None;
            }
            Err(e) => {
                error!("Catalog lookup failed for {}: {}", sku, e);
                return None;
            }
        }

        match self.vacations.increment_packages_sold(sku).await {
            Ok(Some(vacation)) => Some(vacation),
            Ok(None) => {
                warn!("Vacation {} disappeared before it could be booked", sku);
                None
            }
            Err(e) => {
                error!("Failed to record booking for {}: {}", sku, e);
                None
            }
        }
    }
}
