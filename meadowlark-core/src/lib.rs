pub mod repository;
pub mod flash;
pub mod session;
pub mod cart;
pub mod validation;
pub mod booking;
pub mod notification;
pub mod fortune;

#[cfg(test)]
pub(crate) mod testing;

pub use booking::{BookingOutcome, BookingService};
pub use cart::{Cart, CartItem, CartService};
pub use fortune::get_fortune;
pub use flash::{set_flash, take_flash, Flash, FlashKind};
pub use notification::{NewsletterSignup, NotificationService, SignupOutcome, Subscription};
pub use repository::{NewsletterRepository, RepoResult, SubscriptionRepository, VacationRepository};
pub use session::{SessionData, SessionStore};

use meadowlark_catalog::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
