use async_trait::async_trait;
use meadowlark_catalog::{CatalogFilter, Vacation};

use crate::notification::{NewsletterSignup, Subscription};

pub type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Catalog access. Implemented by the in-memory list and by PostgreSQL so
/// handlers never know which one they are talking to.
#[async_trait]
pub trait VacationRepository: Send + Sync {
    async fn find(&self, filter: &CatalogFilter) -> RepoResult<Vec<Vacation>>;

    async fn find_one(&self, filter: &CatalogFilter) -> RepoResult<Option<Vacation>>;

    async fn count(&self) -> RepoResult<u64>;

    async fn insert(&self, vacation: &Vacation) -> RepoResult<()>;

    /// Adds one to `packages_sold` in a single store operation and returns
    /// the updated record, or `None` when the SKU is unknown.
    async fn increment_packages_sold(&self, sku: &str) -> RepoResult<Option<Vacation>>;
}

/// "Notify me when in season" registrations, keyed by email.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Upserts the record for `email` and pushes `sku` onto its SKU list.
    /// With `dedupe` set, a SKU already present is not pushed again.
    async fn push_sku(&self, email: &str, sku: &str, dedupe: bool) -> RepoResult<Subscription>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Subscription>>;
}

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    async fn record(&self, signup: &NewsletterSignup) -> RepoResult<()>;
}
