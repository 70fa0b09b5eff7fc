pub mod app_config;
pub mod database;
pub mod memory;
pub mod redis_repo;
pub mod seed;
pub mod subscription_repo;
pub mod vacation_repo;

use std::sync::Arc;

use meadowlark_core::repository::{NewsletterRepository, SubscriptionRepository, VacationRepository};
use meadowlark_core::session::SessionStore;
use tracing::info;

pub use app_config::Config;
pub use database::DbClient;
pub use memory::{
    MemoryNewsletterRepository, MemorySessionStore, MemorySubscriptionRepository, MemoryVacationRepository,
};
pub use redis_repo::RedisSessionStore;
pub use seed::seed_if_empty;
pub use subscription_repo::{PgNewsletterRepository, PgSubscriptionRepository};
pub use vacation_repo::PgVacationRepository;

use app_config::{CatalogBackend, SessionBackend};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    MissingSetting(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Seeding failed: {0}")]
    Seed(String),
}

/// The storage collaborators the service runs against.
#[derive(Clone)]
pub struct Backends {
    pub vacations: Arc<dyn VacationRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub newsletter: Arc<dyn NewsletterRepository>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Backends {
    /// Everything in process, with the starter catalog loaded.
    pub fn in_memory() -> Self {
        Self {
            vacations: Arc::new(MemoryVacationRepository::seeded()),
            subscriptions: Arc::new(MemorySubscriptionRepository::default()),
            newsletter: Arc::new(MemoryNewsletterRepository::default()),
            sessions: Arc::new(MemorySessionStore::default()),
        }
    }

    /// Connects the backends named in `config` and seeds an empty catalog.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let mut backends = Self::in_memory();

        if config.catalog.backend == CatalogBackend::Postgres {
            let url = config.database.url.as_deref().ok_or(StoreError::MissingSetting("database.url"))?;
            let db = DbClient::new(url, config.database.max_connections).await?;
            db.migrate().await?;

            backends.vacations = Arc::new(PgVacationRepository::new(db.pool.clone()));
            backends.subscriptions = Arc::new(PgSubscriptionRepository::new(db.pool.clone()));
            backends.newsletter = Arc::new(PgNewsletterRepository::new(db.pool));
            seed_if_empty(backends.vacations.as_ref())
                .await
                .map_err(|e| StoreError::Seed(e.to_string()))?;
            info!("Catalog backed by PostgreSQL");
        } else {
            info!("Catalog backed by in-memory list");
        }

        if config.session.backend == SessionBackend::Redis {
            let url = config.redis.url.as_deref().ok_or(StoreError::MissingSetting("redis.url"))?;
            backends.sessions = Arc::new(RedisSessionStore::new(url).await?);
            info!("Sessions stored in Redis");
        } else {
            info!("Sessions stored in process memory");
        }

        Ok(backends)
    }
}
