//! Process-local backends for development and tests. Sessions kept here
//! are only correct while a single service instance is running.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use meadowlark_catalog::{seed_vacations, CatalogError, CatalogFilter, Vacation};
use meadowlark_core::notification::{NewsletterSignup, Subscription};
use meadowlark_core::repository::{
    NewsletterRepository, RepoResult, SubscriptionRepository, VacationRepository,
};
use meadowlark_core::session::{SessionData, SessionStore};
use tokio::sync::RwLock;

/// A static catalog list, filtered in memory.
#[derive(Default)]
pub struct MemoryVacationRepository {
    vacations: RwLock<Vec<Vacation>>,
}

impl MemoryVacationRepository {
    pub fn new(vacations: Vec<Vacation>) -> Self {
        Self { vacations: RwLock::new(vacations) }
    }

    pub fn seeded() -> Self {
        Self::new(seed_vacations())
    }
}

#[async_trait]
impl VacationRepository for MemoryVacationRepository {
    async fn find(&self, filter: &CatalogFilter) -> RepoResult<Vec<Vacation>> {
        let vacations = self.vacations.read().await;
        Ok(vacations.iter().filter(|v| filter.matches(v)).cloned().collect())
    }

    async fn find_one(&self, filter: &CatalogFilter) -> RepoResult<Option<Vacation>> {
        let vacations = self.vacations.read().await;
        Ok(vacations.iter().find(|v| filter.matches(v)).cloned())
    }

    async fn count(&self) -> RepoResult<u64> {
        Ok(self.vacations.read().await.len() as u64)
    }

    async fn insert(&self, vacation: &Vacation) -> RepoResult<()> {
        vacation.validate()?;
        let mut vacations = self.vacations.write().await;
        if vacations.iter().any(|v| v.sku == vacation.sku) {
            return Err(CatalogError::InvalidVacation(format!("duplicate SKU {}", vacation.sku)).into());
        }
        vacations.push(vacation.clone());
        Ok(())
    }

    async fn increment_packages_sold(&self, sku: &str) -> RepoResult<Option<Vacation>> {
        let mut vacations = self.vacations.write().await;
        Ok(vacations.iter_mut().find(|v| v.sku == sku).map(|v| {
            v.packages_sold += 1;
            v.clone()
        }))
    }
}

#[derive(Default)]
pub struct MemorySubscriptionRepository {
    subscriptions: RwLock<HashMap<String, Subscription>>,
}

#[async_trait]
impl SubscriptionRepository for MemorySubscriptionRepository {
    async fn push_sku(&self, email: &str, sku: &str, dedupe: bool) -> RepoResult<Subscription> {
        let mut subscriptions = self.subscriptions.write().await;
        let subscription = subscriptions
            .entry(email.to_string())
            .or_insert_with(|| Subscription { email: email.to_string(), skus: Vec::new() });
        subscription.push_sku(sku, dedupe);
        Ok(subscription.clone())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Subscription>> {
        Ok(self.subscriptions.read().await.get(email).cloned())
    }
}

#[derive(Default)]
pub struct MemoryNewsletterRepository {
    signups: RwLock<Vec<NewsletterSignup>>,
}

impl MemoryNewsletterRepository {
    pub async fn signups(&self) -> Vec<NewsletterSignup> {
        self.signups.read().await.clone()
    }
}

#[async_trait]
impl NewsletterRepository for MemoryNewsletterRepository {
    async fn record(&self, signup: &NewsletterSignup) -> RepoResult<()> {
        self.signups.write().await.push(signup.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, (SessionData, DateTime<Utc>)>>,
}

fn retain_live(sessions: &mut HashMap<String, (SessionData, DateTime<Utc>)>, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, (_, expires_at)| *expires_at > now);
    before - sessions.len()
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> RepoResult<Option<SessionData>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(id)
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .map(|(data, _)| data.clone()))
    }

    /// Every write also sweeps out expired sessions, so visitors that never
    /// come back do not stay in memory.
    async fn save(&self, id: &str, data: &SessionData, ttl_seconds: u64) -> RepoResult<()> {
        let ttl = Duration::seconds(i64::try_from(ttl_seconds)?);
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let purged = retain_live(&mut sessions, now);
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }
        sessions.insert(id.to_string(), (data.clone(), now + ttl));
        Ok(())
    }

    async fn destroy(&self, id: &str) -> RepoResult<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}
