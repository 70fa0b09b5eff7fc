//! In-process fakes for the repository traits.

use std::sync::Mutex;

use async_trait::async_trait;
use meadowlark_catalog::{CatalogFilter, Vacation};
use uuid::Uuid;

use crate::notification::{NewsletterSignup, Subscription};
use crate::repository::{NewsletterRepository, RepoResult, SubscriptionRepository, VacationRepository};

pub fn vacation(sku: &str, maximum_guests: u32, requires_waiver: bool) -> Vacation {
    Vacation {
        id: Uuid::new_v4(),
        name: format!("Tour {}", sku),
        slug: sku.to_lowercase(),
        category: "Test".to_string(),
        sku: sku.to_string(),
        description: String::new(),
        price_in_cents: 1000,
        tags: vec![],
        in_season: true,
        available: true,
        requires_waiver,
        maximum_guests,
        notes: None,
        packages_sold: 0,
    }
}

#[derive(Default)]
pub struct FakeVacations {
    vacations: Mutex<Vec<Vacation>>,
}

impl FakeVacations {
    pub fn seeded() -> Self {
        Self {
            vacations: Mutex::new(vec![
                vacation("HR199", 16, false),
                vacation("OC39", 8, false),
                vacation("B99", 4, true),
            ]),
        }
    }

    pub fn all(&self) -> Vec<Vacation> {
        self.vacations.lock().unwrap().clone()
    }

    pub fn sold(&self, sku: &str) -> u64 {
        self.all().iter().find(|v| v.sku == sku).map_or(0, |v| v.packages_sold)
    }
}

#[async_trait]
impl VacationRepository for FakeVacations {
    async fn find(&self, filter: &CatalogFilter) -> RepoResult<Vec<Vacation>> {
        Ok(self.all().into_iter().filter(|v| filter.matches(v)).collect())
    }

    async fn find_one(&self, filter: &CatalogFilter) -> RepoResult<Option<Vacation>> {
        Ok(self.all().into_iter().find(|v| filter.matches(v)))
    }

    async fn count(&self) -> RepoResult<u64> {
        Ok(self.all().len() as u64)
    }

    async fn insert(&self, vacation: &Vacation) -> RepoResult<()> {
        self.vacations.lock().unwrap().push(vacation.clone());
        Ok(())
    }

    async fn increment_packages_sold(&self, sku: &str) -> RepoResult<Option<Vacation>> {
        let mut vacations = self.vacations.lock().unwrap();
        Ok(vacations.iter_mut().find(|v| v.sku == sku).map(|v| {
            v.packages_sold += 1;
            v.clone()
        }))
    }
}

pub struct FailingVacations;

#[async_trait]
impl VacationRepository for FailingVacations {
    async fn find(&self, _filter: &CatalogFilter) -> RepoResult<Vec<Vacation>> {
        Err("store unreachable".into())
    }

    async fn find_one(&self, _filter: &CatalogFilter) -> RepoResult<Option<Vacation>> {
        Err("store unreachable".into())
    }

    async fn count(&self) -> RepoResult<u64> {
        Err("store unreachable".into())
    }

    async fn insert(&self, _vacation: &Vacation) -> RepoResult<()> {
        Err("store unreachable".into())
    }

    async fn increment_packages_sold(&self, _sku: &str) -> RepoResult<Option<Vacation>> {
        Err("store unreachable".into())
    }
}

#[derive(Default)]
pub struct FakeSubscriptions {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl FakeSubscriptions {
    pub fn skus(&self, email: &str) -> Vec<String> {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.email == email)
            .map(|s| s.skus.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubscriptionRepository for FakeSubscriptions {
    async fn push_sku(&self, email: &str, sku: &str, dedupe: bool) -> RepoResult<Subscription> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        if let Some(existing) = subscriptions.iter_mut().find(|s| s.email == email) {
            existing.push_sku(sku, dedupe);
            return Ok(existing.clone());
        }
        let subscription = Subscription { email: email.to_string(), skus: vec![sku.to_string()] };
        subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Subscription>> {
        Ok(self.subscriptions.lock().unwrap().iter().find(|s| s.email == email).cloned())
    }
}

pub struct FailingSubscriptions;

#[async_trait]
impl SubscriptionRepository for FailingSubscriptions {
    async fn push_sku(&self, _email: &str, _sku: &str, _dedupe: bool) -> RepoResult<Subscription> {
        Err("write failed".into())
    }

    async fn find_by_email(&self, _email: &str) -> RepoResult<Option<Subscription>> {
        Err("store unreachable".into())
    }
}

#[derive(Default)]
pub struct FakeNewsletter {
    signups: Mutex<Vec<NewsletterSignup>>,
}

impl FakeNewsletter {
    pub fn count(&self) -> usize {
        self.signups.lock().unwrap().len()
    }
}

#[async_trait]
impl NewsletterRepository for FakeNewsletter {
    async fn record(&self, signup: &NewsletterSignup) -> RepoResult<()> {
        self.signups.lock().unwrap().push(signup.clone());
        Ok(())
    }
}
