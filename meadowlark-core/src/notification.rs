use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use meadowlark_shared::Masked;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::flash::{set_flash, Flash};
use crate::repository::{NewsletterRepository, SubscriptionRepository};
use crate::session::SessionData;
use crate::{CoreError, CoreResult};

static VALID_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    VALID_EMAIL.is_match(email)
}

/// An email address waiting to hear when vacations come into season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    pub email: String,
    pub skus: Vec<String>,
}

impl Subscription {
    /// Pushes `sku`, skipping it when `dedupe` is set and it is already there.
    pub fn push_sku(&mut self, sku: &str, dedupe: bool) {
        if dedupe && self.skus.iter().any(|s| s == sku) {
            return;
        }
        self.skus.push(sku.to_string());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsletterSignup {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub signed_up_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub subscribed: bool,
    pub flash: Flash,
}

/// In-season notification and newsletter signups.
#[derive(Clone)]
pub struct NotificationService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    newsletter: Arc<dyn NewsletterRepository>,
    dedupe_skus: bool,
}

impl NotificationService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        newsletter: Arc<dyn NewsletterRepository>,
        dedupe_skus: bool,
    ) -> Self {
        Self { subscriptions, newsletter, dedupe_skus }
    }

    /// Registers `email` for `sku`. The store is asked once; a failure is
    /// reported to the visitor and not retried.
    pub async fn subscribe(&self, email: &str, sku: &str, session: &mut SessionData) -> SignupOutcome {
        let email = email.trim();
        let masked = Masked(email.to_string());

        let outcome = if !is_valid_email(email) {
            warn!("Rejected in-season signup for invalid email {}", masked);
            SignupOutcome {
                subscribed: false,
                flash: Flash::danger("Validation error!", "The email address you entered was not valid."),
            }
        } else {
            match self.subscriptions.push_sku(email, sku, self.dedupe_skus).await {
                Ok(subscription) => {
                    info!("{} now follows {} SKU(s)", masked, subscription.skus.len());
                    SignupOutcome {
                        subscribed: true,
                        flash: Flash::success(
                            "Thank you!",
                            "You will be notified when this vacation is in season.",
                        ),
                    }
                }
                Err(e) => {
                    error!("Failed to save in-season signup for {}: {}", masked, e);
                    SignupOutcome {
                        subscribed: false,
                        flash: Flash::danger("Ooops!", "There was an error processing your request."),
                    }
                }
            }
        };

        set_flash(session, outcome.flash.clone());
        outcome
    }

    pub async fn sign_up_for_newsletter(&self, name: &str, email: &str) -> CoreResult<NewsletterSignup> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(CoreError::ValidationError("Invalid name email address.".to_string()));
        }

        let signup = NewsletterSignup {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.to_string(),
            signed_up_at: Utc::now(),
        };

        self.newsletter
            .record(&signup)
            .await
            .map_err(|e| CoreError::InternalError(e.to_string()))?;

        info!("Newsletter signup from {}", Masked(signup.email.clone()));
        Ok(signup)
    }
}
