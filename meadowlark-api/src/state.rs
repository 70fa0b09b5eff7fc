use std::sync::Arc;

use meadowlark_core::{BookingService, CartService, NotificationService, SessionStore, VacationRepository};
use meadowlark_store::{Backends, Config};

#[derive(Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl_seconds: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub vacations: Arc<dyn VacationRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub cart: CartService,
    pub booking: BookingService,
    pub notifications: NotificationService,
    pub session: SessionSettings,
}

impl AppState {
    pub fn new(backends: Backends, config: &Config) -> Self {
        let rules = &config.business_rules;
        Self {
            cart: CartService::new(backends.vacations.clone(), rules.default_guests),
            booking: BookingService::new(backends.vacations.clone()),
            notifications: NotificationService::new(
                backends.subscriptions,
                backends.newsletter,
                rules.dedupe_subscription_skus,
            ),
            vacations: backends.vacations,
            sessions: backends.sessions,
            session: SessionSettings {
                cookie_name: config.session.cookie_name.clone(),
                ttl_seconds: config.session.ttl_seconds,
            },
        }
    }
}
