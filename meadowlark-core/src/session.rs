use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::flash::Flash;
use crate::repository::RepoResult;

/// Everything the site keeps per visitor between requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    #[serde(default)]
    pub cart: Option<Cart>,
    #[serde(default)]
    pub flash: Option<Flash>,
}

impl SessionData {
    /// The visitor's cart, created on first use.
    pub fn cart_mut(&mut self) -> &mut Cart {
        self.cart.get_or_insert_with(Cart::default)
    }
}

/// Key-value storage for sessions with a time-to-live. Must be reachable by
/// every service replica, otherwise a visitor's cart depends on which
/// replica answered.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &str) -> RepoResult<Option<SessionData>>;

    async fn save(&self, id: &str, data: &SessionData, ttl_seconds: u64) -> RepoResult<()>;

    async fn destroy(&self, id: &str) -> RepoResult<()>;
}
