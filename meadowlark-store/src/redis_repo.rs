use async_trait::async_trait;
use meadowlark_core::repository::RepoResult;
use meadowlark_core::session::{SessionData, SessionStore};
use redis::AsyncCommands;
use tracing::debug;

/// Sessions as JSON strings under `sess:{id}`, expiring after the TTL.
#[derive(Clone)]
pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    fn key(id: &str) -> String {
        format!("sess:{}", id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &str) -> RepoResult<Option<SessionData>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(Self::key(id)).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, id: &str, data: &SessionData, ttl_seconds: u64) -> RepoResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(data)?;
        conn.set_ex::<_, _, ()>(Self::key(id), json, ttl_seconds).await?;
        debug!("Session saved: {}", id);
        Ok(())
    }

    async fn destroy(&self, id: &str) -> RepoResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(Self::key(id)).await?;
        Ok(())
    }
}
