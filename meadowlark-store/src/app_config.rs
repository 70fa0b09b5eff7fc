use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub backend: CatalogBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: None, max_connections: default_max_connections() }
    }
}

fn default_max_connections() -> u32 { 5 }

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackend,
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            ttl_seconds: default_ttl(),
            cookie_name: default_cookie_name(),
        }
    }
}

fn default_ttl() -> u64 { 60 * 60 * 24 }

fn default_cookie_name() -> String { "meadowlark.sid".to_string() }

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Whether a repeated in-season signup for the same SKU is dropped.
    #[serde(default = "default_true")]
    pub dedupe_subscription_skus: bool,
    /// Guest count used when a cart add omits it or sends zero.
    #[serde(default = "default_guests")]
    pub default_guests: u32,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self { dedupe_subscription_skus: true, default_guests: default_guests() }
    }
}

fn default_true() -> bool { true }

fn default_guests() -> u32 { 1 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // MEADOWLARK__SERVER__PORT=8080 sets server.port
            .add_source(config::Environment::with_prefix("MEADOWLARK").separator("__"));

        Self::from_builder(builder)
    }

    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}
