use serde::Deserialize;

use storefront_auth_types::token::DEFAULT_ACCESS_TOKEN_TTL_SECS;
use storefront_core::config::Config;
use storefront_domain::catalog::{DEFAULT_MAX_LINE_QUANTITY, LINE_QUANTITY_CEILING};

/// Storefront service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontConfig {
    /// Database connection URL (`postgres://...` or `sqlite:...`).
    pub database_url: String,
    /// HMAC secret for signing JWT access and refresh tokens.
    pub jwt_secret: String,
    /// TCP port to listen on. Env var: `STOREFRONT_PORT`.
    #[serde(default = "default_port")]
    pub storefront_port: u16,
    /// The only sales channel checkouts may be created in.
    #[serde(default = "default_channel")]
    pub default_channel: String,
    /// ISO 4217 code all prices are listed in.
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default = "default_max_line_quantity")]
    pub max_checkout_line_quantity: u32,
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_secs: u64,
}

impl Config for StorefrontConfig {}

impl StorefrontConfig {
    /// Per-line quantity cap, held below what the quantity columns can store.
    pub fn max_line_quantity(&self) -> u32 {
        self.max_checkout_line_quantity.min(LINE_QUANTITY_CEILING)
    }
}

fn default_port() -> u16 {
    8000
}

fn default_channel() -> String {
    "default-channel".to_owned()
}

fn default_currency() -> String {
    "USD".to_owned()
}

fn default_max_line_quantity() -> u32 {
    DEFAULT_MAX_LINE_QUANTITY
}

fn default_access_token_ttl() -> u64 {
    DEFAULT_ACCESS_TOKEN_TTL_SECS
}
