//! Contract harness configuration loaded from environment variables.

/// Loaded from env vars after `dotenv::dotenv().ok()`.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// HMAC secret shared with the target service (`JWT_SECRET`).
    ///
    /// When set, the harness can mint a force-login token for `user.id` /
    /// `user.email` instead of needing `--token`.
    pub jwt_secret: Option<String>,

    /// Per-request timeout in seconds (`CONTRACT_TIMEOUT_SECS`).
    /// default: `10`
    pub timeout_secs: u64,
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl HarnessConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            jwt_secret: lookup("JWT_SECRET").filter(|s| !s.is_empty()),
            timeout_secs: lookup("CONTRACT_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}
