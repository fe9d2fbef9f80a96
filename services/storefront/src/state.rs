use sea_orm::DatabaseConnection;

use crate::config::StorefrontConfig;
use crate::infra::db::{DbCheckoutRepository, DbProductRepository, DbUserRepository};
use crate::usecase::checkout::CheckoutSettings;

/// Shared application state, handed to the GraphQL schema and to plain HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub access_token_ttl_secs: u64,
    pub checkout: CheckoutSettings,
}

impl AppState {
    pub fn from_config(db: DatabaseConnection, config: &StorefrontConfig) -> Self {
        Self {
            db,
            jwt_secret: config.jwt_secret.clone(),
            access_token_ttl_secs: config.access_token_ttl_secs,
            checkout: CheckoutSettings {
                channel: config.default_channel.clone(),
                currency: config.default_currency.clone(),
                max_line_quantity: config.max_line_quantity(),
            },
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn checkout_repo(&self) -> DbCheckoutRepository {
        DbCheckoutRepository {
            db: self.db.clone(),
        }
    }
}
