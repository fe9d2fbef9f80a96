use anyhow::Context as _;
use tracing::info;

use storefront_auth_types::password::hash_password;
use storefront_domain::account::{normalize_email, validate_email, validate_password};
use storefront_domain::id::UserId;

use crate::domain::repository::UserRepository;
use crate::domain::types::{NewUser, User};
use crate::error::StorefrontError;

// ── RegisterAccount ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RegisterAccountInput {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub struct RegisterAccountUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> RegisterAccountUseCase<U> {
    /// Create an active account. No confirmation step: the account can log in at once.
    pub async fn execute(&self, input: RegisterAccountInput) -> Result<User, StorefrontError> {
        if !validate_email(&input.email) {
            return Err(StorefrontError::InvalidEmail);
        }
        let email = normalize_email(&input.email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(StorefrontError::EmailTaken);
        }
        if !validate_password(&input.password) {
            return Err(StorefrontError::PasswordTooShort);
        }

        let password_hash = hash_password(&input.password).context("hash password")?;
        let user = self
            .users
            .create(&NewUser {
                email,
                password_hash,
                first_name: input.first_name.unwrap_or_default().trim().to_owned(),
                last_name: input.last_name.unwrap_or_default().trim().to_owned(),
            })
            .await?;

        info!(user_id = %user.id, "account registered");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, id: UserId) -> Result<Option<User>, StorefrontError> {
        self.users.find_by_id(id).await
    }
}
