use anyhow::Context as _;
use tracing::{debug, info};

use storefront_auth_types::password::verify_password;
use storefront_auth_types::token::{
    REFRESH_TOKEN_TTL_SECS, TokenType, issue_token, validate_access_token,
};
use storefront_domain::account::normalize_email;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::StorefrontError;

// ── CreateToken (login) ──────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CreateTokenOutput {
    pub user: User,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct CreateTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
    pub access_token_ttl_secs: u64,
}

impl<U: UserRepository> CreateTokenUseCase<U> {
    /// Exchange email + password for an access/refresh token pair.
    ///
    /// Unknown email, wrong password and inactive account are indistinguishable to the caller.
    pub async fn execute(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreateTokenOutput, StorefrontError> {
        let email = normalize_email(email);
        let Some((user, password_hash)) = self.users.find_credentials(&email).await? else {
            debug!("login for unknown email");
            return Err(StorefrontError::InvalidCredentials);
        };
        if !user.is_active || !verify_password(password, &password_hash) {
            debug!(user_id = %user.id, "login rejected");
            return Err(StorefrontError::InvalidCredentials);
        }

        let access = issue_token(
            user.id.0,
            &user.email,
            TokenType::Access,
            self.access_token_ttl_secs,
            &self.jwt_secret,
        )
        .context("sign access token")?;
        let refresh = issue_token(
            user.id.0,
            &user.email,
            TokenType::Refresh,
            REFRESH_TOKEN_TTL_SECS,
            &self.jwt_secret,
        )
        .context("sign refresh token")?;

        info!(user_id = %user.id, "token created");
        Ok(CreateTokenOutput {
            user,
            access_token: access.token,
            access_token_exp: access.exp,
            refresh_token: refresh.token,
        })
    }
}

// ── VerifyToken ──────────────────────────────────────────────────────────────

pub struct VerifyTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> VerifyTokenUseCase<U> {
    /// Resolve an access token to its (still active) user.
    pub async fn execute(&self, token: &str) -> Result<User, StorefrontError> {
        let info = validate_access_token(token.trim(), &self.jwt_secret).map_err(|e| {
            debug!(error = %e, "token verification failed");
            StorefrontError::JwtInvalid
        })?;
        self.users
            .find_by_id(info.user_id.into())
            .await?
            .filter(|u| u.is_active)
            .ok_or(StorefrontError::JwtInvalid)
    }
}
