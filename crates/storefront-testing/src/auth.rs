//! Force login.
//!
//! Tests authenticate by minting a signed access token for a fixture user
//! directly, without going through the `tokenCreate` mutation. The app under
//! test must be configured with [`TEST_JWT_SECRET`].

use storefront_auth_types::token::{DEFAULT_ACCESS_TOKEN_TTL_SECS, TokenType, issue_token};
use storefront_schema::users;

use crate::fixture::FixtureError;

pub const TEST_JWT_SECRET: &str = "storefront-test-jwt-secret";

/// Access token for `user`, as if they had just logged in.
pub fn force_login_token(user: &users::Model) -> Result<String, FixtureError> {
    let issued = issue_token(
        user.id,
        &user.email,
        TokenType::Access,
        DEFAULT_ACCESS_TOKEN_TTL_SECS,
        TEST_JWT_SECRET,
    )?;
    Ok(issued.token)
}

/// Well-formed token signed with the wrong key.
pub fn forged_token(user: &users::Model) -> Result<String, FixtureError> {
    let issued = issue_token(
        user.id,
        &user.email,
        TokenType::Access,
        DEFAULT_ACCESS_TOKEN_TTL_SECS,
        "not-the-test-secret",
    )?;
    Ok(issued.token)
}

/// Refresh token for `user`; must not be accepted as a bearer token.
pub fn refresh_token(user: &users::Model) -> Result<String, FixtureError> {
    let issued = issue_token(
        user.id,
        &user.email,
        TokenType::Refresh,
        DEFAULT_ACCESS_TOKEN_TTL_SECS,
        TEST_JWT_SECRET,
    )?;
    Ok(issued.token)
}
