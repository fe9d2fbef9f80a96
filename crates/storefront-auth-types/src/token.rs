//! JWT access and refresh tokens.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, Validation, decode};
#[cfg(any(feature = "issuer", test))]
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token lifetime used when the service config does not override it.
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 300;

/// Refresh token lifetime (30 days).
pub const REFRESH_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Identity extracted from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub email: String,
    pub exp: u64,
}

/// Errors returned by token validation and minting.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("wrong token type")]
    WrongType,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims payload shared by token creation and validation.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user id (UUID string) |
/// | `email` | custom | account email at issue time |
/// | `typ` | custom | `access` or `refresh` |
/// | `iat` | `iat` | issued at, seconds since epoch |
/// | `exp` | `exp` | expiry, seconds since epoch |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub email: String,
    pub typ: TokenType,
    pub iat: u64,
    pub exp: u64,
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Decode and validate a JWT, returning raw claims.
///
/// HS256, `exp` checked with the default 60s leeway, `exp` + `sub` required.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a token of any type and return its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    decode_jwt(token, secret)
}

/// Validate an access token, returning the caller's identity.
///
/// Refresh tokens are rejected with [`AuthError::WrongType`].
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    if claims.typ != TokenType::Access {
        return Err(AuthError::WrongType);
    }
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        email: claims.email,
        exp: claims.exp,
    })
}

/// A freshly signed token and its expiry.
#[cfg(any(feature = "issuer", test))]
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub exp: u64,
}

/// Sign a token for `user_id`.
///
/// Requires the `issuer` feature: only the service (login) and the test harness
/// (force login) mint tokens.
#[cfg(any(feature = "issuer", test))]
pub fn issue_token(
    user_id: Uuid,
    email: &str,
    typ: TokenType,
    ttl_secs: u64,
    secret: &str,
) -> Result<IssuedToken, AuthError> {
    let iat = now_secs();
    let exp = iat + ttl_secs;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        typ,
        iat,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))?;
    Ok(IssuedToken { token, exp })
}
