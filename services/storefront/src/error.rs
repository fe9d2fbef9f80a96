use async_graphql::ErrorExtensions;

/// Storefront domain error variants.
///
/// Variants with a [`field`](StorefrontError::field) are user errors: mutations
/// report them in their payload `errors` list. The rest surface as top-level
/// GraphQL errors carrying `extensions.code`.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("channel not found")]
    ChannelNotFound,
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("quantity exceeds the limit of {max} per line")]
    QuantityGreaterThanLimit { max: u32 },
    #[error("variant not found")]
    VariantNotFound,
    #[error("email is required")]
    EmailRequired,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("a user with this email already exists")]
    EmailTaken,
    #[error("password is too short")]
    PasswordTooShort,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("checkout not found")]
    CheckoutNotFound,
    #[error("checkout has no lines")]
    NoLines,
    #[error("invalid token")]
    InvalidToken,
    #[error("token is invalid or expired")]
    JwtInvalid,
    #[error("invalid cursor")]
    InvalidCursor,
    #[error("either id or slug is required")]
    LookupArgumentRequired,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StorefrontError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChannelNotFound | Self::VariantNotFound | Self::CheckoutNotFound => "NOT_FOUND",
            Self::ZeroQuantity => "ZERO_QUANTITY",
            Self::QuantityGreaterThanLimit { .. } => "QUANTITY_GREATER_THAN_LIMIT",
            Self::EmailRequired => "REQUIRED",
            Self::InvalidEmail => "INVALID",
            Self::EmailTaken => "UNIQUE",
            Self::PasswordTooShort => "PASSWORD_TOO_SHORT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NoLines => "NO_LINES",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::JwtInvalid => "JWT_INVALID_TOKEN",
            Self::InvalidCursor => "INVALID_CURSOR",
            Self::LookupArgumentRequired => "GRAPHQL_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Input field a user error refers to, in GraphQL (camelCase) naming.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::ChannelNotFound => Some("channel"),
            Self::ZeroQuantity | Self::QuantityGreaterThanLimit { .. } => Some("quantity"),
            Self::VariantNotFound => Some("variantId"),
            Self::EmailRequired | Self::InvalidEmail | Self::EmailTaken => Some("email"),
            Self::InvalidCredentials => Some("email"),
            Self::PasswordTooShort => Some("password"),
            Self::CheckoutNotFound => Some("checkoutId"),
            Self::NoLines => Some("lines"),
            Self::JwtInvalid => Some("token"),
            Self::InvalidToken
            | Self::InvalidCursor
            | Self::LookupArgumentRequired
            | Self::Internal(_) => None,
        }
    }

    pub fn is_user_error(&self) -> bool {
        self.field().is_some()
    }
}

impl ErrorExtensions for StorefrontError {
    fn extend(&self) -> async_graphql::Error {
        // Only 500-class failures are logged here; the anyhow chain never reaches the client.
        if let Self::Internal(e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", self.kind());
            if let Some(field) = self.field() {
                ext.set("field", field);
            }
        })
    }
}
