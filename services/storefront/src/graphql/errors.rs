use async_graphql::{ErrorExtensions, SimpleObject};

use crate::error::StorefrontError;

/// Per-field error reported in checkout mutation payloads.
#[derive(Debug, Clone, SimpleObject)]
pub struct CheckoutError {
    pub field: Option<String>,
    pub message: Option<String>,
    pub code: String,
}

/// Per-field error reported in account and token mutation payloads.
#[derive(Debug, Clone, SimpleObject)]
pub struct AccountError {
    pub field: Option<String>,
    pub message: Option<String>,
    pub code: String,
}

impl From<&StorefrontError> for CheckoutError {
    fn from(e: &StorefrontError) -> Self {
        Self {
            field: e.field().map(str::to_owned),
            message: Some(e.to_string()),
            code: e.kind().to_owned(),
        }
    }
}

impl From<&StorefrontError> for AccountError {
    fn from(e: &StorefrontError) -> Self {
        Self {
            field: e.field().map(str::to_owned),
            message: Some(e.to_string()),
            code: e.kind().to_owned(),
        }
    }
}

/// Split a use-case result for a mutation payload.
///
/// User errors land in the payload's `errors` list next to a null object; anything
/// else fails the field with a top-level error.
pub fn into_payload<T, E>(
    result: Result<T, StorefrontError>,
) -> async_graphql::Result<(Option<T>, Vec<E>)>
where
    E: for<'a> From<&'a StorefrontError>,
{
    match result {
        Ok(value) => Ok((Some(value), vec![])),
        Err(e) if e.is_user_error() => Ok((None, vec![E::from(&e)])),
        Err(e) => Err(e.extend()),
    }
}
