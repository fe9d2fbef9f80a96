#![allow(async_fn_in_trait)]

use storefront_domain::id::{CheckoutId, ProductId, UserId, VariantId};
use storefront_domain::pagination::{Page, PageRequest};

use crate::domain::types::{Checkout, NewUser, Order, Product, ProductFilter, User, Variant};
use crate::error::StorefrontError;

/// Repository for customer accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StorefrontError>;

    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorefrontError>;

    /// The user plus their stored password hash, for login.
    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, StorefrontError>;

    /// Insert a user. A duplicate email yields [`StorefrontError::EmailTaken`].
    async fn create(&self, user: &NewUser) -> Result<User, StorefrontError>;
}

/// Read-only catalog access.
pub trait ProductRepository: Send + Sync {
    /// Products ordered by name, then id.
    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, StorefrontError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StorefrontError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, StorefrontError>;

    /// Variants of a product ordered by SKU.
    async fn variants_of(&self, product_id: ProductId) -> Result<Vec<Variant>, StorefrontError>;

    /// Variants among `ids` that exist. Missing ids are silently skipped.
    async fn find_variants(&self, ids: &[VariantId]) -> Result<Vec<Variant>, StorefrontError>;
}

/// Checkouts and the orders they turn into.
pub trait CheckoutRepository: Send + Sync {
    async fn find(&self, id: CheckoutId) -> Result<Option<Checkout>, StorefrontError>;

    /// Insert a checkout with its lines.
    async fn create(&self, checkout: &Checkout) -> Result<(), StorefrontError>;

    /// Replace the checkout's lines with `checkout.lines`.
    async fn save_lines(&self, checkout: &Checkout) -> Result<(), StorefrontError>;

    /// Insert `order` and delete the checkout it came from, atomically.
    ///
    /// Fails with [`StorefrontError::CheckoutNotFound`] if the checkout is already gone.
    async fn place_order(&self, checkout_id: CheckoutId, order: &Order)
    -> Result<(), StorefrontError>;
}
