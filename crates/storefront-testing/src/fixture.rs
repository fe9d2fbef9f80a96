//! Per-test database scopes and record fixtures.
//!
//! Every [`TestScope`] owns a private in-memory SQLite database with all
//! migrations applied. Rows written through [`Fixtures`] live exactly as long
//! as the scope: dropping it discards the database.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection, DbErr,
};
use uuid::Uuid;

use storefront_auth_types::password::{PasswordError, hash_password};
use storefront_auth_types::token::AuthError;
use storefront_domain::catalog::{slugify, validate_slug};
use storefront_migration::{Migrator, MigratorTrait};
use storefront_schema::{checkout_lines, checkouts, product_variants, products, users};

pub const TEST_USER_EMAIL: &str = "test@example.com";
pub const TEST_USER_PASSWORD: &str = "testpass123";
pub const TEST_PRODUCT_NAME: &str = "Test Product";
pub const TEST_PRODUCT_DESCRIPTION: &str = "Test Description";
pub const TEST_PRODUCT_SLUG: &str = "test-product";
pub const TEST_VARIANT_SKU: &str = "TEST-SKU-001";
/// 99.99 in minor units.
pub const TEST_VARIANT_PRICE_MINOR: i64 = 9999;
pub const TEST_CURRENCY: &str = "USD";
pub const TEST_CHECKOUT_EMAIL: &str = "customer@example.com";
pub const TEST_CHANNEL: &str = "default-channel";

/// The in-memory database lives exactly as long as the scope's single pooled connection.
const TEST_DATABASE_URL: &str = "sqlite::memory:";

/// Setup failure. Always fatal to the test; never retried.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to open test database: {0}")]
    Connect(#[source] DbErr),
    #[error("failed to apply migrations: {0}")]
    Migrate(#[source] DbErr),
    #[error("failed to insert {entity}: {source}")]
    Insert {
        entity: &'static str,
        #[source]
        source: DbErr,
    },
    #[error(transparent)]
    Hash(#[from] PasswordError),
    #[error("failed to sign token: {0}")]
    Token(#[from] AuthError),
    #[error("no URL-safe slug can be derived from product name {0:?}")]
    Slug(String),
    #[error("failed to start test server: {0}")]
    Server(String),
}

fn insert_failed(entity: &'static str) -> impl FnOnce(DbErr) -> FixtureError {
    move |source| FixtureError::Insert { entity, source }
}

/// An isolated database for one test.
pub struct TestScope {
    db: DatabaseConnection,
}

impl TestScope {
    pub async fn begin() -> Result<Self, FixtureError> {
        let mut opts = ConnectOptions::new(TEST_DATABASE_URL);
        opts.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(opts)
            .await
            .map_err(FixtureError::Connect)?;
        Migrator::up(&db, None)
            .await
            .map_err(FixtureError::Migrate)?;
        Ok(Self { db })
    }

    /// Connection to hand to the app under test.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn fixtures(&self) -> Fixtures<'_> {
        Fixtures { db: &self.db }
    }

    /// Close the scope explicitly. Dropping it has the same effect.
    pub async fn close(self) -> Result<(), FixtureError> {
        self.db.close().await.map_err(FixtureError::Connect)
    }
}

/// A checkout row together with its single line.
#[derive(Debug, Clone)]
pub struct CheckoutFixture {
    pub checkout: checkouts::Model,
    pub line: checkout_lines::Model,
}

/// user → product → variant → checkout, built in dependency order.
#[derive(Debug, Clone)]
pub struct CheckoutGraph {
    pub user: users::Model,
    pub product: products::Model,
    pub variant: product_variants::Model,
    pub checkout: CheckoutFixture,
}

/// Record factories bound to a [`TestScope`].
pub struct Fixtures<'a> {
    db: &'a DatabaseConnection,
}

impl Fixtures<'_> {
    /// `test@example.com` / `testpass123`, "Test User".
    pub async fn user(&self) -> Result<users::Model, FixtureError> {
        self.user_with_email(TEST_USER_EMAIL).await
    }

    /// Same as [`user`](Self::user) with another email, for multi-user scenarios.
    pub async fn user_with_email(&self, email: &str) -> Result<users::Model, FixtureError> {
        let now = Utc::now();
        users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(email.to_lowercase()),
            password_hash: Set(hash_password(TEST_USER_PASSWORD)?),
            first_name: Set("Test".to_owned()),
            last_name: Set("User".to_owned()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
        .map_err(insert_failed("user"))
    }

    pub async fn product(&self) -> Result<products::Model, FixtureError> {
        self.product_named(TEST_PRODUCT_NAME).await
    }

    /// A product whose slug is derived from `name` ("Blue Shirt" → `blue-shirt`).
    pub async fn product_named(&self, name: &str) -> Result<products::Model, FixtureError> {
        let slug = slugify(name);
        if !validate_slug(&slug) {
            return Err(FixtureError::Slug(name.to_owned()));
        }
        let now = Utc::now();
        products::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_owned()),
            description: Set(TEST_PRODUCT_DESCRIPTION.to_owned()),
            slug: Set(slug),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
        .map_err(insert_failed("product"))
    }

    /// `TEST-SKU-001` at 99.99 USD.
    pub async fn product_variant(
        &self,
        product: &products::Model,
    ) -> Result<product_variants::Model, FixtureError> {
        self.product_variant_with_sku(product, TEST_VARIANT_SKU)
            .await
    }

    pub async fn product_variant_with_sku(
        &self,
        product: &products::Model,
        sku: &str,
    ) -> Result<product_variants::Model, FixtureError> {
        product_variants::ActiveModel {
            id: Set(Uuid::now_v7()),
            product_id: Set(product.id),
            sku: Set(sku.to_owned()),
            name: Set(String::new()),
            price_amount: Set(TEST_VARIANT_PRICE_MINOR),
            currency: Set(TEST_CURRENCY.to_owned()),
            created_at: Set(Utc::now()),
        }
        .insert(self.db)
        .await
        .map_err(insert_failed("product variant"))
    }

    /// Checkout owned by `user` with one line of `variant`, quantity 1.
    pub async fn checkout(
        &self,
        user: &users::Model,
        variant: &product_variants::Model,
    ) -> Result<CheckoutFixture, FixtureError> {
        let now = Utc::now();
        let checkout = checkouts::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(Some(user.id)),
            email: Set(TEST_CHECKOUT_EMAIL.to_owned()),
            channel: Set(TEST_CHANNEL.to_owned()),
            currency: Set(TEST_CURRENCY.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
        .map_err(insert_failed("checkout"))?;

        let line = checkout_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            checkout_id: Set(checkout.id),
            variant_id: Set(variant.id),
            quantity: Set(1),
            position: Set(0),
        }
        .insert(self.db)
        .await
        .map_err(insert_failed("checkout line"))?;

        Ok(CheckoutFixture { checkout, line })
    }

    pub async fn checkout_graph(&self) -> Result<CheckoutGraph, FixtureError> {
        let user = self.user().await?;
        let product = self.product().await?;
        let variant = self.product_variant(&product).await?;
        let checkout = self.checkout(&user, &variant).await?;
        Ok(CheckoutGraph {
            user,
            product,
            variant,
            checkout,
        })
    }
}
