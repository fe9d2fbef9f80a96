use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionTrait,
};

use storefront_core::sea_ext::search_any;
use storefront_domain::id::{CheckoutId, ProductId, UserId, VariantId};
use storefront_domain::money::Money;
use storefront_domain::pagination::{Page, PageRequest};
use storefront_schema::{
    checkout_lines, checkouts, order_lines, orders, product_variants, products, users,
};

use crate::domain::repository::{CheckoutRepository, ProductRepository, UserRepository};
use crate::domain::types::{
    Checkout, CheckoutLine, NewUser, Order, Product, ProductFilter, User, Variant,
};
use crate::error::StorefrontError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StorefrontError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorefrontError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, StorefrontError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user credentials")?;
        Ok(model.map(|m| {
            let hash = m.password_hash.clone();
            (user_from_model(m), hash)
        }))
    }

    async fn create(&self, user: &NewUser) -> Result<User, StorefrontError> {
        let now = Utc::now();
        let result = users::ActiveModel {
            id: Set(UserId::generate().0),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => Ok(user_from_model(model)),
            // Lost a race with a concurrent registration for the same email.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(StorefrontError::EmailTaken)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id.into(),
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        is_active: model.is_active,
    }
}

// ── Product repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl ProductRepository for DbProductRepository {
    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, StorefrontError> {
        let mut query = products::Entity::find();
        if let Some(search) = filter.search.as_deref() {
            query = query.filter(search_any(
                [
                    products::Column::Name,
                    products::Column::Description,
                    products::Column::Slug,
                ],
                search,
            ));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count products")?;
        let models = query
            .order_by_asc(products::Column::Name)
            .order_by_asc(products::Column::Id)
            .offset(page.offset)
            .limit(u64::from(page.first))
            .all(&self.db)
            .await
            .context("list products")?;

        Ok(Page {
            items: models.into_iter().map(product_from_model).collect(),
            offset: page.offset,
            total,
        })
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StorefrontError> {
        let model = products::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, StorefrontError> {
        let model = products::Entity::find()
            .filter(products::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find product by slug")?;
        Ok(model.map(product_from_model))
    }

    async fn variants_of(&self, product_id: ProductId) -> Result<Vec<Variant>, StorefrontError> {
        let models = product_variants::Entity::find()
            .filter(product_variants::Column::ProductId.eq(product_id.0))
            .order_by_asc(product_variants::Column::Sku)
            .all(&self.db)
            .await
            .context("list product variants")?;
        Ok(models.into_iter().map(variant_from_model).collect())
    }

    async fn find_variants(&self, ids: &[VariantId]) -> Result<Vec<Variant>, StorefrontError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = product_variants::Entity::find()
            .filter(product_variants::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .context("find variants by id")?;
        Ok(models.into_iter().map(variant_from_model).collect())
    }
}

fn product_from_model(model: products::Model) -> Product {
    Product {
        id: model.id.into(),
        name: model.name,
        description: model.description,
        slug: model.slug,
    }
}

fn variant_from_model(model: product_variants::Model) -> Variant {
    Variant {
        id: model.id.into(),
        product_id: model.product_id.into(),
        sku: model.sku,
        name: model.name,
        price: Money::from_minor_units(model.price_amount, model.currency),
    }
}

// ── Checkout repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCheckoutRepository {
    pub db: DatabaseConnection,
}

impl CheckoutRepository for DbCheckoutRepository {
    async fn find(&self, id: CheckoutId) -> Result<Option<Checkout>, StorefrontError> {
        let Some(model) = checkouts::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find checkout")?
        else {
            return Ok(None);
        };

        let rows = checkout_lines::Entity::find()
            .filter(checkout_lines::Column::CheckoutId.eq(model.id))
            .order_by_asc(checkout_lines::Column::Position)
            .find_also_related(product_variants::Entity)
            .all(&self.db)
            .await
            .context("load checkout lines")?;

        let lines = rows
            .into_iter()
            .filter_map(|(line, variant)| {
                variant.map(|v| CheckoutLine {
                    id: line.id.into(),
                    variant: variant_from_model(v),
                    quantity: u32::try_from(line.quantity).unwrap_or_default(),
                })
            })
            .collect();

        Ok(Some(Checkout {
            id: model.id.into(),
            user_id: model.user_id.map(UserId::from),
            email: model.email,
            channel: model.channel,
            currency: model.currency,
            lines,
        }))
    }

    async fn create(&self, checkout: &Checkout) -> Result<(), StorefrontError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let checkout = checkout.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    checkouts::ActiveModel {
                        id: Set(checkout.id.0),
                        user_id: Set(checkout.user_id.map(|id| id.0)),
                        email: Set(checkout.email.clone()),
                        channel: Set(checkout.channel.clone()),
                        currency: Set(checkout.currency.clone()),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await?;
                    insert_checkout_lines(txn, &checkout).await
                })
            })
            .await
            .context("create checkout")?;
        Ok(())
    }

    async fn save_lines(&self, checkout: &Checkout) -> Result<(), StorefrontError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let checkout = checkout.clone();
                Box::pin(async move {
                    checkout_lines::Entity::delete_many()
                        .filter(checkout_lines::Column::CheckoutId.eq(checkout.id.0))
                        .exec(txn)
                        .await?;
                    insert_checkout_lines(txn, &checkout).await?;
                    checkouts::ActiveModel {
                        id: Set(checkout.id.0),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("save checkout lines")?;
        Ok(())
    }

    async fn place_order(
        &self,
        checkout_id: CheckoutId,
        order: &Order,
    ) -> Result<(), StorefrontError> {
        let total_amount = order.total.to_minor_units().context("order total")?;

        let txn = self.db.begin().await.context("begin order transaction")?;

        checkout_lines::Entity::delete_many()
            .filter(checkout_lines::Column::CheckoutId.eq(checkout_id.0))
            .exec(&txn)
            .await
            .context("delete checkout lines")?;
        let deleted = checkouts::Entity::delete_by_id(checkout_id.0)
            .exec(&txn)
            .await
            .context("delete checkout")?;
        // Completed concurrently by another request.
        if deleted.rows_affected == 0 {
            txn.rollback().await.context("rollback order transaction")?;
            return Err(StorefrontError::CheckoutNotFound);
        }

        orders::ActiveModel {
            id: Set(order.id.0),
            user_id: Set(order.user_id.map(|id| id.0)),
            user_email: Set(order.user_email.clone()),
            status: Set(order.status.as_str().to_owned()),
            currency: Set(order.total.currency.clone()),
            total_amount: Set(total_amount),
            created_at: Set(order.created_at),
        }
        .insert(&txn)
        .await
        .context("insert order")?;

        for line in &order.lines {
            order_lines::ActiveModel {
                id: Set(line.id.0),
                order_id: Set(order.id.0),
                variant_id: Set(line.variant_id.map(|id| id.0)),
                product_name: Set(line.product_name.clone()),
                variant_sku: Set(line.variant_sku.clone()),
                quantity: Set(i32::try_from(line.quantity).context("order line quantity")?),
                unit_price_amount: Set(line.unit_price.to_minor_units().context("unit price")?),
            }
            .insert(&txn)
            .await
            .context("insert order line")?;
        }

        txn.commit().await.context("commit order transaction")?;
        Ok(())
    }
}

async fn insert_checkout_lines(
    txn: &DatabaseTransaction,
    checkout: &Checkout,
) -> Result<(), DbErr> {
    for (position, line) in checkout.lines.iter().enumerate() {
        checkout_lines::ActiveModel {
            id: Set(line.id.0),
            checkout_id: Set(checkout.id.0),
            variant_id: Set(line.variant.id.0),
            quantity: Set(int_column("quantity", line.quantity)?),
            position: Set(int_column("position", position)?),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

fn int_column<T: TryInto<i32>>(column: &str, value: T) -> Result<i32, DbErr> {
    value
        .try_into()
        .map_err(|_| DbErr::Custom(format!("{column} out of range")))
}
