use async_graphql::{Context, Enum, ErrorExtensions, ID, InputObject, Object, Result, SimpleObject};

use storefront_domain::money::Money as DomainMoney;

use crate::domain::types as model;
use crate::error::StorefrontError;
use crate::graphql::app_state;
use crate::usecase::account::GetUserUseCase;
use crate::usecase::catalog::{GetProductUseCase, ListVariantsUseCase};

fn money_error(e: storefront_domain::money::MoneyError) -> async_graphql::Error {
    StorefrontError::Internal(e.into()).extend()
}

// ── Money ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, SimpleObject)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

impl From<&DomainMoney> for Money {
    fn from(m: &DomainMoney) -> Self {
        Self {
            amount: m.amount_f64(),
            currency: m.currency.clone(),
        }
    }
}

/// Gross and net amounts. Taxes are not modelled, so both are equal.
#[derive(Debug, Clone, SimpleObject)]
pub struct TaxedMoney {
    pub currency: String,
    pub gross: Money,
    pub net: Money,
}

impl From<&DomainMoney> for TaxedMoney {
    fn from(m: &DomainMoney) -> Self {
        Self {
            currency: m.currency.clone(),
            gross: m.into(),
            net: m.into(),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct TaxedMoneyRange {
    pub start: Option<TaxedMoney>,
    pub stop: Option<TaxedMoney>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct ProductPricingInfo {
    pub price_range: Option<TaxedMoneyRange>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct VariantPricingInfo {
    pub price: TaxedMoney,
}

// ── Catalog ──────────────────────────────────────────────────────────────────

pub struct Product(pub model::Product);

#[Object]
impl Product {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn slug(&self) -> &str {
        &self.0.slug
    }

    async fn variants(&self, ctx: &Context<'_>) -> Result<Vec<ProductVariant>> {
        let state = app_state(ctx)?;
        let usecase = ListVariantsUseCase {
            products: state.product_repo(),
        };
        let variants = usecase.execute(self.0.id).await.map_err(|e| e.extend())?;
        Ok(variants.into_iter().map(ProductVariant).collect())
    }

    /// Cheapest and dearest variant prices; null when the product has no variants.
    async fn pricing(&self, ctx: &Context<'_>) -> Result<ProductPricingInfo> {
        let state = app_state(ctx)?;
        let usecase = ListVariantsUseCase {
            products: state.product_repo(),
        };
        let variants = usecase.execute(self.0.id).await.map_err(|e| e.extend())?;
        let start = variants.iter().map(|v| &v.price).min_by_key(|p| p.amount);
        let stop = variants.iter().map(|v| &v.price).max_by_key(|p| p.amount);
        let price_range = match (start, stop) {
            (Some(start), Some(stop)) => Some(TaxedMoneyRange {
                start: Some(start.into()),
                stop: Some(stop.into()),
            }),
            _ => None,
        };
        Ok(ProductPricingInfo { price_range })
    }
}

pub struct ProductVariant(pub model::Variant);

#[Object]
impl ProductVariant {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn sku(&self) -> &str {
        &self.0.sku
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn product(&self, ctx: &Context<'_>) -> Result<Option<Product>> {
        let state = app_state(ctx)?;
        let usecase = GetProductUseCase {
            products: state.product_repo(),
        };
        let product = usecase
            .by_id(self.0.product_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(product.map(Product))
    }

    async fn pricing(&self) -> VariantPricingInfo {
        VariantPricingInfo {
            price: (&self.0.price).into(),
        }
    }
}

// ── Checkout ─────────────────────────────────────────────────────────────────

pub struct Checkout(pub model::Checkout);

#[Object]
impl Checkout {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn channel(&self) -> &str {
        &self.0.channel
    }

    async fn lines(&self) -> Vec<CheckoutLine> {
        self.0.lines.iter().cloned().map(CheckoutLine).collect()
    }

    /// Total number of items across all lines.
    async fn quantity(&self) -> i32 {
        i32::try_from(self.0.quantity()).unwrap_or(i32::MAX)
    }

    async fn subtotal_price(&self) -> Result<TaxedMoney> {
        let subtotal = self.0.subtotal().map_err(money_error)?;
        Ok((&subtotal).into())
    }

    /// Equal to the subtotal: shipping and taxes are not charged.
    async fn total_price(&self) -> Result<TaxedMoney> {
        let total = self.0.subtotal().map_err(money_error)?;
        Ok((&total).into())
    }

    /// Owner of the checkout; null for anonymous checkouts.
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(user_id) = self.0.user_id else {
            return Ok(None);
        };
        let state = app_state(ctx)?;
        let usecase = GetUserUseCase {
            users: state.user_repo(),
        };
        let user = usecase.execute(user_id).await.map_err(|e| e.extend())?;
        Ok(user.map(User))
    }
}

pub struct CheckoutLine(pub model::CheckoutLine);

#[Object]
impl CheckoutLine {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn variant(&self) -> ProductVariant {
        ProductVariant(self.0.variant.clone())
    }

    async fn quantity(&self) -> i32 {
        i32::try_from(self.0.quantity).unwrap_or(i32::MAX)
    }

    async fn total_price(&self) -> Result<TaxedMoney> {
        let total = self.0.total().map_err(money_error)?;
        Ok((&total).into())
    }
}

// ── Order ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum OrderStatus {
    Unfulfilled,
}

impl From<model::OrderStatus> for OrderStatus {
    fn from(status: model::OrderStatus) -> Self {
        match status {
            model::OrderStatus::Unfulfilled => Self::Unfulfilled,
        }
    }
}

pub struct Order(pub model::Order);

#[Object]
impl Order {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn status(&self) -> OrderStatus {
        self.0.status.into()
    }

    async fn user_email(&self) -> &str {
        &self.0.user_email
    }

    async fn total(&self) -> TaxedMoney {
        (&self.0.total).into()
    }

    async fn lines(&self) -> Vec<OrderLine> {
        self.0.lines.iter().cloned().map(OrderLine).collect()
    }

    /// Creation time, RFC 3339.
    async fn created(&self) -> String {
        self.0.created_at.to_rfc3339()
    }
}

pub struct OrderLine(pub model::OrderLine);

#[Object]
impl OrderLine {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn product_name(&self) -> &str {
        &self.0.product_name
    }

    async fn product_sku(&self) -> &str {
        &self.0.variant_sku
    }

    async fn quantity(&self) -> i32 {
        i32::try_from(self.0.quantity).unwrap_or(i32::MAX)
    }

    async fn unit_price(&self) -> TaxedMoney {
        (&self.0.unit_price).into()
    }

    async fn total_price(&self) -> Result<TaxedMoney> {
        let total = self.0.total().map_err(money_error)?;
        Ok((&total).into())
    }
}

// ── Account ──────────────────────────────────────────────────────────────────

pub struct User(pub model::User);

#[Object]
impl User {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn first_name(&self) -> &str {
        &self.0.first_name
    }

    async fn last_name(&self) -> &str {
        &self.0.last_name
    }

    async fn is_active(&self) -> bool {
        self.0.is_active
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, SimpleObject)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(SimpleObject)]
pub struct ProductCountableEdge {
    pub node: Product,
    pub cursor: String,
}

#[derive(SimpleObject)]
pub struct ProductCountableConnection {
    pub edges: Vec<ProductCountableEdge>,
    pub page_info: PageInfo,
    pub total_count: i64,
}

// ── Inputs ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, InputObject)]
pub struct ProductFilterInput {
    /// Case-insensitive substring of the name, description or slug.
    pub search: Option<String>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CheckoutLineInput {
    pub quantity: i32,
    pub variant_id: ID,
}

#[derive(Debug, Clone, InputObject)]
pub struct CheckoutCreateInput {
    pub lines: Vec<CheckoutLineInput>,
    pub email: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Clone, InputObject)]
pub struct AccountRegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
