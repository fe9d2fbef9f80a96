use chrono::{DateTime, Utc};

use storefront_domain::id::{
    CheckoutId, CheckoutLineId, OrderId, OrderLineId, ProductId, UserId, VariantId,
};
use storefront_domain::money::{Money, MoneyError};

/// Authenticated caller, taken from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
}

/// Row to insert on registration. `email` is already normalized.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub price: Money,
}

/// Product listing filter. `search` is matched as a literal substring.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub id: CheckoutLineId,
    pub variant: Variant,
    pub quantity: u32,
}

impl CheckoutLine {
    pub fn total(&self) -> Result<Money, MoneyError> {
        self.variant.price.times(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub id: CheckoutId,
    /// `None` for anonymous checkouts.
    pub user_id: Option<UserId>,
    pub email: String,
    pub channel: String,
    pub currency: String,
    /// In insertion order.
    pub lines: Vec<CheckoutLine>,
}

impl Checkout {
    /// Anonymous checkouts are visible to anyone holding the id; owned ones only to the owner.
    pub fn is_visible_to(&self, viewer: Option<&Viewer>) -> bool {
        match self.user_id {
            None => true,
            Some(owner) => viewer.is_some_and(|v| v.user_id == owner),
        }
    }

    pub fn quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> Result<Money, MoneyError> {
        self.lines
            .iter()
            .try_fold(Money::zero(self.currency.clone()), |acc, line| {
                acc.checked_add(&line.total()?)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Unfulfilled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unfulfilled => "UNFULFILLED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub variant_id: Option<VariantId>,
    pub product_name: String,
    pub variant_sku: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderLine {
    pub fn total(&self) -> Result<Money, MoneyError> {
        self.unit_price.times(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub user_email: String,
    pub status: OrderStatus,
    pub total: Money,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
}
