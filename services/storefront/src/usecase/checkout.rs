use anyhow::Context as _;
use chrono::Utc;
use tracing::info;

use storefront_domain::account::{normalize_email, validate_email};
use storefront_domain::catalog::{QuantityCheck, check_quantity};
use storefront_domain::id::{CheckoutId, CheckoutLineId, OrderId, OrderLineId, VariantId};

use crate::domain::repository::{CheckoutRepository, ProductRepository};
use crate::domain::types::{
    Checkout, CheckoutLine, Order, OrderLine, OrderStatus, Variant, Viewer,
};
use crate::error::StorefrontError;

/// Store-wide checkout rules, taken from configuration.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub channel: String,
    pub currency: String,
    pub max_line_quantity: u32,
}

/// One requested line, as received from the client.
#[derive(Debug, Clone)]
pub struct LineInput {
    pub variant_id: String,
    pub quantity: i32,
}

fn checked_quantity(quantity: i32, max: u32) -> Result<u32, StorefrontError> {
    match check_quantity(quantity, max) {
        QuantityCheck::Ok(q) => Ok(q),
        QuantityCheck::Zero => Err(StorefrontError::ZeroQuantity),
        QuantityCheck::TooHigh => Err(StorefrontError::QuantityGreaterThanLimit { max }),
    }
}

/// Raise a line quantity, holding the result to `max`.
fn add_quantity(current: u32, added: u32, max: u32) -> Result<u32, StorefrontError> {
    current
        .checked_add(added)
        .filter(|&total| total <= max)
        .ok_or(StorefrontError::QuantityGreaterThanLimit { max })
}

/// Validate requested lines and load their variants.
///
/// Quantities are checked for every line before any variant is looked up, and
/// unknown variants are reported before the merged quantity limit.
/// Repeated variants are merged into one entry, first occurrence wins the position.
async fn resolve_lines<P: ProductRepository>(
    products: &P,
    lines: &[LineInput],
    max: u32,
) -> Result<Vec<(Variant, u32)>, StorefrontError> {
    let quantities = lines
        .iter()
        .map(|l| checked_quantity(l.quantity, max))
        .collect::<Result<Vec<_>, _>>()?;

    let mut requested: Vec<(VariantId, u32)> = Vec::with_capacity(lines.len());
    for (line, quantity) in lines.iter().zip(quantities) {
        let variant_id = line
            .variant_id
            .parse::<VariantId>()
            .map_err(|_| StorefrontError::VariantNotFound)?;
        requested.push((variant_id, quantity));
    }

    let ids: Vec<VariantId> = requested.iter().map(|(id, _)| *id).collect();
    let found = products.find_variants(&ids).await?;
    if requested
        .iter()
        .any(|(id, _)| !found.iter().any(|v| v.id == *id))
    {
        return Err(StorefrontError::VariantNotFound);
    }

    let mut merged: Vec<(Variant, u32)> = Vec::with_capacity(requested.len());
    for (id, quantity) in requested {
        match merged.iter_mut().find(|(v, _)| v.id == id) {
            Some((_, total)) => *total = add_quantity(*total, quantity, max)?,
            None => {
                if let Some(variant) = found.iter().find(|v| v.id == id) {
                    merged.push((variant.clone(), quantity));
                }
            }
        }
    }
    Ok(merged)
}

/// Find a checkout the viewer may act on. Invisible checkouts look missing.
async fn visible_checkout<C: CheckoutRepository>(
    checkouts: &C,
    viewer: Option<&Viewer>,
    id: &str,
) -> Result<Checkout, StorefrontError> {
    let id = id
        .parse::<CheckoutId>()
        .map_err(|_| StorefrontError::CheckoutNotFound)?;
    checkouts
        .find(id)
        .await?
        .filter(|c| c.is_visible_to(viewer))
        .ok_or(StorefrontError::CheckoutNotFound)
}

// ── CreateCheckout ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CreateCheckoutInput {
    pub lines: Vec<LineInput>,
    pub email: Option<String>,
    /// Defaults to the configured channel.
    pub channel: Option<String>,
}

pub struct CreateCheckoutUseCase<P: ProductRepository, C: CheckoutRepository> {
    pub products: P,
    pub checkouts: C,
    pub settings: CheckoutSettings,
}

impl<P: ProductRepository, C: CheckoutRepository> CreateCheckoutUseCase<P, C> {
    pub async fn execute(
        &self,
        viewer: Option<&Viewer>,
        input: CreateCheckoutInput,
    ) -> Result<Checkout, StorefrontError> {
        if let Some(channel) = input.channel.as_deref() {
            if channel != self.settings.channel {
                return Err(StorefrontError::ChannelNotFound);
            }
        }

        let lines = resolve_lines(
            &self.products,
            &input.lines,
            self.settings.max_line_quantity,
        )
        .await?;

        let email = input
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .or(viewer.map(|v| v.email.as_str()))
            .ok_or(StorefrontError::EmailRequired)?;
        if !validate_email(email) {
            return Err(StorefrontError::InvalidEmail);
        }

        let checkout = Checkout {
            id: CheckoutId::generate(),
            user_id: viewer.map(|v| v.user_id),
            email: normalize_email(email),
            channel: self.settings.channel.clone(),
            currency: self.settings.currency.clone(),
            lines: lines
                .into_iter()
                .map(|(variant, quantity)| CheckoutLine {
                    id: CheckoutLineId::generate(),
                    variant,
                    quantity,
                })
                .collect(),
        };
        self.checkouts.create(&checkout).await?;

        info!(
            checkout_id = %checkout.id,
            lines = checkout.lines.len(),
            authenticated = viewer.is_some(),
            "checkout created"
        );
        Ok(checkout)
    }
}

// ── AddCheckoutLines ─────────────────────────────────────────────────────────

pub struct AddCheckoutLinesUseCase<P: ProductRepository, C: CheckoutRepository> {
    pub products: P,
    pub checkouts: C,
    pub settings: CheckoutSettings,
}

impl<P: ProductRepository, C: CheckoutRepository> AddCheckoutLinesUseCase<P, C> {
    /// Add lines to a checkout. A variant already in the checkout has its quantity raised,
    /// and the raised quantity is held to the same per-line limit.
    pub async fn execute(
        &self,
        viewer: Option<&Viewer>,
        checkout_id: &str,
        lines: &[LineInput],
    ) -> Result<Checkout, StorefrontError> {
        let mut checkout = visible_checkout(&self.checkouts, viewer, checkout_id).await?;
        let max = self.settings.max_line_quantity;

        for (variant, quantity) in resolve_lines(&self.products, lines, max).await? {
            match checkout.lines.iter_mut().find(|l| l.variant.id == variant.id) {
                Some(line) => line.quantity = add_quantity(line.quantity, quantity, max)?,
                None => checkout.lines.push(CheckoutLine {
                    id: CheckoutLineId::generate(),
                    variant,
                    quantity,
                }),
            }
        }
        self.checkouts.save_lines(&checkout).await?;

        info!(checkout_id = %checkout.id, lines = checkout.lines.len(), "checkout lines added");
        Ok(checkout)
    }
}

// ── GetCheckout ──────────────────────────────────────────────────────────────

pub struct GetCheckoutUseCase<C: CheckoutRepository> {
    pub checkouts: C,
}

impl<C: CheckoutRepository> GetCheckoutUseCase<C> {
    pub async fn execute(
        &self,
        viewer: Option<&Viewer>,
        id: &str,
    ) -> Result<Option<Checkout>, StorefrontError> {
        match visible_checkout(&self.checkouts, viewer, id).await {
            Ok(checkout) => Ok(Some(checkout)),
            Err(StorefrontError::CheckoutNotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ── CompleteCheckout ─────────────────────────────────────────────────────────

pub struct CompleteCheckoutUseCase<P: ProductRepository, C: CheckoutRepository> {
    pub products: P,
    pub checkouts: C,
}

impl<P: ProductRepository, C: CheckoutRepository> CompleteCheckoutUseCase<P, C> {
    /// Turn a checkout into an unfulfilled order and delete the checkout.
    pub async fn execute(
        &self,
        viewer: Option<&Viewer>,
        checkout_id: &str,
    ) -> Result<Order, StorefrontError> {
        let checkout = visible_checkout(&self.checkouts, viewer, checkout_id).await?;
        if checkout.lines.is_empty() {
            return Err(StorefrontError::NoLines);
        }

        let total = checkout.subtotal().context("sum checkout lines")?;

        let mut lines = Vec::with_capacity(checkout.lines.len());
        for line in &checkout.lines {
            let product_name = self
                .products
                .find_by_id(line.variant.product_id)
                .await?
                .map(|p| p.name)
                .unwrap_or_default();
            lines.push(OrderLine {
                id: OrderLineId::generate(),
                variant_id: Some(line.variant.id),
                product_name,
                variant_sku: line.variant.sku.clone(),
                quantity: line.quantity,
                unit_price: line.variant.price.clone(),
            });
        }

        let order = Order {
            id: OrderId::generate(),
            user_id: checkout.user_id,
            user_email: checkout.email.clone(),
            status: OrderStatus::Unfulfilled,
            total,
            lines,
            created_at: Utc::now(),
        };
        self.checkouts.place_order(checkout.id, &order).await?;

        info!(
            order_id = %order.id,
            checkout_id = %checkout.id,
            total = %order.total,
            "checkout completed"
        );
        Ok(order)
    }
}
