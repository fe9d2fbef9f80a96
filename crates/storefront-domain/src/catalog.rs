//! Catalog rules: slugs, SKUs and checkout line quantities.

/// Default cap on a single checkout line's quantity.
pub const DEFAULT_MAX_LINE_QUANTITY: u32 = 50;

/// Largest line quantity the `INTEGER` quantity columns can hold.
pub const LINE_QUANTITY_CEILING: u32 = i32::MAX as u32;

/// `true` for URL-safe slugs: lower-case ASCII alphanumerics separated by single hyphens.
pub fn validate_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|part| {
            !part.is_empty()
                && part
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// Derive a slug from a display name ("Test Product" → "test-product").
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Outcome of checking a requested line quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityCheck {
    Ok(u32),
    Zero,
    TooHigh,
}

pub fn check_quantity(quantity: i32, max: u32) -> QuantityCheck {
    if quantity < 1 {
        QuantityCheck::Zero
    } else if quantity as u32 > max {
        QuantityCheck::TooHigh
    } else {
        QuantityCheck::Ok(quantity as u32)
    }
}
