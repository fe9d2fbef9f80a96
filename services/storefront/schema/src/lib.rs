//! sea-orm entities for the storefront database.

pub mod checkout_lines;
pub mod checkouts;
pub mod order_lines;
pub mod orders;
pub mod product_variants;
pub mod products;
pub mod users;
