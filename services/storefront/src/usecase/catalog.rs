use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use storefront_domain::id::ProductId;
use storefront_domain::pagination::{Page, PageRequest};

use crate::domain::repository::ProductRepository;
use crate::domain::types::{Product, ProductFilter, Variant};
use crate::error::StorefrontError;

const CURSOR_PREFIX: &str = "cursor:";

/// Opaque cursor pointing at the item at `offset` in a listing.
pub fn encode_cursor(offset: u64) -> String {
    STANDARD.encode(format!("{CURSOR_PREFIX}{offset}"))
}

/// Offsets must stay below `i64::MAX` so the next offset still fits a SQL `OFFSET`.
pub fn decode_cursor(cursor: &str) -> Result<u64, StorefrontError> {
    let bytes = STANDARD
        .decode(cursor.trim())
        .map_err(|_| StorefrontError::InvalidCursor)?;
    String::from_utf8(bytes)
        .ok()
        .as_deref()
        .and_then(|s| s.strip_prefix(CURSOR_PREFIX))
        .and_then(|n| n.parse::<u64>().ok())
        .filter(|&offset| offset < i64::MAX as u64)
        .ok_or(StorefrontError::InvalidCursor)
}

// ── ListProducts ─────────────────────────────────────────────────────────────

pub struct ListProductsInput {
    pub first: Option<i32>,
    pub after: Option<String>,
    pub search: Option<String>,
}

pub struct ListProductsUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> ListProductsUseCase<P> {
    pub async fn execute(&self, input: ListProductsInput) -> Result<Page<Product>, StorefrontError> {
        let offset = match input.after.as_deref() {
            Some(cursor) => decode_cursor(cursor)?
                .checked_add(1)
                .ok_or(StorefrontError::InvalidCursor)?,
            None => 0,
        };
        let filter = ProductFilter {
            search: input
                .search
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
        };
        self.products
            .list(&filter, PageRequest::new(input.first, offset))
            .await
    }
}

// ── GetProduct ───────────────────────────────────────────────────────────────

pub struct GetProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> GetProductUseCase<P> {
    /// Look a product up by id, or by slug when no id is given.
    ///
    /// A malformed id finds nothing rather than failing the query.
    pub async fn execute(
        &self,
        id: Option<&str>,
        slug: Option<&str>,
    ) -> Result<Option<Product>, StorefrontError> {
        match (id, slug) {
            (Some(id), _) => match id.parse::<ProductId>() {
                Ok(id) => self.products.find_by_id(id).await,
                Err(_) => Ok(None),
            },
            (None, Some(slug)) => self.products.find_by_slug(slug.trim()).await,
            (None, None) => Err(StorefrontError::LookupArgumentRequired),
        }
    }

    pub async fn by_id(&self, id: ProductId) -> Result<Option<Product>, StorefrontError> {
        self.products.find_by_id(id).await
    }
}

// ── ListVariants ─────────────────────────────────────────────────────────────

pub struct ListVariantsUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> ListVariantsUseCase<P> {
    pub async fn execute(&self, product_id: ProductId) -> Result<Vec<Variant>, StorefrontError> {
        self.products.variants_of(product_id).await
    }
}
