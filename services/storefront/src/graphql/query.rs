use async_graphql::{Context, ErrorExtensions, ID, Object, Result};

use crate::graphql::types::{
    Checkout, PageInfo, Product, ProductCountableConnection, ProductCountableEdge,
    ProductFilterInput, User,
};
use crate::graphql::{app_state, viewer};
use crate::usecase::account::GetUserUseCase;
use crate::usecase::catalog::{
    GetProductUseCase, ListProductsInput, ListProductsUseCase, encode_cursor,
};
use crate::usecase::checkout::GetCheckoutUseCase;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Products ordered by name. `first` is clamped to 1..=100.
    async fn products(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] first: i32,
        after: Option<String>,
        filter: Option<ProductFilterInput>,
    ) -> Result<ProductCountableConnection> {
        let state = app_state(ctx)?;
        let usecase = ListProductsUseCase {
            products: state.product_repo(),
        };
        let page = usecase
            .execute(ListProductsInput {
                first: Some(first),
                after,
                search: filter.and_then(|f| f.search),
            })
            .await
            .map_err(|e| e.extend())?;

        let page_info = PageInfo {
            has_next_page: page.has_next(),
            has_previous_page: page.has_previous(),
            start_cursor: (!page.items.is_empty()).then(|| encode_cursor(page.offset)),
            end_cursor: page
                .items
                .len()
                .checked_sub(1)
                .map(|last| encode_cursor(page.offset + last as u64)),
        };
        let total_count = i64::try_from(page.total).unwrap_or(i64::MAX);
        let offset = page.offset;
        let edges = page
            .items
            .into_iter()
            .enumerate()
            .map(|(i, product)| ProductCountableEdge {
                node: Product(product),
                cursor: encode_cursor(offset + i as u64),
            })
            .collect();

        Ok(ProductCountableConnection {
            edges,
            page_info,
            total_count,
        })
    }

    /// Look up one product by `id` or `slug`.
    async fn product(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        slug: Option<String>,
    ) -> Result<Option<Product>> {
        let state = app_state(ctx)?;
        let usecase = GetProductUseCase {
            products: state.product_repo(),
        };
        let product = usecase
            .execute(id.as_ref().map(|id| id.as_str()), slug.as_deref())
            .await
            .map_err(|e| e.extend())?;
        Ok(product.map(Product))
    }

    /// A checkout the caller may see: anonymous ones, or the caller's own.
    async fn checkout(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Checkout>> {
        let state = app_state(ctx)?;
        let usecase = GetCheckoutUseCase {
            checkouts: state.checkout_repo(),
        };
        let checkout = usecase
            .execute(viewer(ctx), &id)
            .await
            .map_err(|e| e.extend())?;
        Ok(checkout.map(Checkout))
    }

    /// The logged-in user, or null.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(viewer) = viewer(ctx) else {
            return Ok(None);
        };
        let state = app_state(ctx)?;
        let usecase = GetUserUseCase {
            users: state.user_repo(),
        };
        let user = usecase
            .execute(viewer.user_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(user.map(User))
    }
}
