use serde_json::json;

use storefront::error::StorefrontError;
use storefront::usecase::catalog::{
    GetProductUseCase, ListProductsInput, ListProductsUseCase, ListVariantsUseCase, encode_cursor,
};
use storefront_testing::TestScope;
use storefront_testing::fixture::{FixtureError, TEST_PRODUCT_SLUG, TEST_VARIANT_SKU};

use crate::helpers::{MockProductRepo, client, test_product, test_variant};

fn products(names: &[&str]) -> MockProductRepo {
    let items = names
        .iter()
        .map(|name| {
            let mut p = test_product();
            p.id = storefront_domain::id::ProductId::generate();
            p.name = (*name).to_owned();
            p.slug = name.to_lowercase();
            p
        })
        .collect();
    MockProductRepo::new(items, vec![])
}

// ── ListProductsUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_resume_after_cursor() {
    let usecase = ListProductsUseCase {
        products: products(&["A", "B", "C"]),
    };

    let page = usecase
        .execute(ListProductsInput {
            first: Some(1),
            after: Some(encode_cursor(0)),
            search: None,
        })
        .await
        .unwrap();

    assert_eq!(page.offset, 1);
    assert_eq!(page.total, 3);
    assert_eq!(page.items[0].name, "B");
    assert!(page.has_next());
    assert!(page.has_previous());
}

#[tokio::test]
async fn should_ignore_blank_search() {
    let usecase = ListProductsUseCase {
        products: products(&["Shirt", "Hat"]),
    };

    let page = usecase
        .execute(ListProductsInput {
            first: None,
            after: None,
            search: Some("   ".to_owned()),
        })
        .await
        .unwrap();
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn should_reject_foreign_cursor() {
    let usecase = ListProductsUseCase {
        products: products(&["A"]),
    };

    let result = usecase
        .execute(ListProductsInput {
            first: None,
            after: Some("bm90LWEtY3Vyc29y".to_owned()),
            search: None,
        })
        .await;
    assert!(
        matches!(result, Err(StorefrontError::InvalidCursor)),
        "expected InvalidCursor, got {result:?}"
    );
}

// ── GetProductUseCase / ListVariantsUseCase ──────────────────────────────────

#[tokio::test]
async fn should_look_up_product_by_id_or_slug() {
    let product = test_product();
    let usecase = GetProductUseCase {
        products: MockProductRepo::new(vec![product.clone()], vec![]),
    };

    let by_id = usecase
        .execute(Some(&product.id.to_string()), None)
        .await
        .unwrap();
    assert_eq!(by_id, Some(product.clone()));

    let by_slug = usecase.execute(None, Some("test-product")).await.unwrap();
    assert_eq!(by_slug, Some(product));

    assert_eq!(usecase.execute(Some("nope"), None).await.unwrap(), None);

    let result = usecase.execute(None, None).await;
    assert!(
        matches!(result, Err(StorefrontError::LookupArgumentRequired)),
        "expected LookupArgumentRequired, got {result:?}"
    );
}

#[tokio::test]
async fn should_list_only_variants_of_product() {
    let product = test_product();
    let other = test_product();
    let mine = test_variant(&product, "SKU-A", 100);
    let theirs = test_variant(&other, "SKU-B", 100);
    let usecase = ListVariantsUseCase {
        products: MockProductRepo::new(vec![product.clone(), other], vec![mine.clone(), theirs]),
    };

    assert_eq!(usecase.execute(product.id).await.unwrap(), vec![mine]);
}

// ── GraphQL ──────────────────────────────────────────────────────────────────

const PRODUCTS: &str = r#"
query Products($first: Int! = 10, $after: String, $search: String) {
  products(first: $first, after: $after, filter: { search: $search }) {
    totalCount
    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
    edges { cursor node { id name slug } }
  }
}"#;

#[tokio::test]
async fn should_return_same_product_by_id() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let product = scope.fixtures().product().await?;
    let variant = scope.fixtures().product_variant(&product).await?;
    let client = client(&scope);

    let env = client
        .query_with(
            r#"query($id: ID!) {
                 product(id: $id) {
                   id name slug
                   variants { id sku pricing { price { gross { amount currency } } } }
                   pricing { priceRange { start { gross { amount } } } }
                 }
               }"#,
            json!({ "id": product.id.to_string() }),
        )
        .await;
    env.assert_no_errors()
        .assert_equals("data.product.id", json!(product.id.to_string()))
        .assert_equals("data.product.slug", json!(TEST_PRODUCT_SLUG))
        .assert_equals("data.product.variants.0.id", json!(variant.id.to_string()))
        .assert_equals("data.product.variants.0.sku", json!(TEST_VARIANT_SKU))
        .assert_equals(
            "data.product.variants.0.pricing.price.gross",
            json!({ "amount": 99.99, "currency": "USD" }),
        )
        .assert_equals("data.product.pricing.priceRange.start.gross.amount", json!(99.99));
    Ok(())
}

#[tokio::test]
async fn should_find_product_by_slug_and_null_for_unknown() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let product = scope.fixtures().product().await?;
    let client = client(&scope);

    client
        .query(r#"{ product(slug: "test-product") { id } }"#)
        .await
        .assert_no_errors()
        .assert_equals("data.product.id", json!(product.id.to_string()));
    client
        .query(r#"{ product(slug: "missing") { id } }"#)
        .await
        .assert_no_errors()
        .assert_null("data.product");
    client
        .query("{ product { id } }")
        .await
        .assert_error_code("GRAPHQL_ERROR");
    Ok(())
}

#[tokio::test]
async fn should_page_through_products_with_cursors() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    for name in ["Alpha", "Bravo", "Charlie"] {
        scope.fixtures().product_named(name).await?;
    }
    let client = client(&scope);

    let first = client
        .query_with(PRODUCTS, json!({ "first": 2 }))
        .await;
    first
        .assert_no_errors()
        .assert_equals("data.products.totalCount", json!(3))
        .assert_equals("data.products.edges.0.node.name", json!("Alpha"))
        .assert_equals("data.products.edges.1.node.name", json!("Bravo"))
        .assert_equals("data.products.pageInfo.hasNextPage", json!(true))
        .assert_equals("data.products.pageInfo.hasPreviousPage", json!(false));
    let end = first.at("data.products.pageInfo.endCursor").clone();
    assert_eq!(end, *first.at("data.products.edges.1.cursor"));

    let second = client
        .query_with(PRODUCTS, json!({ "first": 2, "after": end }))
        .await;
    second
        .assert_no_errors()
        .assert_equals("data.products.edges.0.node.name", json!("Charlie"))
        .assert_equals("data.products.pageInfo.hasNextPage", json!(false))
        .assert_equals("data.products.pageInfo.hasPreviousPage", json!(true));
    assert_eq!(
        second.at("data.products.edges").as_array().map(Vec::len),
        Some(1)
    );
    Ok(())
}

#[tokio::test]
async fn should_filter_products_by_search() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    scope.fixtures().product_named("Blue Shirt").await?;
    scope.fixtures().product_named("Red Hat").await?;
    let client = client(&scope);

    client
        .query_with(PRODUCTS, json!({ "search": "SHIRT" }))
        .await
        .assert_no_errors()
        .assert_equals("data.products.totalCount", json!(1))
        .assert_equals("data.products.edges.0.node.slug", json!("blue-shirt"));
    client
        .query_with(PRODUCTS, json!({ "search": "%" }))
        .await
        .assert_no_errors()
        .assert_equals("data.products.totalCount", json!(0));
    Ok(())
}

#[tokio::test]
async fn should_reject_invalid_cursor() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let client = client(&scope);

    client
        .query_with(PRODUCTS, json!({ "after": "garbage" }))
        .await
        .assert_error_code("INVALID_CURSOR");
    Ok(())
}

#[tokio::test]
async fn should_reject_cursor_past_offset_range() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    scope.fixtures().product().await?;
    let client = client(&scope);

    for offset in [u64::MAX, i64::MAX as u64] {
        client
            .query_with(PRODUCTS, json!({ "first": 1, "after": encode_cursor(offset) }))
            .await
            .assert_error_code("INVALID_CURSOR");
    }
    Ok(())
}
