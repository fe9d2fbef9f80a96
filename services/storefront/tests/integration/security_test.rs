use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, PaginatorTrait, Set};
use serde_json::json;

use storefront_schema::users;
use storefront_testing::TestScope;
use storefront_testing::auth::{forged_token, refresh_token};
use storefront_testing::fixture::FixtureError;

use crate::helpers::client;

const ADVERSARIAL: &[&str] = &[
    "'; DROP TABLE users; --",
    "\" OR \"1\"=\"1",
    "<script>alert('xss')</script>",
    "%' UNION SELECT password_hash FROM users --",
    "__proto__",
    "\\",
];

// ── Bearer tokens ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_present_but_invalid_tokens() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let user = scope.fixtures().user().await?;
    let mut client = client(&scope);

    for token in [
        "garbage".to_owned(),
        forged_token(&user)?,
        refresh_token(&user)?,
    ] {
        client.set_token(token);
        client
            .query("{ me { id } }")
            .await
            .assert_error_code("INVALID_TOKEN")
            .assert_null("data");
    }
    Ok(())
}

#[tokio::test]
async fn should_reject_token_of_deleted_user() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let user = scope.fixtures().user().await?;
    let product = scope.fixtures().product().await?;
    let variant = scope.fixtures().product_variant(&product).await?;
    let mut client = client(&scope);
    client.force_login(&user)?;

    users::Entity::delete_by_id(user.id)
        .exec(scope.db())
        .await
        .map_err(|e| FixtureError::Server(e.to_string()))?;

    client
        .query_with(
            "mutation($input: CheckoutCreateInput!) { checkoutCreate(input: $input) { checkout { id } } }",
            json!({ "input": { "lines": [{ "variantId": variant.id.to_string(), "quantity": 1 }] } }),
        )
        .await
        .assert_error_code("INVALID_TOKEN")
        .assert_null("data");
    Ok(())
}

#[tokio::test]
async fn should_reject_token_of_deactivated_user() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let user = scope.fixtures().user().await?;
    let mut client = client(&scope);
    client.force_login(&user)?;

    let mut inactive = user.into_active_model();
    inactive.is_active = Set(false);
    inactive
        .update(scope.db())
        .await
        .map_err(|e| FixtureError::Server(e.to_string()))?;

    client
        .query("{ me { id } }")
        .await
        .assert_error_code("INVALID_TOKEN")
        .assert_null("data");
    Ok(())
}

#[tokio::test]
async fn should_serve_anonymous_requests_without_token() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let client = client(&scope);

    client
        .query("{ me { id } products(first: 1) { totalCount } }")
        .await
        .assert_no_errors()
        .assert_null("data.me")
        .assert_equals("data.products.totalCount", json!(0));
    Ok(())
}

// ── Untrusted input ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_treat_search_input_as_literal_text() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    scope.fixtures().user().await?;
    scope.fixtures().product().await?;
    let client = client(&scope);

    for needle in ADVERSARIAL {
        client
            .query_with(
                "query($s: String) { products(filter: { search: $s }) { totalCount edges { node { name } } } }",
                json!({ "s": needle }),
            )
            .await
            .assert_well_formed()
            .assert_no_errors()
            .assert_equals("data.products.totalCount", json!(0))
            .assert_not_echoed(needle);

        client
            .query_with(
                "query($s: String) { product(slug: $s) { id } }",
                json!({ "s": needle }),
            )
            .await
            .assert_no_errors()
            .assert_null("data.product");
    }

    let users = users::Entity::find()
        .count(scope.db())
        .await
        .map_err(|e| FixtureError::Server(e.to_string()))?;
    assert_eq!(users, 1);
    Ok(())
}

#[tokio::test]
async fn should_not_reflect_rejected_input_in_payload_errors() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let client = client(&scope);

    for needle in ADVERSARIAL {
        client
            .query_with(
                r#"mutation($input: AccountRegisterInput!) {
                     accountRegister(input: $input) { user { id } errors { field code message } }
                   }"#,
                json!({ "input": { "email": needle, "password": "password123" } }),
            )
            .await
            .assert_payload_rejected("accountRegister", "email", "INVALID")
            .assert_not_echoed(needle);

        client
            .query_with(
                r#"mutation($id: ID!) {
                     checkoutComplete(checkoutId: $id) { order { id } errors { field code message } }
                   }"#,
                json!({ "id": needle }),
            )
            .await
            .assert_payload_rejected("checkoutComplete", "checkoutId", "NOT_FOUND")
            .assert_not_echoed(needle);
    }
    Ok(())
}

// ── Query limits ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_overly_deep_queries() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let client = client(&scope);

    let mut selection = String::from("id");
    for _ in 0..6 {
        selection = format!("variants {{ product {{ {selection} }} }}");
    }
    let query = format!("{{ products(first: 1) {{ edges {{ node {{ {selection} }} }} }} }}");
    client
        .query(&query)
        .await
        .assert_transport_ok()
        .assert_has_errors()
        .assert_null("data");
    Ok(())
}
