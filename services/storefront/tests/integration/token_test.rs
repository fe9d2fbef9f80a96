use serde_json::json;

use storefront::error::StorefrontError;
use storefront::usecase::token::{CreateTokenUseCase, VerifyTokenUseCase};
use storefront_auth_types::password::hash_password;
use storefront_auth_types::token::{TokenType, validate_access_token, validate_token};
use storefront_testing::TestScope;
use storefront_testing::auth::{TEST_JWT_SECRET, forged_token, refresh_token};
use storefront_testing::fixture::{FixtureError, TEST_USER_EMAIL, TEST_USER_PASSWORD};

use crate::helpers::{MockUserRepo, client, test_user};

const PASSWORD: &str = "testpass123";

fn repo_with_user() -> (MockUserRepo, storefront::domain::types::User) {
    let user = test_user();
    let hash = hash_password(PASSWORD).unwrap();
    (MockUserRepo::new(vec![(user.clone(), hash)]), user)
}

fn create_usecase(users: MockUserRepo) -> CreateTokenUseCase<MockUserRepo> {
    CreateTokenUseCase {
        users,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        access_token_ttl_secs: 300,
    }
}

// ── CreateTokenUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_token_pair_for_valid_credentials() {
    let (users, user) = repo_with_user();

    let output = create_usecase(users)
        .execute("  TEST@example.com ", PASSWORD)
        .await
        .unwrap();

    assert_eq!(output.user, user);
    let info = validate_access_token(&output.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id.0);
    assert_eq!(info.exp, output.access_token_exp);

    let refresh = validate_token(&output.refresh_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(refresh.typ, TokenType::Refresh);
    assert!(refresh.exp > output.access_token_exp);
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let (users, _) = repo_with_user();

    let result = create_usecase(users).execute(TEST_USER_EMAIL, "wrongpass").await;
    assert!(
        matches!(result, Err(StorefrontError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_email_the_same_way() {
    let result = create_usecase(MockUserRepo::empty())
        .execute("nobody@example.com", PASSWORD)
        .await;
    assert!(
        matches!(result, Err(StorefrontError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_inactive_user() {
    let mut user = test_user();
    user.is_active = false;
    let users = MockUserRepo::new(vec![(user, hash_password(PASSWORD).unwrap())]);

    let result = create_usecase(users).execute(TEST_USER_EMAIL, PASSWORD).await;
    assert!(
        matches!(result, Err(StorefrontError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

// ── VerifyTokenUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_issued_access_token() {
    let (users, user) = repo_with_user();
    let output = create_usecase(users.clone())
        .execute(TEST_USER_EMAIL, PASSWORD)
        .await
        .unwrap();

    let usecase = VerifyTokenUseCase {
        users,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    assert_eq!(usecase.execute(&output.access_token).await.unwrap(), user);
}

#[tokio::test]
async fn should_reject_garbage_and_refresh_tokens() {
    let (users, _) = repo_with_user();
    let output = create_usecase(users.clone())
        .execute(TEST_USER_EMAIL, PASSWORD)
        .await
        .unwrap();

    let usecase = VerifyTokenUseCase {
        users,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    for token in ["not-a-jwt", output.refresh_token.as_str()] {
        let result = usecase.execute(token).await;
        assert!(
            matches!(result, Err(StorefrontError::JwtInvalid)),
            "expected JwtInvalid, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_token_for_deleted_user() {
    let (users, _) = repo_with_user();
    let output = create_usecase(users)
        .execute(TEST_USER_EMAIL, PASSWORD)
        .await
        .unwrap();

    let usecase = VerifyTokenUseCase {
        users: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = usecase.execute(&output.access_token).await;
    assert!(
        matches!(result, Err(StorefrontError::JwtInvalid)),
        "expected JwtInvalid, got {result:?}"
    );
}

// ── GraphQL ──────────────────────────────────────────────────────────────────

const TOKEN_CREATE: &str = r#"
mutation Login($email: String!, $password: String!) {
  tokenCreate(email: $email, password: $password) {
    token
    refreshToken
    user { id email }
    errors { field code message }
  }
}"#;

const TOKEN_VERIFY: &str = r#"
mutation Verify($token: String!) {
  tokenVerify(token: $token) {
    isValid
    user { id email }
    errors { field code }
  }
}"#;

#[tokio::test]
async fn should_log_in_and_use_token_for_me() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let user = scope.fixtures().user().await?;
    let mut client = client(&scope);

    let login = client
        .query_with(
            TOKEN_CREATE,
            json!({ "email": TEST_USER_EMAIL, "password": TEST_USER_PASSWORD }),
        )
        .await;
    login
        .assert_payload_ok("tokenCreate")
        .assert_equals("data.tokenCreate.user.id", json!(user.id.to_string()));
    let token = login
        .at("data.tokenCreate.token")
        .as_str()
        .expect("token missing")
        .to_owned();
    assert!(login.at("data.tokenCreate.refreshToken").is_string());

    client.set_token(token);
    client
        .query("{ me { id email } }")
        .await
        .assert_no_errors()
        .assert_equals("data.me.email", json!(TEST_USER_EMAIL));
    Ok(())
}

#[tokio::test]
async fn should_report_wrong_password_in_payload() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    scope.fixtures().user().await?;
    let client = client(&scope);

    let env = client
        .query_with(
            TOKEN_CREATE,
            json!({ "email": TEST_USER_EMAIL, "password": "wrongpass" }),
        )
        .await;
    env.assert_payload_rejected("tokenCreate", "email", "INVALID_CREDENTIALS")
        .assert_null("data.tokenCreate.token")
        .assert_null("data.tokenCreate.user");
    Ok(())
}

#[tokio::test]
async fn should_verify_tokens_over_graphql() -> Result<(), FixtureError> {
    let scope = TestScope::begin().await?;
    let user = scope.fixtures().user().await?;
    let client = client(&scope);

    let token = storefront_testing::auth::force_login_token(&user)?;
    client
        .query_with(TOKEN_VERIFY, json!({ "token": token }))
        .await
        .assert_payload_ok("tokenVerify")
        .assert_equals("data.tokenVerify.isValid", json!(true))
        .assert_equals("data.tokenVerify.user.email", json!(TEST_USER_EMAIL));

    for bad in [forged_token(&user)?, refresh_token(&user)?] {
        client
            .query_with(TOKEN_VERIFY, json!({ "token": bad }))
            .await
            .assert_payload_rejected("tokenVerify", "token", "JWT_INVALID_TOKEN")
            .assert_equals("data.tokenVerify.isValid", json!(false))
            .assert_null("data.tokenVerify.user");
    }
    Ok(())
}
