//! In-process storefront for `--embedded` runs (requires `--features embedded`).

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use storefront::router::build_router;
use storefront::state::AppState;
use storefront::usecase::checkout::CheckoutSettings;
use storefront_auth_types::token::DEFAULT_ACCESS_TOKEN_TTL_SECS;
use storefront_domain::catalog::DEFAULT_MAX_LINE_QUANTITY;
use storefront_testing::TestScope;
use storefront_testing::auth::{TEST_JWT_SECRET, force_login_token};
use storefront_testing::fixture::{TEST_CHANNEL, TEST_CURRENCY};

use crate::vars::Vars;

/// A running service plus the seeded fixture graph it serves.
///
/// Dropping it stops the server and discards the database.
pub struct EmbeddedService {
    pub base_url: String,
    pub vars: Vars,
    pub token: String,
    server: JoinHandle<()>,
    _scope: TestScope,
}

impl Drop for EmbeddedService {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Seed a fresh database with the standard checkout graph and serve it on an
/// OS-assigned port.
pub async fn start() -> Result<EmbeddedService> {
    // ── DB + fixtures ──────────────────────────────────────────────────────
    let scope = TestScope::begin().await.context("open test scope")?;
    let graph = scope
        .fixtures()
        .checkout_graph()
        .await
        .context("seed fixture graph")?;
    let token = force_login_token(&graph.user).context("mint force-login token")?;

    // ── Start storefront on a random OS-assigned port ──────────────────────
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let base_url = format!("http://127.0.0.1:{port}");

    let state = AppState {
        db: scope.db().clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        access_token_ttl_secs: DEFAULT_ACCESS_TOKEN_TTL_SECS,
        checkout: CheckoutSettings {
            channel: TEST_CHANNEL.to_owned(),
            currency: TEST_CURRENCY.to_owned(),
            max_line_quantity: DEFAULT_MAX_LINE_QUANTITY,
        },
    };
    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, build_router(state)).await {
            tracing::error!(error = %e, "embedded storefront stopped");
        }
    });
    tracing::info!(%base_url, "embedded storefront listening");

    let mut vars = Vars::new();
    vars.insert("user.id", graph.user.id.to_string());
    vars.insert("user.email", graph.user.email.clone());
    vars.insert("product.id", graph.product.id.to_string());
    vars.insert("product.slug", graph.product.slug.clone());
    vars.insert("variant.id", graph.variant.id.to_string());
    vars.insert("checkout.id", graph.checkout.checkout.id.to_string());

    Ok(EmbeddedService {
        base_url,
        vars,
        token,
        server,
        _scope: scope,
    })
}
