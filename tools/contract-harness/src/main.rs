//! Contract harness: runs GraphQL golden assertions against a storefront.
//!
//! # Usage
//!
//! ```bash
//! # Run all contracts against a deployment
//! cargo run -p contract-harness -- --base-url http://localhost:8000 \
//!     --var product.id=... --token "$ACCESS_TOKEN"
//!
//! # Run only security probes
//! cargo run -p contract-harness -- --base-url http://localhost:8000 --area security
//!
//! # Start the service in-process against a seeded in-memory database
//! cargo run -p contract-harness --features embedded -- --embedded
//! ```
//!
//! Exits 0 when every contract passes or is skipped, exits 1 when any fail.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use storefront_auth_types::token::{DEFAULT_ACCESS_TOKEN_TTL_SECS, TokenType, issue_token};

use contract_harness::config::HarnessConfig;
use contract_harness::contract::{self, Contract};
use contract_harness::reporter::Reporter;
use contract_harness::runner::Runner;
use contract_harness::vars::Vars;

#[derive(Parser)]
#[command(about = "Run GraphQL contract assertions against a storefront")]
struct Args {
    /// Base URL of the storefront (e.g. http://localhost:8000)
    #[arg(long, required_unless_present = "embedded")]
    base_url: Option<String>,

    /// Start the storefront in-process (requires the `embedded` feature)
    #[arg(long)]
    embedded: bool,

    /// Run only contracts in this area: catalog, checkout, account, or security
    #[arg(long)]
    area: Option<String>,

    /// Placeholder value, `key=value`; repeatable
    #[arg(long = "var", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// Bearer token for contracts with `"auth": "user"`
    #[arg(long)]
    token: Option<String>,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    Vars::parse_assignment(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contract_harness=info,warn".into()),
        )
        .init();

    let args = Args::parse();
    let config = HarnessConfig::from_env();

    let contracts: Vec<Contract> = contract::load_all(&workspace_root(), args.area.as_deref())?;
    if contracts.is_empty() {
        eprintln!("No contracts found.");
        return Ok(());
    }

    let target = Target::resolve(&args, &config).await?;

    println!(
        "Running {} contract(s) against {}",
        contracts.len(),
        target.base_url
    );
    println!();

    let runner = Runner::new(
        &target.base_url,
        target.token.clone(),
        target.vars.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;
    let mut reporter = Reporter::new();

    for c in &contracts {
        let outcome = runner.run(c).await;
        reporter.record(c, outcome);
    }

    reporter.print_summary();
    drop(target);

    if reporter.all_passed() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

/// Where contracts are sent, and what they can refer to.
struct Target {
    base_url: String,
    vars: Vars,
    token: Option<String>,
    #[cfg(feature = "embedded")]
    _service: Option<contract_harness::embedded::EmbeddedService>,
}

impl Target {
    async fn resolve(args: &Args, config: &HarnessConfig) -> Result<Self> {
        let mut target = if args.embedded {
            Self::embedded().await?
        } else {
            let Some(base_url) = args.base_url.clone() else {
                bail!("--base-url is required unless --embedded is set");
            };
            Self {
                base_url,
                vars: Vars::new(),
                token: None,
                #[cfg(feature = "embedded")]
                _service: None,
            }
        };

        for (k, v) in &args.vars {
            target.vars.insert(k.clone(), v.clone());
        }
        if let Some(token) = &args.token {
            target.token = Some(token.clone());
        }
        if target.token.is_none() {
            target.token = mint_token(&target.vars, config)?;
        }
        Ok(target)
    }

    #[cfg(feature = "embedded")]
    async fn embedded() -> Result<Self> {
        let service = contract_harness::embedded::start().await?;
        Ok(Self {
            base_url: service.base_url.clone(),
            vars: service.vars.clone(),
            token: Some(service.token.clone()),
            _service: Some(service),
        })
    }

    #[cfg(not(feature = "embedded"))]
    async fn embedded() -> Result<Self> {
        bail!("--embedded requires building with `--features embedded`")
    }
}

/// Force login against a live deployment that shares `JWT_SECRET`.
fn mint_token(vars: &Vars, config: &HarnessConfig) -> Result<Option<String>> {
    let (Some(secret), Some(user_id), Some(email)) = (
        config.jwt_secret.as_deref(),
        vars.get("user.id"),
        vars.get("user.email"),
    ) else {
        return Ok(None);
    };
    let user_id = user_id.parse()?;
    let issued = issue_token(
        user_id,
        email,
        TokenType::Access,
        DEFAULT_ACCESS_TOKEN_TTL_SECS,
        secret,
    )?;
    Ok(Some(issued.token))
}

/// Walk up from the binary's own manifest dir to find the workspace root
/// (the directory containing `contracts/`).
fn workspace_root() -> PathBuf {
    let start = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    start
        .ancestors()
        .find(|p| p.join("contracts").is_dir())
        .unwrap_or(&start)
        .to_path_buf()
}
