use async_graphql::{Context, ID, Object, Result, SimpleObject};

use crate::graphql::errors::{AccountError, CheckoutError, into_payload};
use crate::graphql::types::{
    AccountRegisterInput, Checkout, CheckoutCreateInput, CheckoutLineInput, Order, User,
};
use crate::graphql::{app_state, viewer};
use crate::usecase::account::{RegisterAccountInput, RegisterAccountUseCase};
use crate::usecase::checkout::{
    AddCheckoutLinesUseCase, CompleteCheckoutUseCase, CreateCheckoutInput, CreateCheckoutUseCase,
    LineInput,
};
use crate::usecase::token::{CreateTokenUseCase, VerifyTokenUseCase};

fn line_inputs(lines: Vec<CheckoutLineInput>) -> Vec<LineInput> {
    lines
        .into_iter()
        .map(|l| LineInput {
            variant_id: l.variant_id.0,
            quantity: l.quantity,
        })
        .collect()
}

// ── Payloads ─────────────────────────────────────────────────────────────────

#[derive(SimpleObject)]
pub struct CheckoutCreate {
    pub checkout: Option<Checkout>,
    pub errors: Vec<CheckoutError>,
}

#[derive(SimpleObject)]
pub struct CheckoutLinesAdd {
    pub checkout: Option<Checkout>,
    pub errors: Vec<CheckoutError>,
}

#[derive(SimpleObject)]
pub struct CheckoutComplete {
    pub order: Option<Order>,
    pub errors: Vec<CheckoutError>,
}

#[derive(SimpleObject)]
pub struct AccountRegister {
    pub user: Option<User>,
    /// Always false: accounts are active immediately.
    pub requires_confirmation: bool,
    pub errors: Vec<AccountError>,
}

#[derive(SimpleObject)]
pub struct CreateToken {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
    pub errors: Vec<AccountError>,
}

#[derive(SimpleObject)]
pub struct VerifyToken {
    pub is_valid: bool,
    pub user: Option<User>,
    pub errors: Vec<AccountError>,
}

// ── Root ─────────────────────────────────────────────────────────────────────

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Start a checkout. Logged-in callers own it and may omit `email`.
    async fn checkout_create(
        &self,
        ctx: &Context<'_>,
        input: CheckoutCreateInput,
    ) -> Result<CheckoutCreate> {
        let state = app_state(ctx)?;
        let usecase = CreateCheckoutUseCase {
            products: state.product_repo(),
            checkouts: state.checkout_repo(),
            settings: state.checkout.clone(),
        };
        let result = usecase
            .execute(
                viewer(ctx),
                CreateCheckoutInput {
                    lines: line_inputs(input.lines),
                    email: input.email,
                    channel: input.channel,
                },
            )
            .await;
        let (checkout, errors) = into_payload(result)?;
        Ok(CheckoutCreate {
            checkout: checkout.map(Checkout),
            errors,
        })
    }

    async fn checkout_lines_add(
        &self,
        ctx: &Context<'_>,
        checkout_id: ID,
        lines: Vec<CheckoutLineInput>,
    ) -> Result<CheckoutLinesAdd> {
        let state = app_state(ctx)?;
        let usecase = AddCheckoutLinesUseCase {
            products: state.product_repo(),
            checkouts: state.checkout_repo(),
            settings: state.checkout.clone(),
        };
        let result = usecase
            .execute(viewer(ctx), &checkout_id, &line_inputs(lines))
            .await;
        let (checkout, errors) = into_payload(result)?;
        Ok(CheckoutLinesAdd {
            checkout: checkout.map(Checkout),
            errors,
        })
    }

    /// Place an order from the checkout. The checkout is deleted on success.
    async fn checkout_complete(
        &self,
        ctx: &Context<'_>,
        checkout_id: ID,
    ) -> Result<CheckoutComplete> {
        let state = app_state(ctx)?;
        let usecase = CompleteCheckoutUseCase {
            products: state.product_repo(),
            checkouts: state.checkout_repo(),
        };
        let result = usecase.execute(viewer(ctx), &checkout_id).await;
        let (order, errors) = into_payload(result)?;
        Ok(CheckoutComplete {
            order: order.map(Order),
            errors,
        })
    }

    async fn account_register(
        &self,
        ctx: &Context<'_>,
        input: AccountRegisterInput,
    ) -> Result<AccountRegister> {
        let state = app_state(ctx)?;
        let usecase = RegisterAccountUseCase {
            users: state.user_repo(),
        };
        let result = usecase
            .execute(RegisterAccountInput {
                email: input.email,
                password: input.password,
                first_name: input.first_name,
                last_name: input.last_name,
            })
            .await;
        let (user, errors) = into_payload(result)?;
        Ok(AccountRegister {
            user: user.map(User),
            requires_confirmation: false,
            errors,
        })
    }

    /// Log in with email and password.
    async fn token_create(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<CreateToken> {
        let state = app_state(ctx)?;
        let usecase = CreateTokenUseCase {
            users: state.user_repo(),
            jwt_secret: state.jwt_secret.clone(),
            access_token_ttl_secs: state.access_token_ttl_secs,
        };
        let result = usecase.execute(&email, &password).await;
        let (output, errors) = into_payload(result)?;
        Ok(match output {
            Some(out) => CreateToken {
                token: Some(out.access_token),
                refresh_token: Some(out.refresh_token),
                user: Some(User(out.user)),
                errors,
            },
            None => CreateToken {
                token: None,
                refresh_token: None,
                user: None,
                errors,
            },
        })
    }

    async fn token_verify(&self, ctx: &Context<'_>, token: String) -> Result<VerifyToken> {
        let state = app_state(ctx)?;
        let usecase = VerifyTokenUseCase {
            users: state.user_repo(),
            jwt_secret: state.jwt_secret.clone(),
        };
        let result = usecase.execute(&token).await;
        let (user, errors) = into_payload(result)?;
        Ok(VerifyToken {
            is_valid: user.is_some(),
            user: user.map(User),
            errors,
        })
    }
}
