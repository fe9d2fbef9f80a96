//! GraphQL surface: schema construction, root objects and wire types.

pub mod errors;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

use async_graphql::Context;

use crate::domain::types::Viewer;
use crate::state::AppState;

pub(crate) fn app_state<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a AppState> {
    ctx.data::<AppState>()
}

/// The authenticated caller. Anonymous requests carry no `Viewer` data.
pub(crate) fn viewer<'a>(ctx: &Context<'a>) -> Option<&'a Viewer> {
    ctx.data_opt::<Viewer>()
}
