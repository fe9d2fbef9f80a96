use async_graphql::{EmptySubscription, Schema};

use crate::graphql::mutation::MutationRoot;
use crate::graphql::query::QueryRoot;
use crate::state::AppState;

pub type StorefrontSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub const MAX_QUERY_DEPTH: usize = 12;
pub const MAX_QUERY_COMPLEXITY: usize = 500;

pub fn build_schema(state: AppState) -> StorefrontSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}
