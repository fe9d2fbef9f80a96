use axum::{Router, routing::get};

use storefront_core::health::healthz;
use storefront_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::graphql::schema::build_schema;
use crate::handlers::{
    graphql::{GRAPHQL_PATH, GraphQLState, graphiql, graphql_handler},
    health::readyz,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let graphql = GraphQLState {
        schema: build_schema(state.clone()),
        app: state.clone(),
    };
    let api = Router::new()
        .route(GRAPHQL_PATH, get(graphiql).post(graphql_handler))
        .with_state(graphql);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .with_state(state)
        // GraphQL
        .merge(api)
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
}
