use async_graphql::ServerError;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::Html;
use tracing::debug;

use storefront_auth_types::identity::BearerToken;

use crate::domain::types::Viewer;
use crate::error::StorefrontError;
use crate::graphql::schema::StorefrontSchema;
use crate::state::AppState;
use crate::usecase::token::VerifyTokenUseCase;

pub const GRAPHQL_PATH: &str = "/graphql";

#[derive(Clone)]
pub struct GraphQLState {
    pub schema: StorefrontSchema,
    pub app: AppState,
}

/// `POST /graphql`.
///
/// A present bearer token must be validly signed and belong to an active user;
/// otherwise the whole request fails in-band with `INVALID_TOKEN` and the
/// operation is not executed.
pub async fn graphql_handler(
    State(gql): State<GraphQLState>,
    BearerToken(token): BearerToken,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(token) = token {
        let verify = VerifyTokenUseCase {
            users: gql.app.user_repo(),
            jwt_secret: gql.app.jwt_secret.clone(),
        };
        match verify.execute(&token).await {
            Ok(user) => {
                request = request.data(Viewer {
                    user_id: user.id,
                    email: user.email,
                });
            }
            Err(StorefrontError::JwtInvalid) => {
                debug!("rejected bearer token");
                return error_response(&StorefrontError::InvalidToken).into();
            }
            Err(e) => return error_response(&e).into(),
        }
    }
    gql.schema.execute(request).await.into()
}

fn error_response(e: &StorefrontError) -> async_graphql::Response {
    let err = async_graphql::ErrorExtensions::extend(e);
    let mut server_error = ServerError::new(err.message, None);
    server_error.extensions = err.extensions;
    async_graphql::Response::from_errors(vec![server_error])
}

/// `GET /graphql`: GraphiQL IDE.
pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}
