//! Application state and HTTP router construction.

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql::parser::parse_query;
use async_graphql::parser::types::OperationType;
use async_graphql_axum::rejection::GraphQLRejection;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::graphql::CinemaSchema;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub schema: CinemaSchema,
}

/// Build the full Axum router: health probes, /graphql, and layers.
/// Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::health::router())
        .route("/graphql", get(graphql_get).post(graphql_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GraphQL query/mutation handler
async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

/// GET /graphql: the GraphiQL playground for browsers when enabled, otherwise
/// a query read from the URL parameters. Mutations are only accepted by POST.
async fn graphql_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: Result<GraphQLRequest, GraphQLRejection>,
) -> Response {
    let accepts_html = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if state.config.graphiql && accepts_html {
        return Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response();
    }

    let req = match req {
        Ok(req) => req.into_inner(),
        Err(rejection) => return rejection.into_response(),
    };

    if req.query.trim().is_empty() {
        return graphql_http_error(StatusCode::BAD_REQUEST, "Must provide query string.");
    }
    if selects_mutation(&req) {
        return graphql_http_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "Can only perform a mutation operation from a POST request.",
        );
    }

    GraphQLResponse::from(state.schema.execute(req).await).into_response()
}

/// Whether the operation the request would run is a mutation.
/// Unparseable documents are left for execution to report.
fn selects_mutation(req: &async_graphql::Request) -> bool {
    let Ok(document) = parse_query(&req.query) else {
        return false;
    };

    document.operations.iter().any(|(name, op)| {
        let selected = match (&req.operation_name, name) {
            (Some(wanted), Some(name)) => wanted == name.as_str(),
            _ => true,
        };
        selected && op.node.ty == OperationType::Mutation
    })
}

fn graphql_http_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "errors": [{ "message": message }] })),
    )
        .into_response()
}
