//! Axum http server wiring for the GraphQL endpoint.

use async_graphql::http::GraphiQLSource;
use axum::Json;
use axum::Router;
use axum::extract::RawQuery;
use axum::extract::State;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use http::StatusCode;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::configuration::Configuration;
use crate::error::RouterError;
use crate::graph;
use crate::graph::GatewaySchema;
use crate::upstream::UpstreamClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum HealthStatus {
    Up,
}

#[derive(Debug, Serialize)]
struct Health {
    status: HealthStatus,
}

#[derive(Clone)]
struct GraphQLState {
    schema: GatewaySchema,
    upstream: UpstreamClient,
    endpoint: String,
    graphiql: bool,
}

/// Build the axum router serving the graph, the IDE and the health check.
pub(crate) fn make_axum_router(configuration: &Configuration) -> Result<Router, RouterError> {
    let upstream = UpstreamClient::new(configuration.upstream.url.clone())
        .map_err(RouterError::UpstreamClientError)?;
    let cors = configuration.cors.clone().into_layer()?;

    let state = GraphQLState {
        schema: graph::build_schema(configuration.server.introspection),
        upstream,
        endpoint: configuration.server.path.clone(),
        graphiql: configuration.server.graphiql,
    };

    let mut router = Router::new().route(
        &configuration.server.path,
        get(handle_get).post(handle_post),
    );
    if configuration.health_check.enabled {
        router = router.route(&configuration.health_check.path, get(handle_health));
    }

    Ok(router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

async fn handle_post(
    State(state): State<GraphQLState>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let response = graph::execute(&state.schema, state.upstream, request).await;
    if response.is_err() {
        tracing::debug!(errors = response.errors.len(), "graphql response carries errors");
    }
    Json(response)
}

/// `GET` executes a query passed in the query string, otherwise serves GraphiQL when enabled.
async fn handle_get(State(state): State<GraphQLState>, RawQuery(query): RawQuery) -> Response {
    match query.filter(|query| !query.is_empty()) {
        Some(query) => match async_graphql::http::parse_query_string(&query) {
            Ok(request) => {
                let response = graph::execute(&state.schema, state.upstream, request).await;
                Json(response).into_response()
            }
            Err(err) => {
                tracing::debug!("invalid graphql query string: {err}");
                (StatusCode::BAD_REQUEST, err.to_string()).into_response()
            }
        },
        None if state.graphiql => {
            Html(GraphiQLSource::build().endpoint(&state.endpoint).finish()).into_response()
        }
        None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn handle_health() -> Json<Health> {
    Json(Health {
        status: HealthStatus::Up,
    })
}
