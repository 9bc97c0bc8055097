use std::net::SocketAddr;

use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

const DEFAULT_LISTEN: ([u8; 4], u16) = ([127, 0, 0, 1], 4000);

fn default_listen() -> SocketAddr {
    SocketAddr::from(DEFAULT_LISTEN)
}

fn default_graphql_path() -> String {
    String::from("/")
}

fn default_health_check_path() -> String {
    String::from("/health")
}

/// Configuration for the GraphQL http endpoint
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct Server {
    /// The socket address and port to listen on
    /// Defaults to 127.0.0.1:4000
    #[schemars(with = "String")]
    pub(crate) listen: SocketAddr,

    /// The HTTP path on which GraphQL requests will be served.
    /// Defaults to "/"
    pub(crate) path: String,

    /// Allow introspection queries; defaults to true
    pub(crate) introspection: bool,

    /// Serve the GraphiQL IDE on GET requests to the endpoint; defaults to true
    pub(crate) graphiql: bool,
}

#[buildstructor::buildstructor]
impl Server {
    #[builder]
    pub(crate) fn new(
        listen: Option<SocketAddr>,
        path: Option<String>,
        introspection: Option<bool>,
        graphiql: Option<bool>,
    ) -> Self {
        Self {
            listen: listen.unwrap_or_else(default_listen),
            path: path.unwrap_or_else(default_graphql_path),
            introspection: introspection.unwrap_or(true),
            graphiql: graphiql.unwrap_or(true),
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Configuration options pertaining to the health component.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct HealthCheck {
    /// Set to false to disable the health check
    pub(crate) enabled: bool,

    /// Optionally set a custom healthcheck path
    /// Defaults to /health
    pub(crate) path: String,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_health_check_path(),
        }
    }
}
