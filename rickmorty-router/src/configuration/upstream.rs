use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use url::Url;

pub(crate) const DEFAULT_UPSTREAM_URL: &str = "https://rickandmortyapi.com/api/";

fn default_upstream_url() -> Url {
    Url::parse(DEFAULT_UPSTREAM_URL).expect("default upstream url must be valid")
}

/// Configuration for the upstream REST API
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct Upstream {
    /// Base URL of the REST API. Collection and character paths are resolved relative to it.
    /// Defaults to https://rickandmortyapi.com/api/
    pub(crate) url: Url,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
        }
    }
}
