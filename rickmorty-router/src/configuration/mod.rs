//! Logic for loading configuration in to an object model
mod cors;
mod server;
mod upstream;


use std::fmt;
use std::path::Path;
use std::str::FromStr;

use displaydoc::Display;
use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use schemars::schema::RootSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub(crate) use self::cors::Cors;
pub(crate) use self::server::HealthCheck;
pub(crate) use self::server::Server;
pub(crate) use self::upstream::Upstream;

/// Configuration error.
#[derive(Debug, Error, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// could not read configuration file '{path}': {error}
    CannotReadFile { path: String, error: String },
    /// {message}: {error}
    InvalidConfiguration {
        message: &'static str,
        error: String,
    },
    /// could not deserialize configuration: {0}
    DeserializeConfigError(serde_yaml::Error),
}

/// The configuration for the router.
///
/// Can be created through `serde::Deserialize` from various formats,
/// or inline in Rust code with `serde_json::json!` and `serde_json::from_value`.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Configuration {
    /// Configuration options pertaining to the http server component.
    pub(crate) server: Server,

    /// Health check endpoint configuration.
    pub(crate) health_check: HealthCheck,

    /// Cross origin request headers.
    pub(crate) cors: Cors,

    /// The REST API the graph is resolved from.
    pub(crate) upstream: Upstream,
}

#[buildstructor::buildstructor]
impl Configuration {
    #[builder]
    pub(crate) fn new(
        server: Option<Server>,
        health_check: Option<HealthCheck>,
        cors: Option<Cors>,
        upstream: Option<Upstream>,
    ) -> Self {
        Self {
            server: server.unwrap_or_default(),
            health_check: health_check.unwrap_or_default(),
            cors: cors.unwrap_or_default(),
            upstream: upstream.unwrap_or_default(),
        }
    }

    /// Read and validate a YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let raw_yaml =
            std::fs::read_to_string(path).map_err(|e| ConfigurationError::CannotReadFile {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;
        validate_configuration(&raw_yaml)
    }

    /// Check the invariants serde cannot express.
    pub(crate) fn validate(self) -> Result<Self, ConfigurationError> {
        match self.upstream.url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ConfigurationError::InvalidConfiguration {
                    message: "upstream url must use http or https",
                    error: format!("unsupported scheme '{scheme}'"),
                });
            }
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "server path must start with '/'",
                error: self.server.path.clone(),
            });
        }

        if self.health_check.enabled {
            if !self.health_check.path.starts_with('/') {
                return Err(ConfigurationError::InvalidConfiguration {
                    message: "health check path must start with '/'",
                    error: self.health_check.path.clone(),
                });
            }
            if self.health_check.path == self.server.path {
                return Err(ConfigurationError::InvalidConfiguration {
                    message: "health check path conflicts with the graphql endpoint",
                    error: self.health_check.path.clone(),
                });
            }
        }

        self.cors.validate()?;

        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "listening on {}{}, resolving from {}",
            self.server.listen, self.server.path, self.upstream.url
        )
    }
}

/// Parse configuration from a string in YAML syntax
impl FromStr for Configuration {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_configuration(s)
    }
}

/// Generate the JSON schema of the configuration file.
pub(crate) fn generate_config_schema() -> RootSchema {
    let settings = SchemaSettings::draft07().with(|s| {
        s.option_nullable = true;
        s.option_add_null_type = false;
        s.inline_subschemas = true;
    });

    settings.into_generator().into_root_schema_for::<Configuration>()
}

/// Deserialize a YAML document and check it. An empty document yields the defaults.
pub(crate) fn validate_configuration(raw_yaml: &str) -> Result<Configuration, ConfigurationError> {
    if raw_yaml.trim().is_empty() {
        return Configuration::default().validate();
    }

    let configuration: Configuration =
        serde_yaml::from_str(raw_yaml).map_err(ConfigurationError::DeserializeConfigError)?;
    configuration.validate()
}
