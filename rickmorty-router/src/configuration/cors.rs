//! Cross Origin Resource Sharing (CORS configuration)

use http::HeaderValue;
use http::Method;
use http::header::CONTENT_TYPE;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use tower_http::cors;
use tower_http::cors::CorsLayer;

use super::ConfigurationError;

/// Cross origin request configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct Cors {
    /// Set to true to allow any origin.
    ///
    /// Defaults to false
    pub(crate) allow_any_origin: bool,

    /// The origin(s) to allow requests from.
    /// Defaults to none, which rejects every cross origin request.
    pub(crate) origins: Vec<String>,
}

impl Cors {
    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if self.allow_any_origin && !self.origins.is_empty() {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "cors: `allow_any_origin` and `origins` are mutually exclusive",
                error: self.origins.join(", "),
            });
        }
        self.origin_header_values().map(|_| ())
    }

    pub(crate) fn into_layer(self) -> Result<CorsLayer, ConfigurationError> {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);

        if self.allow_any_origin {
            Ok(layer.allow_origin(cors::Any))
        } else {
            Ok(layer.allow_origin(self.origin_header_values()?))
        }
    }

    fn origin_header_values(&self) -> Result<Vec<HeaderValue>, ConfigurationError> {
        self.origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| {
                    ConfigurationError::InvalidConfiguration {
                        message: "cors: invalid origin",
                        error: format!("'{origin}': {e}"),
                    }
                })
            })
            .collect()
    }
}
