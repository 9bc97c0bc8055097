//! Router errors.
use async_graphql::ErrorExtensions;
use displaydoc::Display;
use thiserror::Error;

pub(crate) use crate::configuration::ConfigurationError;

/// Errors raised while fetching from the upstream REST API.
///
/// These never reach the client as-is: resolvers convert them into GraphQL
/// field errors through [`ErrorExtensions`].
#[derive(Error, Display, Debug, Clone, Eq, PartialEq)]
#[ignore_extra_doc_attributes]
#[non_exhaustive]
pub enum FetchError {
    /// HTTP fetch failed from '{url}': {reason}
    ///
    /// note that this relates to a transport error or a non-2xx status
    UpstreamHttpError {
        /// The status returned by upstream, if a response was received.
        status_code: Option<u16>,

        /// The URL that was requested.
        url: String,

        /// The reason the fetch failed.
        reason: String,
    },

    /// response from '{url}' was malformed: {reason}
    UpstreamMalformedResponse {
        /// The URL that was requested.
        url: String,

        /// The reason the deserialization failed.
        reason: String,
    },

    /// could not build an upstream URL from '{reference}': {reason}
    UpstreamInvalidUrl {
        /// The path or URL that could not be joined to the base URL.
        reference: String,

        /// The reason the URL was rejected.
        reason: String,
    },
}

impl FetchError {
    pub(crate) fn extension_code(&self) -> &'static str {
        match self {
            FetchError::UpstreamHttpError { .. } => "UPSTREAM_HTTP_ERROR",
            FetchError::UpstreamMalformedResponse { .. } => "UPSTREAM_MALFORMED_RESPONSE",
            FetchError::UpstreamInvalidUrl { .. } => "UPSTREAM_INVALID_URL",
        }
    }

    /// The HTTP status upstream answered with, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::UpstreamHttpError { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

impl ErrorExtensions for FetchError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, extensions| {
            extensions.set("code", self.extension_code());
            match self {
                FetchError::UpstreamHttpError {
                    status_code, url, ..
                } => {
                    extensions.set("url", url.as_str());
                    if let Some(status_code) = status_code {
                        extensions.set("status", *status_code);
                    }
                }
                FetchError::UpstreamMalformedResponse { url, .. } => {
                    extensions.set("url", url.as_str());
                }
                FetchError::UpstreamInvalidUrl { reference, .. } => {
                    extensions.set("url", reference.as_str());
                }
            }
        })
    }
}

/// Error types for the router lifecycle.
#[derive(Error, Debug, Display)]
#[non_exhaustive]
pub enum RouterError {
    /// failed to start server: {0}
    ServerCreationError(std::io::Error),

    /// server stopped with an error: {0}
    ServeError(std::io::Error),

    /// could not create the upstream client: {0}
    UpstreamClientError(FetchError),

    /// could not load configuration: {0}
    ConfigError(ConfigurationError),
}

impl From<ConfigurationError> for RouterError {
    fn from(err: ConfigurationError) -> Self {
        RouterError::ConfigError(err)
    }
}
