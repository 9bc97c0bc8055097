//! HTTP client for the upstream REST API.
//!
//! Every call is a direct passthrough: no retry, no cache, no de-duplication.

pub mod model;

use std::sync::Arc;

use http::HeaderMap;
use http::HeaderValue;
use http::header::USER_AGENT;
use serde::de::DeserializeOwned;
use url::Url;

use self::model::CharacterPage;
use self::model::RawCharacter;
use crate::error::FetchError;

const COLLECTION_PATH: &str = "character/";

/// A handle on the REST API. Cloning is cheap and shares the connection pool.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http_client: reqwest::Client,
    base_url: Arc<Url>,
}

impl UpstreamClient {
    /// Construct a client that resolves every path against `base_url`.
    pub fn new(base_url: Url) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            )),
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::UpstreamHttpError {
                status_code: None,
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            base_url: Arc::new(normalize_base_url(base_url)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET the first page of the character collection.
    pub async fn fetch_collection(&self) -> Result<CharacterPage, FetchError> {
        self.fetch_by_relative_path(COLLECTION_PATH).await
    }

    /// GET a single character. The id is forwarded as-is.
    pub async fn fetch_by_id(&self, id: &str) -> Result<RawCharacter, FetchError> {
        self.fetch_by_relative_path(&format!("{COLLECTION_PATH}{id}"))
            .await
    }

    /// GET a path relative to the base URL, or an absolute URL taken from an upstream payload.
    pub async fn fetch_by_relative_path<T>(&self, path_or_url: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path_or_url)
            .map_err(|e| FetchError::UpstreamInvalidUrl {
                reference: path_or_url.to_string(),
                reason: e.to_string(),
            })?;
        self.get(url).await
    }

    async fn get<T>(&self, url: Url) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(url = %url, "fetching from upstream");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::UpstreamHttpError {
                status_code: e.status().map(|status| status.as_u16()),
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), "upstream responded");

        if !status.is_success() {
            return Err(FetchError::UpstreamHttpError {
                status_code: Some(status.as_u16()),
                url: url.to_string(),
                reason: status.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::UpstreamHttpError {
                status_code: Some(status.as_u16()),
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        serde_json::from_slice(&body).map_err(|e| FetchError::UpstreamMalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// `Url::join` drops the last segment of a base without a trailing slash.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;
    use wiremock::matchers::header;
    use wiremock::matchers::method;
    use wiremock::matchers::path;

    use super::model::RawEpisode;
    use super::*;

    async fn client(mock_server: &MockServer) -> UpstreamClient {
        UpstreamClient::new(Url::parse(&format!("{}/api/", mock_server.uri())).unwrap()).unwrap()
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let client = UpstreamClient::new(Url::parse("http://localhost:9000/api").unwrap()).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:9000/api/");
        assert_eq!(
            client.base_url().join("character/1").unwrap().as_str(),
            "http://localhost:9000/api/character/1"
        );
    }

    #[tokio::test]
    async fn fetch_collection_gets_the_character_path() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/character/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "info": { "count": 2, "pages": 1, "next": null, "prev": null },
                "results": [{ "id": 1, "name": "Rick Sanchez" }, { "id": 2, "name": "Morty Smith" }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let page = client(&mock_server).await.fetch_collection().await.unwrap();

        let names: Vec<_> = page
            .results
            .iter()
            .map(|character| character.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Rick Sanchez", "Morty Smith"]);
    }

    #[tokio::test]
    async fn fetch_by_id_forwards_the_id_verbatim() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/character/not-a-number"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "error": "Hey! you must provide an id" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let error = client(&mock_server)
            .await
            .fetch_by_id("not-a-number")
            .await
            .unwrap_err();

        assert_eq!(error.status_code(), Some(500));
    }

    #[tokio::test]
    async fn not_found_is_an_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/character/9999"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Character not found" })),
            )
            .mount(&mock_server)
            .await;

        let error = client(&mock_server)
            .await
            .fetch_by_id("9999")
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            FetchError::UpstreamHttpError {
                status_code: Some(404),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn absolute_reference_urls_are_followed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/episode/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "name": "Pilot",
                "air_date": "December 2, 2013",
                "episode": "S01E01",
                "created": "2017-11-10T12:56:33.798Z"
            })))
            .mount(&mock_server)
            .await;

        let reference = format!("{}/api/episode/1", mock_server.uri());
        let episode: RawEpisode = client(&mock_server)
            .await
            .fetch_by_relative_path(&reference)
            .await
            .unwrap();

        assert_eq!(episode.name.as_deref(), Some("Pilot"));
        assert_eq!(episode.episode.as_deref(), Some("S01E01"));
    }

    #[tokio::test]
    async fn user_agent_is_sent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/character/1"))
            .and(header(
                "user-agent",
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let character = client(&mock_server).await.fetch_by_id("1").await.unwrap();
        assert_eq!(character.id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/character/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let error = client(&mock_server)
            .await
            .fetch_by_id("1")
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            FetchError::UpstreamMalformedResponse { .. }
        ));
    }

    #[tokio::test]
    async fn connection_failure_has_no_status() {
        // Nothing listens on the discard port.
        let client = UpstreamClient::new(Url::parse("http://127.0.0.1:9/api/").unwrap()).unwrap();

        let error = client.fetch_collection().await.unwrap_err();

        assert!(matches!(
            error,
            FetchError::UpstreamHttpError {
                status_code: None,
                ..
            }
        ));
    }
}
