use rickmorty_router::graph;
use rickmorty_router::graph::GatewaySchema;
use rickmorty_router::upstream::UpstreamClient;
use serde_json::Value;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

/// A stand-in for the REST API serving three characters, one location and two episodes.
pub(crate) struct MockUpstream {
    pub(crate) server: MockServer,
}

impl MockUpstream {
    pub(crate) async fn start() -> Self {
        let server = MockServer::start().await;
        let uri = server.uri();

        let characters = vec![
            json!({
                "id": 1,
                "name": "Rick Sanchez",
                "status": "Alive",
                "gender": "Male",
                "image": format!("{uri}/api/character/avatar/1.jpeg"),
                "location": { "name": "Earth", "url": format!("{uri}/api/location/1") },
                "episode": [format!("{uri}/api/episode/1"), format!("{uri}/api/episode/2")],
            }),
            json!({
                "id": 2,
                "name": "Morty Smith",
                "status": "Alive",
                "gender": "Male",
                "image": format!("{uri}/api/character/avatar/2.jpeg"),
                "location": { "name": "Earth", "url": format!("{uri}/api/location/1") },
                "episode": [format!("{uri}/api/episode/1")],
            }),
            json!({
                "id": 3,
                "name": "Mr. Nobody",
                "status": "unknown",
                "gender": "unknown",
                "image": format!("{uri}/api/character/avatar/3.jpeg"),
                "location": { "name": "unknown", "url": "" },
                "episode": [],
            }),
        ];

        for character in &characters {
            Mock::given(method("GET"))
                .and(path(format!("/api/character/{}", character["id"])))
                .respond_with(ResponseTemplate::new(200).set_body_json(character))
                .mount(&server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path("/api/character/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "info": { "count": 3, "pages": 1, "next": null, "prev": null },
                "results": characters,
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/location/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "name": "Earth",
                "type": "Planet",
                "dimension": "Dimension C-137",
                "residents": [format!("{uri}/api/character/1")],
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/episode/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "name": "Pilot",
                "air_date": "December 2, 2013",
                "episode": "S01E01",
                "created": "2017-11-10T12:56:33.798Z",
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/episode/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 2,
                "name": "Lawnmower Dog",
                "air_date": "December 9, 2013",
                "episode": "S01E02",
                "created": "2017-11-10T12:56:33.916Z",
            })))
            .mount(&server)
            .await;

        Self { server }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("{}/api/", self.server.uri())
    }

    pub(crate) fn client(&self) -> UpstreamClient {
        UpstreamClient::new(self.base_url().parse().unwrap()).unwrap()
    }

    /// Run a query against the schema, returning the serialized response.
    pub(crate) async fn query(&self, query: &str) -> Value {
        let schema: GatewaySchema = graph::build_schema(true);
        let response = graph::execute(&schema, self.client(), query).await;
        serde_json::to_value(&response).unwrap()
    }

    /// Number of requests upstream received for `path`.
    pub(crate) async fn requests_to(&self, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|request| request.url.path() == path)
            .count()
    }

    pub(crate) async fn total_requests(&self) -> usize {
        self.server.received_requests().await.unwrap().len()
    }
}
