//! [`ResourceClient`] implementation backed by `reqwest`.

use cimi_browser_app::ports::{Created, ResourceClient};
use cimi_browser_domain::error::CimiError;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::config::HttpClientConfig;
use crate::error::HttpClientError;

const JSON: &str = "application/json";

/// JSON-over-HTTP client for CIMI resources.
#[derive(Debug, Clone)]
pub struct ReqwestResourceClient {
    client: Client,
}

impl ReqwestResourceClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::Build`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: &HttpClientConfig) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(HttpClientError::Build)?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, HttpClientError> {
        let response = request
            .header(ACCEPT, JSON)
            .send()
            .await
            .map_err(HttpClientError::Request)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        tracing::debug!(status = status.as_u16(), url = %response.url(), "request rejected");
        Err(HttpClientError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}

impl ResourceClient for ReqwestResourceClient {
    async fn get(&self, url: &str) -> Result<Value, CimiError> {
        let response = self.send(self.client.get(url)).await?;
        let text = response.text().await.map_err(HttpClientError::Request)?;
        let value = serde_json::from_str(&text).map_err(HttpClientError::Decode)?;
        Ok(value)
    }

    async fn put(&self, url: &str, body: &Value) -> Result<(), CimiError> {
        self.send(self.client.put(url).json(body)).await?;
        Ok(())
    }

    async fn post(&self, url: &str, body: Option<&Value>) -> Result<Created, CimiError> {
        let request = match body {
            Some(body) => self.client.post(url).json(body),
            None => self.client.post(url).header(CONTENT_TYPE, JSON),
        };
        let response = self.send(request).await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Ok(Created { location })
    }

    async fn delete(&self, url: &str) -> Result<(), CimiError> {
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Received = Arc<Mutex<Vec<(String, Option<String>, Option<Value>)>>>;

    fn record(received: &Received, method: &str, headers: &HeaderMap, body: Option<Value>) {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        received
            .lock()
            .unwrap()
            .push((method.to_string(), content_type, body));
    }

    fn router(received: Received) -> Router {
        Router::new()
            .route(
                "/cimi/",
                get(|headers: HeaderMap| async move {
                    let accept = headers.get(ACCEPT).and_then(|v| v.to_str().ok());
                    assert_eq!(accept, Some(JSON));
                    axum::Json(json!({"resourceURI": "http://x/CloudEntryPoint"}))
                }),
            )
            .route("/cimi/garbage", get(|| async { "<html></html>" }))
            .route(
                "/cimi/MachineCollection/m1",
                get(|| async { StatusCode::FORBIDDEN })
                    .put(
                        |State(received): State<Received>,
                         headers: HeaderMap,
                         axum::Json(body): axum::Json<Value>| async move {
                            record(&received, "PUT", &headers, Some(body));
                            StatusCode::OK
                        },
                    )
                    .delete(|State(received): State<Received>, headers: HeaderMap| async move {
                        record(&received, "DELETE", &headers, None);
                        StatusCode::NO_CONTENT
                    }),
            )
            .route(
                "/cimi/MachineCollection",
                post(|State(received): State<Received>, headers: HeaderMap, body: String| async move {
                    let body = serde_json::from_str(&body).ok();
                    record(&received, "POST", &headers, body);
                    (
                        StatusCode::CREATED,
                        [(LOCATION, "MachineCollection/m2")],
                    )
                }),
            )
            .route(
                "/cimi/MachineCollection/m1/start",
                post(|State(received): State<Received>, headers: HeaderMap, body: String| async move {
                    assert!(body.is_empty());
                    record(&received, "POST", &headers, None);
                    StatusCode::ACCEPTED
                }),
            )
            .with_state(received)
    }

    async fn spawn_server() -> (String, Received) {
        let received = Received::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(received.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/cimi"), received)
    }

    fn client() -> ReqwestResourceClient {
        ReqwestResourceClient::new(&HttpClientConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn should_get_json_document() {
        let (base, _) = spawn_server().await;

        let value = client().get(&format!("{base}/")).await.unwrap();

        assert_eq!(value["resourceURI"], "http://x/CloudEntryPoint");
    }

    #[tokio::test]
    async fn should_map_error_status_to_transport_error() {
        let (base, _) = spawn_server().await;

        let err = client()
            .get(&format!("{base}/MachineCollection/m1"))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Forbidden(403)");
    }

    #[tokio::test]
    async fn should_report_non_json_body() {
        let (base, _) = spawn_server().await;

        let err = client().get(&format!("{base}/garbage")).await.unwrap_err();

        assert!(matches!(err, CimiError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn should_put_json_body() {
        let (base, received) = spawn_server().await;

        client()
            .put(&format!("{base}/MachineCollection/m1"), &json!({"name": "db"}))
            .await
            .unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received[0].0, "PUT");
        assert_eq!(received[0].1.as_deref(), Some(JSON));
        assert_eq!(received[0].2, Some(json!({"name": "db"})));
    }

    #[tokio::test]
    async fn should_read_location_of_created_resource() {
        let (base, received) = spawn_server().await;

        let created = client()
            .post(
                &format!("{base}/MachineCollection"),
                Some(&json!({"key": "value"})),
            )
            .await
            .unwrap();

        assert_eq!(created.location.as_deref(), Some("MachineCollection/m2"));
        assert_eq!(received.lock().unwrap()[0].2, Some(json!({"key": "value"})));
    }

    #[tokio::test]
    async fn should_post_empty_action_body() {
        let (base, received) = spawn_server().await;

        let created = client()
            .post(&format!("{base}/MachineCollection/m1/start"), None)
            .await
            .unwrap();

        assert_eq!(created.location, None);
        assert_eq!(received.lock().unwrap()[0].0, "POST");
    }

    #[tokio::test]
    async fn should_delete_resource() {
        let (base, received) = spawn_server().await;

        client()
            .delete(&format!("{base}/MachineCollection/m1"))
            .await
            .unwrap();

        assert_eq!(received.lock().unwrap()[0].0, "DELETE");
    }

    #[tokio::test]
    async fn should_use_status_zero_when_server_is_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client().get(&format!("http://{addr}/")).await.unwrap_err();

        let CimiError::Transport(transport) = err else {
            panic!("expected a transport error");
        };
        assert_eq!(transport.status, 0);
    }
}
