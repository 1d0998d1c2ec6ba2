//! reqwest-backed implementation of [`MetricsApi`]

use crate::MetricsApi;
use async_trait::async_trait;
use obs_core::{MetricList, ObsError, Observer, ObserverKey, ObserverList, Result};
use reqwest::{Client, Response, Url};

const METRICS_RESOURCE: &str = "metrics";
const OBSERVERS_RESOURCE: &str = "observers";

/// HTTP client for the metrics service
#[derive(Debug, Clone)]
pub struct HttpMetricsApi {
    client: Client,
    base_url: Url,
}

impl HttpMetricsApi {
    /// Create a client rooted at `base_url` (for example `http://host:8170/v1`)
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client that reuses an existing reqwest [`Client`]
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ObsError::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ObsError::Config(format!(
                "API base URL '{}' cannot carry a path",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Base URL plus `segments`, each percent-encoded on its own
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ObsError::Config(format!("Cannot extend URL '{}'", self.base_url)))?;
            path.pop_if_empty();
            path.push(METRICS_RESOURCE);
            path.extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ObsError::Fetch(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ObsError::Fetch(format!("GET {} returned {}", url, status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ObsError::Fetch(format!("GET {}: invalid body: {}", url, e)))
    }
}

/// Turn a non-2xx mutation response into an [`ObsError::Mutation`]
async fn mutation_result(response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let status_text = status.canonical_reason().unwrap_or("error").to_string();
    let detail = response.text().await.unwrap_or_default();
    Err(ObsError::Mutation {
        status: Some(status.as_u16()),
        status_text,
        detail: detail.trim().to_string(),
    })
}

#[async_trait]
impl MetricsApi for HttpMetricsApi {
    async fn list_metrics(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&[])?;
        let body: MetricList = self.get_json(url).await?;
        Ok(body.metrics)
    }

    async fn list_observers(&self, metric_id: &str) -> Result<Vec<Observer>> {
        let url = self.endpoint(&[metric_id, OBSERVERS_RESOURCE])?;
        let body: ObserverList = self.get_json(url).await?;
        Ok(body.observers)
    }

    async fn add_observer(&self, metric_id: &str, callback_url: &str) -> Result<()> {
        let url = self.endpoint(&[metric_id, OBSERVERS_RESOURCE])?;
        tracing::debug!("POST {} <- {}", url, callback_url);

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(callback_url.to_string())
            .send()
            .await
            .map_err(|e| ObsError::transport(e.to_string()))?;

        mutation_result(response).await
    }

    async fn delete_observer(&self, key: &ObserverKey) -> Result<()> {
        let url = self.endpoint(&[&key.metric_id, OBSERVERS_RESOURCE, &key.observer_id])?;
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| ObsError::transport(e.to_string()))?;

        mutation_result(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> HttpMetricsApi {
        HttpMetricsApi::new(&format!("{}/v1", server.uri())).unwrap()
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        assert!(matches!(
            HttpMetricsApi::new("not a url"),
            Err(ObsError::Config(_))
        ));
        assert!(matches!(
            HttpMetricsApi::new("mailto:ops@example.com"),
            Err(ObsError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_encodes_each_segment() {
        let api = HttpMetricsApi::new("http://localhost:8170/v1/").unwrap();
        let url = api.endpoint(&["cpu/load", OBSERVERS_RESOURCE, "o 1"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8170/v1/metrics/cpu%2Fload/observers/o%201"
        );
    }

    #[tokio::test]
    async fn test_list_metrics_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "metrics": ["ResponseTime", "CpuUtilization", "Throughput"]
            })))
            .mount(&server)
            .await;

        let metrics = api_for(&server).list_metrics().await.unwrap();
        assert_eq!(metrics, vec!["ResponseTime", "CpuUtilization", "Throughput"]);
    }

    #[tokio::test]
    async fn test_list_observers_decodes_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/metrics/ResponseTime/observers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "observers": [
                    {"id": "1", "callbackUrl": "http://sink-a/notify"},
                    {"id": "2", "callbackUrl": "http://sink-b/notify"}
                ]
            })))
            .mount(&server)
            .await;

        let observers = api_for(&server)
            .list_observers("ResponseTime")
            .await
            .unwrap();
        assert_eq!(
            observers,
            vec![
                Observer::new("1", "http://sink-a/notify"),
                Observer::new("2", "http://sink-b/notify"),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_failure_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/metrics"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = api_for(&server).list_metrics().await.unwrap_err();
        assert!(matches!(err, ObsError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_malformed_list_body_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = api_for(&server).list_metrics().await.unwrap_err();
        assert!(matches!(err, ObsError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_add_posts_raw_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/metrics/ResponseTime/observers"))
            .and(header("content-type", "text/plain"))
            .and(body_string("http://sink-c/notify"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        api_for(&server)
            .add_observer("ResponseTime", "http://sink-c/notify")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_rejection_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/metrics/Unknown/observers"))
            .respond_with(ResponseTemplate::new(404).set_body_string("metric not found"))
            .mount(&server)
            .await;

        let err = api_for(&server)
            .add_observer("Unknown", "http://sink/notify")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.user_message(), "Not Found 404 metric not found");
    }

    #[tokio::test]
    async fn test_delete_uses_composite_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/metrics/ResponseTime/observers/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let key = ObserverKey::new("7", "ResponseTime");
        api_for(&server).delete_observer(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let server = MockServer::start().await;
        let base = format!("{}/v1", server.uri());
        drop(server);

        let api = HttpMetricsApi::new(&base).unwrap();
        let err = api
            .delete_observer(&ObserverKey::new("1", "m"))
            .await
            .unwrap_err();
        assert!(matches!(err, ObsError::Mutation { status: None, .. }));
    }
}
