use crate::error::FetchError;
use crate::fetchers::Transport;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Plain HTTP GET transport backed by reqwest
///
/// Sends no custom headers, credentials or cookies. Redirects and timeouts
/// follow the client defaults unless a timeout is configured.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Builds a transport with an overall request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::from_client(client))
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        let start = std::time::Instant::now();
        ::log::info!("GET {}", url);

        let request_err = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            ::log::warn!("GET {} returned {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(request_err)?;
        ::log::debug!(
            "Fetched {} bytes from {} in {:.2} seconds",
            text.len(),
            url,
            start.elapsed().as_secs_f64()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    /// Serves a tiny site on an ephemeral local port
    async fn local_site() -> String {
        let app = Router::new()
            .route("/page", get(|| async { "<title>Local</title><p>Hello crab.</p>" }))
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
            .route("/broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn transport() -> HttpTransport {
        HttpTransport::from_client(Client::builder().no_proxy().build().unwrap())
    }

    fn url(base: &str, path: &str) -> Url {
        Url::parse(&format!("{}{}", base, path)).unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let base = local_site().await;
        let body = transport().get(&url(&base, "/page")).await.unwrap();
        assert_eq!(body, "<title>Local</title><p>Hello crab.</p>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let base = local_site().await;

        let err = transport().get(&url(&base, "/missing")).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }), "{:?}", err);

        let err = transport().get(&url(&base, "/broken")).await.unwrap_err();
        match err {
            FetchError::Status { url, status } => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/broken"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_a_request_error() {
        // Bind and drop a listener so the port is closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = transport()
            .get(&Url::parse(&format!("http://{}/", addr)).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }), "{:?}", err);
    }
}
