//! Interactive dashboard over HTTP.
//!
//! `GET /` shows the form and, when a query parameter whose name contains
//! `url` is present, the report for that page. `GET /api/report` returns the
//! same outcome as JSON.

use crate::Analyzer;
use crate::fetchers::Transport;
use crate::parsers::headings::HeadingLevel;
use crate::report::html::{DashboardView, render_dashboard};
use crate::results::AnalysisOutcome;
use crate::utils::url_from_query;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

type Params = Vec<(String, String)>;

/// Builds the dashboard router
pub fn router<T: Transport + 'static>(analyzer: Arc<Analyzer<T>>) -> Router {
    Router::new()
        .route("/", get(dashboard::<T>))
        .route("/api/report", get(api_report::<T>))
        .with_state(analyzer)
}

/// Binds to `addr` and serves the dashboard until the process stops
pub async fn serve<T: Transport + 'static>(
    analyzer: Arc<Analyzer<T>>,
    addr: &str,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    ::log::info!("Dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(analyzer)).await
}

/// Heading levels ticked in the query, or the analyzer defaults when none are
fn requested_levels<T: Transport>(analyzer: &Analyzer<T>, params: &Params) -> Vec<HeadingLevel> {
    let levels: Vec<HeadingLevel> = params
        .iter()
        .filter(|(key, _)| key == "level")
        .filter_map(|(_, value)| value.parse().ok())
        .collect();

    if levels.is_empty() {
        analyzer.default_levels().to_vec()
    } else {
        levels
    }
}

async fn dashboard<T: Transport + 'static>(
    State(analyzer): State<Arc<Analyzer<T>>>,
    Query(params): Query<Params>,
) -> Html<String> {
    let input = url_from_query(&params).unwrap_or("");
    let levels = requested_levels(&analyzer, &params);
    ::log::debug!("Dashboard request for {:?} with levels {:?}", input, levels);

    let outcome = analyzer.handle(Some(input), &levels).await;
    Html(render_dashboard(&DashboardView {
        input,
        levels: &levels,
        outcome: &outcome,
    }))
}

async fn api_report<T: Transport + 'static>(
    State(analyzer): State<Arc<Analyzer<T>>>,
    Query(params): Query<Params>,
) -> Response {
    let input = url_from_query(&params);
    let levels = requested_levels(&analyzer, &params);

    let outcome = analyzer.handle(input, &levels).await;
    let status = match &outcome {
        AnalysisOutcome::Report { .. } => StatusCode::OK,
        AnalysisOutcome::Empty | AnalysisOutcome::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
        AnalysisOutcome::LoadFailed { .. } => StatusCode::BAD_GATEWAY,
    };
    (status, Json(outcome)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::EntityModel;
    use crate::fetchers::mock::MockTransport;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const PAGE: &str = r#"<title>Crab facts</title>
        <meta name="description" content="Facts about crabs">
        <h1>Crabs</h1><h2>Habitat</h2><h3>Shores</h3>
        <p>Ferris lives near Lisbon. Everyone likes Ferris.</p>"#;

    fn analyzer(transport: MockTransport) -> Arc<Analyzer<MockTransport>> {
        Arc::new(Analyzer::new(transport, Arc::new(EntityModel::default())))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_dashboard_without_url_shows_form() {
        let analyzer = analyzer(MockTransport::new(PAGE));
        let (status, body) = get_body(router(analyzer.clone()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<form"));
        assert!(!body.contains("Page Metadata"));
        assert_eq!(analyzer.cache().transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_dashboard_invalid_url_warns_without_fetching() {
        let analyzer = analyzer(MockTransport::new(PAGE));
        let (status, body) = get_body(router(analyzer.clone()), "/?url=not%20a%20url").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Please enter a valid URL"));
        assert_eq!(analyzer.cache().transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_dashboard_renders_report() {
        let analyzer = analyzer(MockTransport::new(PAGE));
        let uri = "/?page_url=https%3A%2F%2Fexample.com%2Fcrabs&url=https%3A%2F%2Fignored.example%2F&level=h3";
        let (status, body) = get_body(router(analyzer.clone()), uri).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Title Tag: <code>Crab facts</code>"));
        assert!(body.contains("<summary>H3s</summary><ul><li>Shores</li>"));
        assert!(!body.contains("<summary>H2s</summary>"));
        assert!(body.contains("<td>Ferris</td><td>2</td>"));
        assert_eq!(analyzer.cache().transport().calls(), 1);
        assert!(
            analyzer
                .cache()
                .contains(&url::Url::parse("https://example.com/crabs").unwrap())
                .await
        );
    }

    #[tokio::test]
    async fn test_api_report_statuses() {
        let analyzer = analyzer(MockTransport::new(PAGE));
        let (status, body) = get_body(
            router(analyzer.clone()),
            "/api/report?url=https%3A%2F%2Fexample.com%2F",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "report");
        assert_eq!(json["report"]["metadata"]["h1"], "Crabs");

        let (status, _) = get_body(router(analyzer.clone()), "/api/report?url=bad").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let failing = self::analyzer(MockTransport::failing(500));
        let (status, body) = get_body(
            router(failing),
            "/api/report?url=https%3A%2F%2Fexample.com%2F",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("load_failed"));
    }
}
