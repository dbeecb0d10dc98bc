mod assets;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;

use crate::output::ReportDocument;

pub struct WebConfig {
    pub document: ReportDocument,
    pub host: String,
    pub port: u16,
}

struct AppState {
    document: ReportDocument,
}

pub fn router(document: ReportDocument) -> Router {
    let state = Arc::new(AppState { document });
    Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/report", get(report))
        .with_state(state)
}

/// Serve the chart until ctrl-c.
pub async fn run(config: WebConfig) -> Result<()> {
    let WebConfig {
        document,
        host,
        port,
    } = config;

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    log::info!("chart available at http://{addr} (Ctrl+C to stop)");

    axum::serve(listener, router(document))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("shutting down web server");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        assets::STYLES_CSS,
    )
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        assets::APP_JS,
    )
}

async fn report(State(state): State<Arc<AppState>>) -> Json<ReportDocument> {
    Json(state.document.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineBuilder, PipelineSettings};
    use crate::synth::SyntheticAgents;

    #[test]
    fn test_assets_reference_each_other() {
        assert!(assets::INDEX_HTML.contains("/app.js"));
        assert!(assets::INDEX_HTML.contains("/styles.css"));
        assert!(assets::APP_JS.contains("/api/report"));
    }

    #[tokio::test]
    async fn test_report_handler_returns_document() {
        let document = PipelineBuilder::new(PipelineSettings::default())
            .build()
            .unwrap()
            .run(SyntheticAgents::new(1).generate(20))
            .unwrap()
            .document();
        let state = Arc::new(AppState {
            document: document.clone(),
        });

        let Json(served) = report(State(state)).await;
        assert_eq!(served.total_population, 20);
        assert_eq!(served.report.series.len(), document.report.series.len());
    }
}
