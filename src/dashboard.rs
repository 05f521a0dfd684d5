//! Web dashboard showing the six generated charts.
//!
//! `GET /` returns a page of inline frames, `GET /results/<file>` serves the
//! artifacts, `GET /health` reports liveness.

use std::fmt::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use axum::{
    Json, Router,
    extract::State,
    response::Html,
    routing::get,
};
use serde::Serialize;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::charts::{self, html::escape};

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub addr: SocketAddr,
    pub results_dir: PathBuf,
}

#[derive(Clone)]
struct AppState {
    title: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    artifacts: usize,
}

/// Fails when any of the six charts has not been generated.
pub fn verify_artifacts(results_dir: &Path) -> anyhow::Result<()> {
    let missing: Vec<&str> = charts::ARTIFACTS
        .iter()
        .copied()
        .filter(|name| !results_dir.join(name).exists())
        .collect();

    if !missing.is_empty() {
        bail!(
            "missing artifacts in {}: {}; run `generate` first",
            results_dir.display(),
            missing.join(", ")
        );
    }
    Ok(())
}

pub fn router(results_dir: &Path) -> Router {
    let state = AppState {
        title: "Learning analytics dashboard",
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .nest_service("/results", ServeDir::new(results_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serves the dashboard until the process is stopped.
pub async fn serve(config: DashboardConfig) -> anyhow::Result<()> {
    verify_artifacts(&config.results_dir)?;

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!(addr = %config.addr, results_dir = %config.results_dir.display(), "Dashboard listening");

    axum::serve(listener, router(&config.results_dir))
        .await
        .context("dashboard server failed")?;
    Ok(())
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(index_page(state.title))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        artifacts: charts::ARTIFACTS.len(),
    })
}

/// Two rows of three frames, in [`charts::ARTIFACTS`] order.
pub fn index_page(title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html><head><meta charset=\"utf-8\"><title>{}</title></head>", escape(title));
    let _ = writeln!(out, "<body>");
    let _ = writeln!(
        out,
        "<h1 style=\"text-align:center;margin-bottom:30px;\">{}</h1>",
        escape(title)
    );

    for row in charts::ARTIFACTS.chunks(3) {
        let _ = writeln!(
            out,
            "<div style=\"display:flex;justify-content:space-between;margin-bottom:20px;\">"
        );
        for name in row {
            let _ = writeln!(
                out,
                "<div style=\"flex:1;margin:10px;\"><iframe src=\"/results/{name}\" width=\"100%\" height=\"400px\" frameborder=\"0\"></iframe></div>"
            );
        }
        let _ = writeln!(out, "</div>");
    }

    let _ = writeln!(out, "</body></html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn write_all_artifacts(dir: &Path) {
        for name in charts::ARTIFACTS {
            std::fs::write(dir.join(name), format!("<html>{name}</html>")).unwrap();
        }
    }

    #[test]
    fn test_index_lays_out_six_frames() {
        let page = index_page("Dash");
        assert_eq!(page.matches("<iframe").count(), 6);
        assert!(page.contains("/results/knowledge_heatmap.html"));
        assert!(page.contains("/results/all_classes_timeline_tab.html"));
    }

    #[test]
    fn test_verify_artifacts_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(charts::HEATMAP_FILE), "x").unwrap();

        let err = verify_artifacts(dir.path()).unwrap_err().to_string();
        assert!(err.contains(charts::RADAR_FILE));
        assert!(!err.contains(charts::HEATMAP_FILE));

        write_all_artifacts(dir.path());
        assert!(verify_artifacts(dir.path()).is_ok());
    }

    #[tokio::test]
    async fn test_serves_index_and_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_all_artifacts(dir.path());
        let app = router(dir.path());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/results/network_graph.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<html>network_graph.html</html>");
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(dir.path())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
