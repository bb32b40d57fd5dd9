use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::json;

use page_thumbs_api::{AppConfig, ThumbnailParams, ThumbnailReport, ThumbnailResolver};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let resolver = Arc::new(
        ThumbnailResolver::new(config.resolver.clone()).expect("failed to build HTTP client"),
    );

    let app = Router::new()
        .route("/health", get(health))
        .route("/thumbnails", get(thumbnails_endpoint))
        .route("/preview", get(preview_endpoint))
        .with_state(resolver);

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Machine mode. Always answers HTTP 200: failures are described inside the
/// payload via `useDefaultThumb` and the diagnostics array, never as
/// protocol-level errors.
async fn thumbnails_endpoint(
    State(resolver): State<Arc<ThumbnailResolver>>,
    Query(params): Query<ThumbnailParams>,
) -> Json<ThumbnailReport> {
    tracing::info!(page_url = ?params.page_url, "thumbnail request");
    Json(resolver.resolve(params.page_url.as_deref()).await)
}

/// Demonstration mode: the same report, rendered as a browsable page with
/// the originals and their thumbnails inlined.
async fn preview_endpoint(
    State(resolver): State<Arc<ThumbnailResolver>>,
    Query(params): Query<ThumbnailParams>,
) -> Html<String> {
    let report = resolver.resolve(params.page_url.as_deref()).await;
    Html(render_preview(&report))
}

fn render_preview(report: &ThumbnailReport) -> String {
    let mut page = String::from(
        "<!doctype html><html><head><title>thumbnail preview</title></head><body>",
    );
    page.push_str("<h1>Thumbnail report</h1><pre>");
    page.push_str(&serde_json::to_string_pretty(report).unwrap_or_default());
    page.push_str("</pre>");

    if report.image_urls.is_empty() {
        page.push_str("<p>No images found.</p>");
    } else {
        page.push_str("<h2>Originals and thumbnails</h2>");
        for (idx, original) in report.image_urls.iter().enumerate() {
            page.push_str(&format!(
                "<p>Image {n} as discovered:</p><img src=\"{original}\">",
                n = idx + 1
            ));
            if let Some(thumb) = report.thumbnails.get(idx) {
                page.push_str(&format!(
                    "<p>Image {n} cropped and thumbed:</p><img src=\"{thumb}\">",
                    n = idx + 1
                ));
            }
        }
    }

    page.push_str("</body></html>");
    page
}
