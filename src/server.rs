use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{extract::State, response::Html, routing::get, Router};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::render;

/// Routes for the two display modes
pub fn create_router(pages: watch::Receiver<String>) -> Router {
    Router::new()
        .route("/", get(live_page))
        .route("/historical", get(historical_page))
        .with_state(pages)
}

/// GET / - latest rendered live page
async fn live_page(State(pages): State<watch::Receiver<String>>) -> Html<String> {
    Html(pages.borrow().clone())
}

/// GET /historical - coming soon
async fn historical_page() -> Html<String> {
    Html(render::render_historical_page())
}

/// Serve the dashboard until the token is cancelled
pub async fn serve(
    addr: SocketAddr,
    pages: watch::Receiver<String>,
    cancel: CancellationToken,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard on {}", addr))?;

    info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, create_router(pages))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("Dashboard server failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_body(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_live_page_serves_latest() {
        let (tx, rx) = watch::channel("first".to_string());
        let router = create_router(rx);

        let (status, body) = get_body(router.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "first");

        tx.send_replace("second".to_string());
        let (_, body) = get_body(router, "/").await;
        assert_eq!(body, "second");
    }

    #[tokio::test]
    async fn test_historical_and_unknown_routes() {
        let (_tx, rx) = watch::channel(String::new());
        let router = create_router(rx);

        let (status, body) = get_body(router.clone(), "/historical").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Coming Soon"));

        let (status, _) = get_body(router, "/api/odds").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
