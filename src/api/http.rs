//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use super::page::render_page;
use super::websocket::{ws_handler, AppState};
use crate::types::Snapshot;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - boards may be embedded from other hosts
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Read-only board pages; `/noautoprint` is the URL `vote-display`
        // reads its print policy from, browsers get the same page
        .route("/", get(board_page))
        .route("/noautoprint", get(board_page))
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        .route("/api/snapshot", get(get_snapshot))
        // Health check
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

/// Current snapshot with the publish sequence number
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub data: Snapshot,
    pub sequence_id: u64,
}

async fn board_page(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.current().await;
    match render_page(&snapshot) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            log::error!("Failed to render board page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn get_snapshot(State(state): State<Arc<AppState>>) -> Json<SnapshotResponse> {
    Json(SnapshotResponse {
        data: state.current().await,
        sequence_id: state.current_sequence_id(),
    })
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn app_with(title: &str) -> Router {
        let state = Arc::new(AppState::new(Snapshot {
            title: Some(title.to_string()),
            ..Default::default()
        }));
        create_router(state)
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
    async fn test_health_check() {
        let (status, body) = get_body(app_with("ROOM 00"), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_board_pages() {
        for uri in ["/", "/noautoprint"] {
            let (status, body) = get_body(app_with("ROOM 07"), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.contains("<title>ROOM 07</title>"));
            assert!(body.contains("id=\"votes\""));
        }
    }

    #[tokio::test]
    async fn test_board_page_is_read_only() {
        let (_, root) = get_body(app_with("ROOM 07"), "/").await;
        let (_, opt_out) = get_body(app_with("ROOM 07"), "/noautoprint").await;
        assert_eq!(root, opt_out);
        assert!(!root.contains("<script"));
        assert!(root.contains(&format!("content=\"{}\"", crate::api::page::PAGE_REFRESH_SECS)));
    }

    #[tokio::test]
    async fn test_snapshot_endpoint() {
        let (status, body) = get_body(app_with("ROOM 00"), "/api/snapshot").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"]["title"], "ROOM 00");
        assert_eq!(json["sequence_id"], 0);
    }
}
