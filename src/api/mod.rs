//! API module for HTTP and WebSocket endpoints
//!
//! Serves the vote board page, the `/ws` snapshot stream and a JSON view of
//! the current snapshot.

pub mod http;
pub mod page;
pub mod websocket;

pub use http::create_router;
pub use websocket::AppState;
