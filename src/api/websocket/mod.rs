//! WebSocket module for live vote boards
//!
//! Provides the `/ws` endpoint. Each client first receives the current
//! snapshot, then every snapshot the CoCon worker publishes.

pub mod handler;
pub mod state;

pub use handler::ws_handler;
pub use state::AppState;
