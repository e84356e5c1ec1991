//! CoCon Vote Monitor
//!
//! Live vote-tally board for CoCon conference rooms.
//!
//! # Features
//!
//! - **Snapshot server**: follows CoCon notifications and pushes full board
//!   snapshots to every display over `/ws`
//! - **Renderer**: maps a snapshot onto the board (titles, vote columns,
//!   YES/ABST/NO counters, results footer)
//! - **Auto-print**: one print per closed vote, opt out with `/noautoprint`
//!
//! # Modules
//!
//! - `types`: Snapshot and CoCon data structures
//! - `tally`: folds CoCon notifications into a snapshot
//! - `cocon`: REST client and background worker
//! - `render`: renderer, in-memory board document, printers
//! - `display`: WebSocket connection listener for displays
//! - `api`: HTTP and WebSocket endpoints
//! - `config`: environment configuration
//! - `utils`: time formatting
//!
//! # Example
//!
//! ```
//! use vote_monitor::render::{CountingPrinter, Document, DomView, Renderer, ViewField};
//! use vote_monitor::types::{Snapshot, VoteOption};
//!
//! let view = DomView::attach(Document::vote_board()).unwrap();
//! let mut renderer = Renderer::new(view, CountingPrinter::default(), true);
//!
//! let snapshot = Snapshot::from_json(r#"{"counts":{"YES":3},"voting_state":"Stop"}"#).unwrap();
//! renderer.render(&snapshot);
//!
//! assert_eq!(renderer.view().text_of(ViewField::Counter(VoteOption::Yes)), "3");
//! assert_eq!(renderer.printer().calls, 1);
//! ```

pub mod api;
pub mod cocon;
pub mod config;
pub mod display;
pub mod error;
pub mod render;
pub mod tally;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{DisplayArgs, DisplayConfig, MonitorConfig};
pub use error::{MonitorError, MonitorResult};
pub use render::Renderer;
pub use tally::VoteTally;
pub use types::{Counts, Snapshot, VoteEntry, VoteOption};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
