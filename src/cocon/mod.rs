//! CoCon room-server integration: REST client and the tally worker

pub mod client;
pub mod worker;

pub use client::{CoconClient, Model};
