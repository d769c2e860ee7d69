//! Adapters Layer
//!
//! Inbound adapters drive the application (HTTP API); outbound adapters
//! implement the domain ports (SQLite store, ipstack, system resolver).

pub mod inbound;
pub mod outbound;
