//! SQLite-backed store for vendor query responses and case items.
//!
//! This module provides a persistent cache using SQLite with async access
//! via tokio-rusqlite. It supports:
//!
//! - Type-tagged payloads (tree, JSON, text, opaque binary)
//! - Upsert-only writes keyed by `(source, query)`
//! - Time-to-live filtering on reads, with expired-row purging
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod migrations;
pub mod payload;
pub mod responses;

pub use crate::Error;

pub use connection::StoreDb;
pub use payload::CachedPayload;
pub use responses::{CachedResponseMeta, DEFAULT_TTL_SECONDS};
