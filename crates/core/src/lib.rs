//! Core types and shared functionality for casefinder.
//!
//! This crate provides:
//! - Semi-structured raw record trees (`RawNode`) and their path selector
//! - Response cache and case-item store with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod case;
pub mod config;
pub mod error;
pub mod tree;

pub use cache::{CachedPayload, StoreDb};
pub use case::CaseItemSets;
pub use config::AppConfig;
pub use error::Error;
pub use tree::RawNode;
