//! zoowatch Core
//!
//! Core types and utilities shared across zoowatch components.
//!
//! This crate provides:
//! - The classification result handed from the classifier to the event handler
//! - Knowledge-base search hits consumed by the lookup classifier
//! - The chat message shape the event handler moderates
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Author, ClassificationResult, IncomingMessage, SearchHit};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Author, ClassificationResult, IncomingMessage, SearchHit};
}
