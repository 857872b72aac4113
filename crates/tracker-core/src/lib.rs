//! Shared foundation for the pattern tracker.
//!
//! Holds the persisted tracker data model, the error type used across all
//! tracker crates, and CLI settings / path resolution.

pub mod error;
pub mod models;
pub mod settings;
