//! Data layer for the pattern tracker.
//!
//! Responsible for loading and persisting the tracker document, scanning the
//! session archive for pattern contexts, and merging new frequency
//! observations into the persisted state.

pub mod merger;
pub mod scanner;
pub mod store;

pub use tracker_core as core;
