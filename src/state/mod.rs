//! Crawl state tracking
//!
//! The link registry is the single source of truth for "what is known"
//! and "what is done" during a crawl, and the only mutable structure
//! shared between workers.

mod registry;

pub use registry::{LinkRegistry, LinkState};
