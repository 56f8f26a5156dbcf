//! Data model for harvested job listings
//!
//! # Components
//!
//! - `JobRecord`: One listing extracted from a results page
//! - `PageTask`: The records a single results page yielded

mod job;

// Re-export main types
pub use job::{JobRecord, PageTask};
