//! Output module for exporting harvest results
//!
//! This module handles:
//! - Writing job records to CSV
//! - Recording and printing harvest statistics

mod csv_output;
pub mod stats;

pub use csv_output::{bind_row, write_jobs, write_jobs_to, Row, HEADER};
pub use stats::{print_statistics, HarvestStatistics};
