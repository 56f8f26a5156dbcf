//! Harvest run statistics
//!
//! This module holds the figures a finished harvest reports and prints
//! them for the command line.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Harvest statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    /// When the harvest started
    pub started_at: DateTime<Utc>,

    /// When the output file was flushed
    pub finished_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Number of results pages fetched
    pub pages: usize,

    /// Record count of each page, by page index
    pub records_per_page: Vec<usize>,

    /// Total number of records collected
    pub total_records: usize,

    /// Number of data rows written to the output file
    pub rows_written: usize,

    /// Path of the output file
    pub output_path: String,
}

impl HarvestStatistics {
    /// Average number of records per page
    pub fn average_per_page(&self) -> f64 {
        if self.pages == 0 {
            return 0.0;
        }
        self.total_records as f64 / self.pages as f64
    }

    /// Returns true if every collected record made it into the output
    pub fn is_complete(&self) -> bool {
        self.rows_written == self.total_records
            && self.records_per_page.iter().sum::<usize>() == self.total_records
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Finished: {}", stats.finished_at.to_rfc3339());
    println!("  Duration: {:.2}s", stats.elapsed.as_secs_f64());
    println!();

    println!("Overview:");
    println!("  Pages fetched: {}", stats.pages);
    println!("  Records collected: {}", stats.total_records);
    println!("  Average per page: {:.1}", stats.average_per_page());
    println!("  Rows written: {} -> {}", stats.rows_written, stats.output_path);
    println!();

    if !stats.records_per_page.is_empty() {
        println!("Records by Page:");
        for (index, count) in stats.records_per_page.iter().enumerate() {
            println!("  Page {}: {}", index, count);
        }
        println!();
    }
}
