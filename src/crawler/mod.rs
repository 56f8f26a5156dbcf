//! Crawler module for listing page fetching and processing
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with status validation
//! - HTML parsing and job record extraction
//! - Bounded concurrent fan-out with deterministic fan-in
//! - Overall pipeline coordination

mod coordinator;
mod fetcher;
mod pages;
mod parser;
mod scheduler;

pub use coordinator::{merge_pages, run_harvest, Harvester};
pub use fetcher::{build_http_client, fetch_document, user_agent_string};
pub use pages::{discover_page_count, fetch_page, HarvestContext};
pub use parser::{
    card_fragments, count_pages, extract_job, extract_job_from_fragment, normalize_text, Selectors,
};
pub use scheduler::{fan_out, FanOut};
