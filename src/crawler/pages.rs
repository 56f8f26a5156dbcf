//! Results page processing
//!
//! - Page-count discovery from the pagination control of the base URL
//! - Fetching one results page and extracting all of its cards concurrently

use crate::config::Config;
use crate::crawler::fetcher::fetch_document;
use crate::crawler::parser::{card_fragments, count_pages, extract_job_from_fragment, Selectors};
use crate::crawler::scheduler::fan_out;
use crate::model::{JobRecord, PageTask};
use crate::url::{page_url, parse_base_url};
use crate::HarvestError;
use reqwest::Client;
use std::sync::Arc;

/// Read-only settings shared by every page task
#[derive(Debug, Clone)]
pub struct HarvestContext {
    /// Listing URL without the page offset parameter
    pub base_url: String,

    /// Listings per page
    pub page_size: usize,

    /// Maximum number of card extraction tasks running at once
    pub max_concurrent_tasks: usize,

    /// Compiled selectors
    pub selectors: Arc<Selectors>,
}

impl HarvestContext {
    /// Builds the context from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        Ok(Self {
            base_url: config.scraper.base_url.clone(),
            page_size: config.scraper.page_size,
            max_concurrent_tasks: config.scraper.max_concurrent_tasks,
            selectors: Arc::new(Selectors::from_config(&config.selectors)?),
        })
    }
}

/// Discovers how many results pages the listing has
///
/// Fetches the bare base URL and counts the links of its pagination control.
///
/// # Returns
///
/// * `Ok(usize)` - Number of pages (0 when there is no pagination control)
/// * `Err(HarvestError)` - The base URL could not be fetched
pub async fn discover_page_count(client: &Client, context: &HarvestContext) -> Result<usize, HarvestError> {
    let url = parse_base_url(&context.base_url)?;
    let body = fetch_document(client, &url).await?;

    let pages = count_pages(&body, &context.selectors);
    tracing::info!("Discovered {} result pages", pages);

    Ok(pages)
}

/// Fetches one results page and extracts every listing card on it
///
/// Cards are extracted concurrently; the returned records keep the order
/// of the cards in the page.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `context` - Shared harvest settings
/// * `index` - Zero-based page index
///
/// # Returns
///
/// * `Ok(PageTask)` - The page's records
/// * `Err(HarvestError)` - The page could not be fetched
pub async fn fetch_page(
    client: &Client,
    context: &HarvestContext,
    index: usize,
) -> Result<PageTask, HarvestError> {
    let url = page_url(&context.base_url, index, context.page_size)?;
    let body = fetch_document(client, &url).await?;

    let fragments = card_fragments(&body, &context.selectors);
    tracing::debug!("Page {} has {} listing cards", index, fragments.len());

    let mut task = PageTask::new(index);
    task.jobs = fan_out(fragments, context.max_concurrent_tasks, |_, fragment| {
        let selectors = Arc::clone(&context.selectors);
        async move { Ok(extract_job_from_fragment(&fragment, &selectors)) }
    })
    .await?;

    let blank = count_blank(&task.jobs);
    if blank > 0 {
        tracing::warn!(
            "Page {}: {} of {} cards matched none of the field selectors",
            index,
            blank,
            task.len()
        );
    }

    Ok(task)
}

/// Number of records for which extraction found nothing at all
fn count_blank(jobs: &[JobRecord]) -> usize {
    jobs.iter().filter(|job| job.is_empty()).count()
}
