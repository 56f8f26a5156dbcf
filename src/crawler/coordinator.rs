//! Harvest coordinator - main pipeline orchestration logic
//!
//! This module wires the stages of a harvest together:
//! - Discovering the number of results pages (once)
//! - Fetching every page concurrently
//! - Merging per-page records into one ordered collection
//! - Handing the collection to the CSV writer
//!
//! Any fetch failure aborts the harvest before the output file is created.

use crate::config::{validate, Config};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::pages::{discover_page_count, fetch_page, HarvestContext};
use crate::crawler::scheduler::fan_out;
use crate::model::{JobRecord, PageTask};
use crate::output::{write_jobs, HarvestStatistics};
use crate::HarvestError;
use chrono::Utc;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Main harvest coordinator structure
pub struct Harvester {
    config: Arc<Config>,
    context: Arc<HarvestContext>,
    client: Client,
}

impl Harvester {
    /// Creates a new harvester instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Successfully created harvester
    /// * `Err(HarvestError)` - The configuration is invalid or the HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        validate(&config)?;
        let client = build_http_client(&config.scraper, &config.user_agent)?;
        Self::assemble(config, client)
    }

    /// Creates a harvester that sends its requests through `client`
    ///
    /// The configuration is validated exactly as in [`Harvester::new`].
    pub fn with_client(config: Config, client: Client) -> Result<Self, HarvestError> {
        validate(&config)?;
        Self::assemble(config, client)
    }

    fn assemble(config: Config, client: Client) -> Result<Self, HarvestError> {
        let context = HarvestContext::from_config(&config)?;

        Ok(Self {
            config: Arc::new(config),
            context: Arc::new(context),
            client,
        })
    }

    /// The configuration this harvester runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discovers the page count and fetches every page concurrently
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<PageTask>)` - One task per page, ordered by page index
    /// * `Err(HarvestError)` - The first fetch that failed
    pub async fn collect_pages(&self) -> Result<Vec<PageTask>, HarvestError> {
        let page_count = discover_page_count(&self.client, &self.context).await?;
        let indices: Vec<usize> = (0..page_count).collect();

        fan_out(indices, self.config.scraper.max_concurrent_pages, |_, index| {
            let client = self.client.clone();
            let context = Arc::clone(&self.context);
            async move { fetch_page(&client, &context, index).await }
        })
        .await
    }

    /// Collects every job record of the listing, in page then card order
    pub async fn collect(&self) -> Result<Vec<JobRecord>, HarvestError> {
        let pages = self.collect_pages().await?;
        Ok(merge_pages(pages))
    }

    /// Runs the full harvest, writing the CSV to the configured output path
    pub async fn run(&self) -> Result<HarvestStatistics, HarvestError> {
        let path = self.config.output.path.clone();
        self.run_to(Path::new(&path)).await
    }

    /// Runs the full harvest, writing the CSV to `path`
    ///
    /// # Pipeline
    ///
    /// 1. Fetch the base URL and count pagination links
    /// 2. Fetch every page concurrently, extracting cards concurrently
    /// 3. Merge per-page records in page order
    /// 4. Write header and rows to `path`
    ///
    /// The output file is only created once every page has been fetched.
    pub async fn run_to(&self, path: &Path) -> Result<HarvestStatistics, HarvestError> {
        let started_at = Utc::now();
        let start_time = Instant::now();

        tracing::info!("Starting harvest of {}", self.context.base_url);

        let pages = self.collect_pages().await?;
        let records_per_page: Vec<usize> = pages.iter().map(PageTask::len).collect();
        for (index, count) in records_per_page.iter().enumerate() {
            tracing::debug!("Page {} yielded {} records", index, count);
        }

        let jobs = merge_pages(pages);
        tracing::info!(
            "Collected {} records from {} pages",
            jobs.len(),
            records_per_page.len()
        );

        let rows_written = write_jobs(
            &jobs,
            path,
            &self.config.output,
            self.config.scraper.max_concurrent_tasks,
        )
        .await?;

        let stats = HarvestStatistics {
            started_at,
            finished_at: Utc::now(),
            elapsed: start_time.elapsed(),
            pages: records_per_page.len(),
            records_per_page,
            total_records: jobs.len(),
            rows_written,
            output_path: path.display().to_string(),
        };

        tracing::info!(
            "Harvest completed: {} rows written to {} in {:?}",
            stats.rows_written,
            stats.output_path,
            stats.elapsed
        );

        Ok(stats)
    }
}

/// Flattens per-page records into one collection, in page index order
pub fn merge_pages(mut pages: Vec<PageTask>) -> Vec<JobRecord> {
    pages.sort_by_key(|page| page.index);

    let total = pages.iter().map(PageTask::len).sum();
    let mut jobs = Vec::with_capacity(total);
    for page in pages {
        jobs.extend(page.jobs);
    }
    jobs
}

/// Runs a complete harvest with the given configuration
///
/// # Example
///
/// ```no_run
/// use job_harvester::config::Config;
/// use job_harvester::crawler::run_harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = run_harvest(Config::default()).await?;
/// println!("Done, extracted {}", stats.total_records);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config) -> Result<HarvestStatistics, HarvestError> {
    let harvester = Harvester::new(config)?;
    harvester.run().await
}
