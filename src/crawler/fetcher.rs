//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the shared HTTP client with a proper user agent string
//! - GET requests returning the page body
//! - Classifying failures (transport error vs. unexpected status)
//!
//! Every failure here is fatal to the harvest; nothing is retried.

use crate::config::{ScraperConfig, UserAgentConfig};
use crate::HarvestError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `scraper` - Scraper configuration (request timeout)
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use job_harvester::config::{ScraperConfig, UserAgentConfig};
/// use job_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    scraper: &ScraperConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(scraper.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent header: `CrawlerName/Version`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!("{}/{}", config.crawler_name, config.crawler_version)
}

/// Fetches a page and returns its body
///
/// # Request Flow
///
/// | Condition | Result |
/// |-----------|--------|
/// | Transport failure (DNS, connect, timeout, TLS) | `HarvestError::Http` |
/// | Any status other than 200 | `HarvestError::Status` |
/// | Body cannot be read | `HarvestError::Http` |
/// | HTTP 200 | `Ok(body)` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_document(client: &Client, url: &Url) -> Result<String, HarvestError> {
    tracing::info!("Requesting {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        tracing::error!("Request to {} failed with status {}", url, status);
        return Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })?;

    tracing::debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body)
}
