use serde::Deserialize;

/// Main configuration structure for Job-Harvester
///
/// Every section is optional; a missing section or key takes the value the
/// harvester ships with (see the `Default` impls below).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

/// Listing site and concurrency configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Listing URL without the page offset parameter
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of listings the site returns per page
    #[serde(rename = "page-size")]
    pub page_size: usize,

    /// Maximum number of result pages fetched at once
    #[serde(rename = "max-concurrent-pages")]
    pub max_concurrent_pages: usize,

    /// Maximum number of card extraction / row binding tasks running at once
    #[serde(rename = "max-concurrent-tasks")]
    pub max_concurrent_tasks: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://kr.indeed.com/jobs?q=python&limit=50".to_string(),
            page_size: 50,
            max_concurrent_pages: 16,
            max_concurrent_tasks: 64,
            request_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// CSS selectors locating listing data in a results page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One listing card
    pub card: String,

    /// Pagination control container
    pub pagination: String,

    /// Navigable link inside the pagination container
    #[serde(rename = "page-link")]
    pub page_link: String,

    /// Attribute on the card holding the listing identifier
    #[serde(rename = "id-attribute")]
    pub id_attribute: String,

    pub title: String,
    pub company: String,
    pub location: String,
    pub summary: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: ".sponTapItem".to_string(),
            pagination: ".pagination".to_string(),
            page_link: "a".to_string(),
            id_attribute: "data-jk".to_string(),
            title: ".jobTitle>span".to_string(),
            company: ".companyName".to_string(),
            location: ".companyLocation".to_string(),
            summary: ".job-snippet".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file
    pub path: String,

    /// Detail page URL up to the listing identifier
    #[serde(rename = "detail-url-prefix")]
    pub detail_url_prefix: String,

    /// Fixed parameters appended after the listing identifier
    #[serde(rename = "detail-url-suffix")]
    pub detail_url_suffix: String,

    /// Prefix the title cell with one space, as earlier exports did
    #[serde(rename = "title-leading-space")]
    pub title_leading_space: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "jobs.csv".to_string(),
            detail_url_prefix: "https://kr.indeed.com/%EC%B7%A8%EC%97%85?q=python&vjk=".to_string(),
            detail_url_suffix: "&advn=1729840185424618".to_string(),
            title_leading_space: true,
        }
    }
}
