//! HTML parser for listing pages
//!
//! This module handles parsing results pages to extract:
//! - The number of navigable pages in the pagination control
//! - The listing cards on a page, as owned HTML fragments
//! - One `JobRecord` per listing card
//!
//! Parsed documents are not `Send`, so documents never outlive the
//! synchronous functions here. Concurrent extraction works on owned fragments.

use crate::config::{validate_selector, SelectorConfig};
use crate::model::JobRecord;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Compiled selectors used to locate listing data
#[derive(Debug, Clone)]
pub struct Selectors {
    pub card: Selector,
    pub pagination: Selector,
    pub page_link: Selector,
    pub title: Selector,
    pub company: Selector,
    pub location: Selector,
    pub summary: Selector,
    pub id_attribute: String,
}

impl Selectors {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(Selectors)` - Every selector compiled
    /// * `Err(ConfigError)` - A selector is not valid CSS
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            card: validate_selector(&config.card)?,
            pagination: validate_selector(&config.pagination)?,
            page_link: validate_selector(&config.page_link)?,
            title: validate_selector(&config.title)?,
            company: validate_selector(&config.company)?,
            location: validate_selector(&config.location)?,
            summary: validate_selector(&config.summary)?,
            id_attribute: config.id_attribute.trim().to_string(),
        })
    }
}

/// Collapses every run of whitespace to a single space and trims both ends
///
/// # Examples
///
/// ```
/// use job_harvester::crawler::normalize_text;
///
/// assert_eq!(normalize_text("  Senior\n\t Rust   Engineer "), "Senior Rust Engineer");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Counts the navigable page links in the pagination control
///
/// When the document holds several pagination containers the last one wins.
/// A document without one has zero pages.
///
/// # Arguments
///
/// * `html` - The results page HTML
/// * `selectors` - Compiled selectors
///
/// # Returns
///
/// The number of page links found
pub fn count_pages(html: &str, selectors: &Selectors) -> usize {
    let document = Html::parse_document(html);

    document
        .select(&selectors.pagination)
        .last()
        .map(|container| container.select(&selectors.page_link).count())
        .unwrap_or(0)
}

/// Serializes every listing card of a page into an owned HTML fragment
///
/// Fragments are returned in document order.
pub fn card_fragments(html: &str, selectors: &Selectors) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.card)
        .map(|card| card.html())
        .collect()
}

/// Extracts one job record from a listing card
///
/// Every lookup is best-effort: a missing attribute or element leaves the
/// corresponding field empty.
pub fn extract_job(card: &ElementRef, selectors: &Selectors) -> JobRecord {
    let id = card
        .value()
        .attr(&selectors.id_attribute)
        .unwrap_or("")
        .trim()
        .to_string();

    JobRecord {
        id,
        title: select_text(card, &selectors.title),
        company: select_text(card, &selectors.company),
        location: select_text(card, &selectors.location),
        summary: select_text(card, &selectors.summary),
    }
}

/// Parses a card fragment produced by `card_fragments` and extracts its record
pub fn extract_job_from_fragment(fragment: &str, selectors: &Selectors) -> JobRecord {
    let html = Html::parse_fragment(fragment);

    // Fragment parsing wraps the card in an <html> root; the card is its first
    // element child. The card selector may depend on ancestors the fragment
    // no longer has, so it is not matched again here.
    let root = html.root_element();
    let card = root.children().find_map(ElementRef::wrap).unwrap_or(root);

    extract_job(&card, selectors)
}

/// Text of every element matching `selector` under `card`, normalized
fn select_text(card: &ElementRef, selector: &Selector) -> String {
    let text = card
        .select(selector)
        .map(|element| element.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    normalize_text(&text)
}
