//! URL handling module for Job-Harvester
//!
//! This module builds the two kinds of URLs the harvester deals with:
//! - Results page URLs (base listing URL plus a page offset parameter)
//! - Detail page URLs written into the ID column of the export

use crate::{UrlError, UrlResult};
use url::Url;

/// Query parameter carrying the listing offset of a results page
pub const START_PARAM: &str = "start";

/// Builds the URL of a results page
///
/// The page offset (`index * page_size`) is appended as a `start` query
/// parameter, keeping every parameter already present on the base URL.
///
/// # Arguments
///
/// * `base_url` - The listing URL without an offset
/// * `index` - Zero-based page index
/// * `page_size` - Number of listings per page
///
/// # Returns
///
/// * `Ok(Url)` - The results page URL
/// * `Err(UrlError)` - The base URL is not a valid http(s) URL, or the
///   offset does not fit in a `usize`
///
/// # Examples
///
/// ```
/// use job_harvester::url::page_url;
///
/// let url = page_url("https://jobs.example.com/jobs?q=python&limit=50", 2, 50).unwrap();
/// assert_eq!(url.as_str(), "https://jobs.example.com/jobs?q=python&limit=50&start=100");
/// ```
pub fn page_url(base_url: &str, index: usize, page_size: usize) -> UrlResult<Url> {
    let mut url = parse_base_url(base_url)?;
    let offset = index
        .checked_mul(page_size)
        .ok_or(UrlError::OffsetOverflow { index, page_size })?;

    url.query_pairs_mut()
        .append_pair(START_PARAM, &offset.to_string());

    Ok(url)
}

/// Parses the base listing URL, requiring an http(s) scheme
pub fn parse_base_url(base_url: &str) -> UrlResult<Url> {
    let url = Url::parse(base_url).map_err(|e| UrlError::Parse(format!("{}: {}", base_url, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase(base_url.to_string()));
    }

    Ok(url)
}

/// Builds the detail page URL for a listing
///
/// The identifier is inserted verbatim between the prefix and suffix. The
/// prefix already carries its own percent-encoded path and query text.
///
/// # Examples
///
/// ```
/// use job_harvester::url::detail_url;
///
/// let url = detail_url("https://jobs.example.com/view?jk=", "abc123", "&from=list");
/// assert_eq!(url, "https://jobs.example.com/view?jk=abc123&from=list");
/// ```
pub fn detail_url(prefix: &str, id: &str, suffix: &str) -> String {
    let mut url = String::with_capacity(prefix.len() + id.len() + suffix.len());
    url.push_str(prefix);
    url.push_str(id);
    url.push_str(suffix);
    url
}
