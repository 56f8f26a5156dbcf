//! Job record definitions
//!
//! A `JobRecord` is built once by the extractor and only borrowed afterwards.

/// One job listing extracted from a listing card
///
/// Every field is plain text. A field the extractor could not find is an
/// empty string, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRecord {
    /// Site-assigned listing identifier (raw attribute value)
    pub id: String,

    /// Job title (whitespace-normalized)
    pub title: String,

    /// Hiring company (whitespace-normalized)
    pub company: String,

    /// Job location (whitespace-normalized)
    pub location: String,

    /// Listing snippet (whitespace-normalized)
    pub summary: String,
}

impl JobRecord {
    /// Returns true if extraction found nothing at all for this card
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
            && self.title.is_empty()
            && self.company.is_empty()
            && self.location.is_empty()
            && self.summary.is_empty()
    }
}

/// The records yielded by one results page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTask {
    /// Zero-based page index
    pub index: usize,

    /// Records in card order
    pub jobs: Vec<JobRecord>,
}

impl PageTask {
    /// Creates an empty task for the given page index
    pub fn new(index: usize) -> Self {
        Self {
            index,
            jobs: Vec::new(),
        }
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if the page yielded no records
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
