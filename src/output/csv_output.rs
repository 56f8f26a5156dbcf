//! CSV export of harvested job records
//!
//! The header is written first. Each record is then bound into a row by its
//! own task, and rows are written as soon as every earlier row is out.

use crate::config::OutputConfig;
use crate::crawler::FanOut;
use crate::model::JobRecord;
use crate::url::detail_url;
use crate::HarvestError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Column names of the export
pub const HEADER: [&str; 5] = ["ID", "Title", "Company", "Location", "Summary"];

/// One CSV row, in `HEADER` order
pub type Row = [String; 5];

/// Binds a job record into a CSV row
///
/// The ID column holds the listing's detail page URL. The title cell gets one
/// leading space when `title_leading_space` is set.
///
/// # Examples
///
/// ```
/// use job_harvester::config::OutputConfig;
/// use job_harvester::model::JobRecord;
/// use job_harvester::output::bind_row;
///
/// let output = OutputConfig::default();
/// let job = JobRecord { id: "abc123".into(), title: "Dev".into(), ..Default::default() };
/// let row = bind_row(&job, &output);
/// assert!(row[0].ends_with("abc123&advn=1729840185424618"));
/// assert_eq!(row[1], " Dev");
/// ```
pub fn bind_row(job: &JobRecord, output: &OutputConfig) -> Row {
    let title = if output.title_leading_space {
        format!(" {}", job.title)
    } else {
        job.title.clone()
    };

    [
        detail_url(&output.detail_url_prefix, &job.id, &output.detail_url_suffix),
        title,
        job.company.clone(),
        job.location.clone(),
        job.summary.clone(),
    ]
}

/// Writes the records to a new CSV file at `path`
///
/// # Arguments
///
/// * `jobs` - The merged record collection
/// * `path` - Output file, created or truncated
/// * `output` - Row binding settings
/// * `limit` - Maximum number of row binding tasks running at once
///
/// # Returns
///
/// * `Ok(usize)` - Number of data rows written
/// * `Err(HarvestError)` - File creation or a write failed
pub async fn write_jobs(
    jobs: &[JobRecord],
    path: &Path,
    output: &OutputConfig,
    limit: usize,
) -> Result<usize, HarvestError> {
    let file = File::create(path)?;
    let written = write_jobs_to(jobs, file, output, limit).await?;

    tracing::debug!("Wrote {} rows to {}", written, path.display());
    Ok(written)
}

/// Writes the header and one row per record to `sink`, flushing before returning
pub async fn write_jobs_to<W: Write>(
    jobs: &[JobRecord],
    sink: W,
    output: &OutputConfig,
    limit: usize,
) -> Result<usize, HarvestError> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(HEADER)?;

    let output = Arc::new(output.clone());
    let mut rows = FanOut::spawn(jobs.to_vec(), limit, |_, job| {
        let output = Arc::clone(&output);
        async move { Ok(bind_row(&job, &output)) }
    });

    // Rows that arrived ahead of an earlier one wait here
    let mut pending: BTreeMap<usize, Row> = BTreeMap::new();
    let mut next = 0;

    while let Some(report) = rows.next().await {
        let (index, row) = report?;
        pending.insert(index, row);

        if index != next {
            tracing::trace!(
                "Row {} buffered while waiting for row {} ({} still binding)",
                index,
                next,
                rows.remaining()
            );
        }

        while let Some(row) = pending.remove(&next) {
            writer.write_record(&row)?;
            next += 1;
        }
    }

    writer.flush()?;
    Ok(next)
}
