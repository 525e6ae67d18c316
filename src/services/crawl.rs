use crate::domain::{non_blank, split_candidates, validate_urls, ResultRecord};

use super::{ExtractionError, ExtractionService};

pub const EMPTY_SUBMISSION_MESSAGE: &str = "Please enter at least one URL";
pub const INVALID_URLS_MESSAGE: &str = "Invalid URL format detected. Please check your URLs.";
pub const NO_DATA_MESSAGE: &str = "No data found. Try different URLs.";

#[derive(Debug)]
pub enum CrawlOutcome {
    EmptySubmission,
    InvalidUrls,
    Failed(ExtractionError),
    NoData,
    Found(Vec<ResultRecord>),
}

impl CrawlOutcome {
    /// The inline error shown above the form, if this outcome is an error.
    pub fn error_message(&self) -> Option<String> {
        match self {
            CrawlOutcome::EmptySubmission => Some(EMPTY_SUBMISSION_MESSAGE.to_string()),
            CrawlOutcome::InvalidUrls => Some(INVALID_URLS_MESSAGE.to_string()),
            CrawlOutcome::Failed(e) => Some(format!("Error running crawler: {}", e)),
            CrawlOutcome::NoData | CrawlOutcome::Found(_) => None,
        }
    }
}

/// Runs one "Run Crawler" submission. Nothing reaches the extraction
/// service unless every non-blank line is a valid URL.
pub async fn run_crawl(service: &dyn ExtractionService, submitted: &str) -> CrawlOutcome {
    if submitted.trim().is_empty() {
        return CrawlOutcome::EmptySubmission;
    }

    let candidates = split_candidates(submitted);
    if !validate_urls(&candidates) {
        log::info!("Rejected submission with malformed urls");
        return CrawlOutcome::InvalidUrls;
    }

    let start_urls = non_blank(&candidates);
    match service.extract(&start_urls).await {
        Ok(records) if records.is_empty() => CrawlOutcome::NoData,
        Ok(records) => CrawlOutcome::Found(records),
        Err(e) => {
            log::error!("Extraction failed for {} urls: {}", start_urls.len(), e);
            CrawlOutcome::Failed(e)
        }
    }
}
