//! Offset-based issue pagination.

use tracing::{debug, error};

use crate::error::TrackerError;
use crate::tracker::IssueTracker;

/// Page size for label classification runs.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Page size for complexity runs, which read a single page.
pub const COMPLEXITY_PAGE_SIZE: usize = 100;

/// Only the key is needed while listing.
const KEY_FIELDS: &[&str] = &["key"];

/// Configuration for issue pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    /// Issues requested per search call.
    pub page_size: usize,
    /// Stop after this many pages, if set.
    pub max_pages: Option<usize>,
}

impl PageConfig {
    /// Single page of `page_size` results.
    pub fn single(page_size: usize) -> Self {
        Self {
            page_size,
            max_pages: Some(1),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
        }
    }
}

/// Keys collected by a pagination run.
#[derive(Debug, Default)]
pub struct Pagination {
    /// Issue keys in tracker order.
    pub keys: Vec<String>,
    /// Search calls that returned a page.
    pub pages_fetched: usize,
    /// Error that cut pagination short, if any.
    pub interrupted: Option<TrackerError>,
}

impl Pagination {
    /// Whether the very first page failed, leaving nothing to process.
    pub fn failed_outright(&self) -> bool {
        self.keys.is_empty() && self.interrupted.is_some()
    }
}

/// Fetches every issue key matching a query, page by page.
pub struct Paginator<'a> {
    tracker: &'a dyn IssueTracker,
    config: PageConfig,
}

impl<'a> Paginator<'a> {
    pub fn new(tracker: &'a dyn IssueTracker, config: PageConfig) -> Self {
        Self { tracker, config }
    }

    /// Collect all keys for `query`.
    ///
    /// Stops on an empty page, on a short page (after keeping it), or when the
    /// page cap is reached. A failed page is logged and ends pagination with
    /// whatever was gathered so far.
    pub async fn collect_keys(&self, query: &str) -> Pagination {
        let page_size = self.config.page_size;
        let mut result = Pagination::default();
        let mut start_at = 0;

        loop {
            let page = match self
                .tracker
                .search(query, start_at, page_size, Some(KEY_FIELDS))
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    error!(start_at, error = %e, "Failed to fetch issue page");
                    result.interrupted = Some(e);
                    break;
                }
            };

            result.pages_fetched += 1;
            let returned = page.len();
            debug!(start_at, returned, "Fetched issue page");

            if returned == 0 {
                break;
            }
            result.keys.extend(page.into_iter().map(|issue| issue.key));

            if returned < page_size {
                break;
            }
            if self
                .config
                .max_pages
                .is_some_and(|max| result.pages_fetched >= max)
            {
                break;
            }
            start_at += page_size;
        }

        result
    }
}
