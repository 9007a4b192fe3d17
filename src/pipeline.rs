//! Pipeline orchestration: catalog in, digest file out.
//!
//! Each configured feed moves through fetch then parse; a failure at either
//! stage collapses to an empty result for that feed and the run continues.
//! Feeds are processed concurrently with a bounded pool, but fan-in uses an
//! ordered buffer so digest sections always follow catalog order, never
//! completion order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use thiserror::Error;

use crate::catalog::{FeedSource, SourceCatalog};
use crate::digest::{Digest, FeedError, FeedResult};
use crate::feed::{self, DEFAULT_TIMEOUT};

/// Name of the digest file inside the destination directory.
pub const DIGEST_FILE_NAME: &str = "news.md";

/// Upper bound on feeds fetched at the same time. `concurrency = 1` gives a
/// strictly sequential run.
const DEFAULT_CONCURRENCY: usize = 4;

/// Errors that abort the whole run.
///
/// Per-feed failures never appear here; they are absorbed into empty digest
/// sections. What remains fatal is failing to set up the HTTP client and
/// failing to write the digest, since the output file is the run's purpose.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to write digest: {0}")]
    Io(#[from] std::io::Error),
}

/// Tunables for a pipeline run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Per-feed fetch timeout.
    pub timeout: Duration,
    /// Declared recency limit in days. Accepted but not applied; see
    /// [`run`].
    pub limit_days: u32,
    /// Maximum concurrent fetches.
    pub concurrency: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            limit_days: 1,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Processes every feed in `catalog` and writes the rendered digest to
/// `<destination_dir>/news.md`, returning the digest path.
///
/// `options.limit_days` is carried through the run but applies no filter:
/// every extracted entry is kept regardless of age.
///
/// # Errors
///
/// Only run-level failures surface as [`PipelineError`]; an individual
/// feed's fetch or parse failure is logged and rendered as an empty
/// section.
pub async fn run(
    catalog: SourceCatalog,
    destination_dir: &Path,
    options: &Options,
) -> Result<PathBuf, PipelineError> {
    let client = feed::build_client(options.timeout)?;
    let timeout = options.timeout;

    tracing::info!(
        feeds = catalog.len(),
        limit_days = options.limit_days,
        "Starting digest run"
    );

    // Ordered fan-in: buffered (not buffer_unordered) keeps catalog order
    let results: Vec<FeedResult> = stream::iter(catalog)
        .map(|source| {
            let client = client.clone();
            async move { process_feed(&client, source, timeout).await }
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    // TODO: apply limit_days here once the recency semantics are pinned
    // down (which entry date field to compare, and in what timezone).
    let digest = Digest::assemble(results, Utc::now());
    let path = destination_dir.join(DIGEST_FILE_NAME);
    digest.persist(&path).await?;

    tracing::info!(path = %path.display(), "Digest written");
    Ok(path)
}

/// Runs one feed through fetch then parse, reporting the outcome as a
/// value. Never fails the caller.
async fn process_feed(
    client: &reqwest::Client,
    source: FeedSource,
    timeout: Duration,
) -> FeedResult {
    tracing::info!(feed = %source.name, url = %source.url, "Fetching feed");

    let outcome = match feed::fetch(client, &source.url, timeout).await {
        Ok(bytes) => feed::parse(&bytes).map_err(FeedError::from),
        Err(e) => Err(FeedError::from(e)),
    };

    match &outcome {
        Ok(entries) => {
            tracing::info!(feed = %source.name, entries = entries.len(), "Feed processed");
        }
        Err(e) => {
            tracing::warn!(feed = %source.name, error = %e, "Feed skipped");
        }
    }

    FeedResult { source, outcome }
}
