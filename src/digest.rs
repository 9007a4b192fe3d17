//! Digest assembly and rendering.
//!
//! Per-feed outcomes are carried as values ([`FeedResult`]) rather than
//! raised errors, which keeps the continue-past-failures contract explicit:
//! a failed feed still contributes a section heading, just with no entries.

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::FeedSource;
use crate::feed::{FeedEntry, FetchError, ParseError};

/// Timestamp format for the `Last update:` line. Fixed and
/// locale-independent so repeat runs differ only in the timestamp value.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// A failure at either stage of processing a single feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// The outcome of fetching and parsing one configured feed: either its
/// extracted entries in document order, or the failure that stopped it.
#[derive(Debug)]
pub struct FeedResult {
    pub source: FeedSource,
    pub outcome: Result<Vec<FeedEntry>, FeedError>,
}

/// One rendered section: feed name plus its entries, empty when the feed
/// failed.
#[derive(Debug)]
pub struct DigestSection {
    pub feed_name: String,
    pub entries: Vec<FeedEntry>,
}

/// The assembled digest for one pipeline run. Terminal: rendered to
/// Markdown, persisted, and discarded.
#[derive(Debug)]
pub struct Digest {
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<DigestSection>,
}

impl Digest {
    /// Builds the digest from all per-feed results, in their given
    /// (catalog) order. A failed feed collapses to an empty section; its
    /// error has already been logged by the driver.
    pub fn assemble(results: Vec<FeedResult>, generated_at: DateTime<Utc>) -> Self {
        let sections = results
            .into_iter()
            .map(|result| DigestSection {
                feed_name: result.source.name,
                entries: result.outcome.unwrap_or_default(),
            })
            .collect();

        Self {
            generated_at,
            sections,
        }
    }

    /// Renders the digest as Markdown: a `# News` header with the
    /// generation timestamp, then one `## <name>` section per feed with a
    /// `* [<title>](<link>)` line per entry.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# News\n");
        out.push_str(&format!(
            "Last update: {}.\n",
            self.generated_at.format(TIMESTAMP_FORMAT)
        ));

        for section in &self.sections {
            out.push_str(&format!("\n## {}\n", section.feed_name));
            for entry in &section.entries {
                out.push_str(&format!("* [{}]({})\n", entry.title, entry.link));
            }
        }

        out
    }

    /// Writes the rendered document to `path`, truncating any existing
    /// file. Not atomic; a partial write on crash is an accepted
    /// limitation.
    pub async fn persist(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, self.to_markdown()).await
    }
}
