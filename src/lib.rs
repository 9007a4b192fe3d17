//! Feed ingestion pipeline: fetch a configured set of Atom/RSS feeds,
//! extract `(title, link)` entries, and render one Markdown digest.
//!
//! - [`catalog`] - the JSON artifact naming the feeds to fetch
//! - [`feed`] - HTTP retrieval and dual-dialect XML extraction
//! - [`digest`] - per-feed result values and Markdown rendering
//! - [`pipeline`] - the driver tying the stages together
//! - [`util`] - URL validation

pub mod catalog;
pub mod digest;
pub mod feed;
pub mod pipeline;
pub mod util;
