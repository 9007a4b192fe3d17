//! Utility functions shared across the pipeline.
//!
//! Currently this is URL validation: catalog entries must carry well-formed
//! absolute http(s) URLs before any network work begins.

mod url_validator;

pub use url_validator::{validate_feed_url, UrlValidationError};
