//! Feed source catalog: the JSON artifact mapping display names to feed URLs.
//!
//! The catalog is read once per run. It is a flat UTF-8 JSON object,
//! `{"<name>": "<url>", ...}`; key order in the file drives section order in
//! the rendered digest, so decoding preserves insertion order.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::util::validate_feed_url;

/// Example catalog written by [`SourceCatalog::create_default`].
const DEFAULT_CATALOG: &str = r#"{
  "Planet Python": "https://planetpython.org/rss20.xml",
  "Real Python": "https://realpython.com/atom.xml",
  "Schneier on Security": "https://www.schneier.com/blog/atom.xml"
}
"#;

/// Errors that can occur while loading or bootstrapping the catalog.
///
/// All of these are fatal: without a usable catalog there is nothing to
/// fetch, so the run aborts before any network access.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No catalog artifact exists at the given path.
    #[error("Feed catalog not found: {0}")]
    NotFound(PathBuf),

    /// The artifact exists but is not a flat JSON map of name to URL.
    #[error("Malformed feed catalog: {0}")]
    Malformed(String),

    /// The artifact could not be read or written.
    #[error("Failed to access feed catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// A single configured feed: display name plus the URL to fetch.
#[derive(Debug, Clone)]
pub struct FeedSource {
    /// Display name, used as the digest section heading.
    pub name: String,
    /// Absolute http(s) URL of the feed document.
    pub url: Url,
}

/// Ordered collection of [`FeedSource`] entries.
///
/// Order is the catalog file's key order and is preserved all the way into
/// the digest, regardless of fetch completion order.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    sources: Vec<FeedSource>,
}

impl SourceCatalog {
    /// Load the catalog from `path`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] when no file exists at `path` (the
    ///   caller decides whether to bootstrap a default)
    /// - [`CatalogError::Malformed`] when the content is not a JSON object
    ///   of non-empty names to valid absolute http(s) URLs
    /// - [`CatalogError::Io`] on any other read failure
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CatalogError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(CatalogError::Io(e)),
        };

        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;

        let mut sources = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            if name.trim().is_empty() {
                return Err(CatalogError::Malformed(
                    "feed name must not be empty".to_string(),
                ));
            }
            let url_str = value.as_str().ok_or_else(|| {
                CatalogError::Malformed(format!("URL for feed '{}' is not a string", name))
            })?;
            let url = validate_feed_url(url_str).map_err(|e| {
                CatalogError::Malformed(format!("invalid URL for feed '{}': {}", name, e))
            })?;
            sources.push(FeedSource { name, url });
        }

        tracing::debug!(path = %path.display(), feeds = sources.len(), "Loaded feed catalog");
        Ok(Self { sources })
    }

    /// Write the fixed example catalog to `path`, overwriting any existing
    /// content. The result is a valid starting point the user is expected
    /// to edit.
    pub fn create_default(path: &Path) -> Result<(), CatalogError> {
        std::fs::write(path, DEFAULT_CATALOG)?;
        tracing::info!(path = %path.display(), "Created default feed catalog");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedSource> {
        self.sources.iter()
    }
}

impl IntoIterator for SourceCatalog {
    type Item = FeedSource;
    type IntoIter = std::vec::IntoIter<FeedSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rss_digest_catalog_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_preserves_file_order() {
        let dir = test_dir("order");
        let path = dir.join("feeds.json");
        std::fs::write(
            &path,
            r#"{"Zeta": "http://example.com/z.xml", "Alpha": "http://example.com/a.xml", "Mid": "http://example.com/m.xml"}"#,
        )
        .unwrap();

        let catalog = SourceCatalog::load(&path).unwrap();
        let names: Vec<&str> = catalog.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let path = Path::new("/tmp/rss_digest_catalog_does_not_exist.json");
        let err = SourceCatalog::load(path).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let dir = test_dir("invalid_json");
        let path = dir.join("feeds.json");
        std::fs::write(&path, "this is not json").unwrap();

        let err = SourceCatalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_non_object_root_is_malformed() {
        let dir = test_dir("array_root");
        let path = dir.join("feeds.json");
        std::fs::write(&path, r#"["http://example.com/feed.xml"]"#).unwrap();

        let err = SourceCatalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_non_string_url_is_malformed() {
        let dir = test_dir("non_string");
        let path = dir.join("feeds.json");
        std::fs::write(&path, r#"{"Feed": 42}"#).unwrap();

        let err = SourceCatalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
        assert!(err.to_string().contains("Feed"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_name_is_malformed() {
        let dir = test_dir("empty_name");
        let path = dir.join("feeds.json");
        std::fs::write(&path, r#"{"  ": "http://example.com/feed.xml"}"#).unwrap();

        let err = SourceCatalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_url_is_malformed() {
        let dir = test_dir("bad_url");
        let path = dir.join("feeds.json");
        std::fs::write(&path, r#"{"Feed": "not-absolute/feed.xml"}"#).unwrap();

        let err = SourceCatalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_object_is_empty_catalog() {
        let dir = test_dir("empty_object");
        let path = dir.join("feeds.json");
        std::fs::write(&path, "{}").unwrap();

        let catalog = SourceCatalog::load(&path).unwrap();
        assert!(catalog.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_create_default_round_trips() {
        let dir = test_dir("default");
        let path = dir.join("feeds.json");

        SourceCatalog::create_default(&path).unwrap();
        let catalog = SourceCatalog::load(&path).unwrap();

        assert_eq!(catalog.len(), 3);
        let names: Vec<&str> = catalog.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Planet Python", "Real Python", "Schneier on Security"]
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_create_default_overwrites_existing() {
        let dir = test_dir("overwrite");
        let path = dir.join("feeds.json");
        std::fs::write(&path, r#"{"Old": "http://example.com/old.xml"}"#).unwrap();

        SourceCatalog::create_default(&path).unwrap();
        let catalog = SourceCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.iter().all(|s| s.name != "Old"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
