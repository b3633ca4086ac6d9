//! # Schema Cache
//!
//! Single-slot, time-bounded store for the schema document. The cache is
//! one plain JSON file; its modification time is the only freshness
//! metadata. A file younger than [`CACHE_MAX_AGE`] is served as-is,
//! anything older is stale and gets overwritten on the next fetch.
//!
//! The slot is not keyed by schema URL: whatever was fetched last is what
//! a fresh cache returns.
//!
//! Parallel invocations writing the same slot are not coordinated; the
//! last writer wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::document::SchemaDocument;
use crate::error::SchemaError;

/// File name of the cache slot inside the cache directory.
pub const CACHE_FILE_NAME: &str = "mergify-schema.json";

/// Freshness window (24 hours).
pub const CACHE_MAX_AGE: Duration = Duration::from_secs(86_400);

/// On-disk schema cache slot.
#[derive(Debug, Clone)]
pub struct SchemaCache {
    path: PathBuf,
    max_age: Duration,
}

impl SchemaCache {
    /// Cache slot at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age: CACHE_MAX_AGE,
        }
    }

    /// Cache slot named [`CACHE_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CACHE_FILE_NAME))
    }

    /// The per-user location, `~/.cache/mergify-schema.json`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoCacheLocation`] when the home directory
    /// cannot be determined.
    pub fn default_location() -> Result<Self, SchemaError> {
        dirs::home_dir()
            .map(|home| Self::in_dir(home.join(".cache")))
            .ok_or(SchemaError::NoCacheLocation)
    }

    /// Override the freshness window.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Location of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Freshness window applied by [`is_fresh_at`](Self::is_fresh_at).
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Age of the cache file at `now`, or `None` if there is no file.
    ///
    /// A modification time in the future counts as age zero.
    pub fn age_at(&self, now: SystemTime) -> Option<Duration> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        Some(now.duration_since(modified).unwrap_or(Duration::ZERO))
    }

    /// Whether the slot holds a file strictly younger than the window.
    pub fn is_fresh_at(&self, now: SystemTime) -> bool {
        self.age_at(now).is_some_and(|age| age < self.max_age)
    }

    /// Return the cached document if it is fresh at `now`.
    ///
    /// A fresh file that cannot be read or parsed is reported and treated
    /// as a miss so the caller re-fetches.
    pub fn load_fresh(&self, now: SystemTime) -> Option<SchemaDocument> {
        if !self.is_fresh_at(now) {
            tracing::debug!(path = %self.path.display(), "schema cache missing or stale");
            return None;
        }
        match self.load() {
            Ok(doc) => {
                tracing::debug!(path = %self.path.display(), "schema cache hit");
                Some(doc)
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable schema cache");
                None
            }
        }
    }

    /// Read the slot regardless of age.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Cache`] on I/O failure, [`SchemaError::InvalidDocument`]
    /// if the content is not a JSON object.
    pub fn load(&self) -> Result<SchemaDocument, SchemaError> {
        let bytes = fs::read(&self.path).map_err(|source| SchemaError::Cache {
            path: self.path.clone(),
            source,
        })?;
        SchemaDocument::from_slice(&bytes, &self.path.display().to_string())
    }

    /// Overwrite the slot with `doc`, creating parent directories.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Cache`] if the directory or file cannot be written.
    pub fn store(&self, doc: &SchemaDocument) -> Result<(), SchemaError> {
        let cache_err = |source: std::io::Error| SchemaError::Cache {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(cache_err)?;
        }
        fs::write(&self.path, doc.to_vec()).map_err(cache_err)?;
        tracing::debug!(path = %self.path.display(), "schema cache written");
        Ok(())
    }
}
