//! # Schema Provider
//!
//! Cache-then-fetch acquisition of the schema document. A fresh cache
//! slot short-circuits the network entirely; otherwise the schema is
//! fetched from the source and written back to the slot.

use std::time::SystemTime;

use crate::cache::SchemaCache;
use crate::document::SchemaDocument;
use crate::error::SchemaError;
use crate::source::SchemaSource;

/// Obtain the schema document for `schema_url`.
///
/// With `use_cache` set and a fresh slot, the cached document is returned
/// and `source` is never called. Otherwise the schema is fetched and the
/// slot overwritten.
///
/// # Errors
///
/// Any [`SchemaError`] from the source. A failure to write the cache is
/// logged and does not fail the call.
pub fn get_schema<S>(
    use_cache: bool,
    schema_url: &str,
    cache: &SchemaCache,
    source: &S,
) -> Result<SchemaDocument, SchemaError>
where
    S: SchemaSource + ?Sized,
{
    get_schema_at(use_cache, schema_url, cache, source, SystemTime::now())
}

/// [`get_schema`] with an explicit clock reading for the freshness check.
pub fn get_schema_at<S>(
    use_cache: bool,
    schema_url: &str,
    cache: &SchemaCache,
    source: &S,
    now: SystemTime,
) -> Result<SchemaDocument, SchemaError>
where
    S: SchemaSource + ?Sized,
{
    if use_cache {
        if let Some(doc) = cache.load_fresh(now) {
            return Ok(doc);
        }
    }

    let schema = source.fetch(schema_url)?;

    if let Err(e) = cache.store(&schema) {
        tracing::warn!(error = %e, "could not write schema cache");
    }

    Ok(schema)
}
