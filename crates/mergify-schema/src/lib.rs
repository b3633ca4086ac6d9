//! # mergify-schema — Mergify Configuration Schema Handling
//!
//! Obtains the published Mergify configuration JSON Schema and validates
//! YAML/JSON configuration files against it.
//!
//! ## Schema Provider (`provider`, `cache`, `source`)
//!
//! - [`get_schema`] — returns the schema from a 24-hour single-slot cache
//!   ([`SchemaCache`]) or fetches it through a [`SchemaSource`] and
//!   refreshes the cache.
//! - [`HttpSchemaSource`] — the production source, a blocking HTTP GET
//!   with a fixed 10 second timeout.
//!
//! ## File Validator (`validate`)
//!
//! - [`ConfigValidator::validate_file`] — parses one file (YAML for
//!   `.yaml`/`.yml`, JSON otherwise), validates it, and classifies every
//!   failure into a [`FileError`] carried by the [`ValidationOutcome`].
//!
//! ## Crate Policy
//!
//! - Schema acquisition failures are returned as [`SchemaError`]; deciding
//!   to abort the process is left to the caller.
//! - File validation never returns `Err`: every failure becomes a
//!   diagnostic inside the outcome.

pub mod cache;
pub mod document;
pub mod error;
pub mod provider;
pub mod source;
pub mod validate;

pub use cache::{SchemaCache, CACHE_FILE_NAME, CACHE_MAX_AGE};
pub use document::SchemaDocument;
pub use error::{FileError, SchemaError};
pub use provider::{get_schema, get_schema_at};
pub use source::{HttpSchemaSource, SchemaSource, DEFAULT_SCHEMA_URL, FETCH_TIMEOUT};
pub use validate::{validate_file, ConfigValidator, ValidationOutcome};
