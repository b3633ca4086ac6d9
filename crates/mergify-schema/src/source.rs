//! # Schema Sources
//!
//! Remote retrieval of the schema document. [`SchemaSource`] is the seam
//! between the provider and the network so that callers and tests can
//! substitute their own source.
//!
//! ## Timeout & Retry
//!
//! [`HttpSchemaSource`] uses a fixed 10 second request timeout. There are
//! no retries: a failed fetch is reported once and the run aborts.

use std::time::Duration;

use crate::document::SchemaDocument;
use crate::error::SchemaError;

/// Published location of the official Mergify configuration schema.
pub const DEFAULT_SCHEMA_URL: &str = "https://docs.mergify.com/mergify-configuration-schema.json";

/// Upper bound for a single schema download.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can produce a schema document for a URL.
pub trait SchemaSource {
    /// Fetch and parse the schema at `url`.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::Fetch`] on transport failure.
    /// - [`SchemaError::HttpStatus`] on a non-2xx response.
    /// - [`SchemaError::InvalidDocument`] if the body is not a JSON object.
    fn fetch(&self, url: &str) -> Result<SchemaDocument, SchemaError>;
}

/// Blocking HTTP implementation of [`SchemaSource`].
#[derive(Debug, Clone)]
pub struct HttpSchemaSource {
    client: reqwest::blocking::Client,
}

impl HttpSchemaSource {
    /// Build a client with the fixed [`FETCH_TIMEOUT`].
    pub fn new() -> Result<Self, SchemaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("validate-mergify/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SchemaError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl SchemaSource for HttpSchemaSource {
    fn fetch(&self, url: &str) -> Result<SchemaDocument, SchemaError> {
        tracing::debug!(%url, "fetching schema");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| transport_error(url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SchemaError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().map_err(|e| transport_error(url, &e))?;
        tracing::debug!(%url, bytes = body.len(), "schema downloaded");
        SchemaDocument::from_slice(&body, url)
    }
}

fn transport_error(url: &str, err: &reqwest::Error) -> SchemaError {
    let reason = if err.is_timeout() {
        format!("request timed out after {}s", FETCH_TIMEOUT.as_secs())
    } else {
        err.to_string()
    };
    SchemaError::Fetch {
        url: url.to_string(),
        reason,
    }
}
