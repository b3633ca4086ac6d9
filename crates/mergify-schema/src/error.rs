//! Error types for schema acquisition and file validation.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a usable schema document.
///
/// Every variant is fatal for a validation run: there is no fallback schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Transport-level failure (timeout, DNS, connection refused, TLS).
    #[error("{url}: {reason}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// Transport error description.
        reason: String,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus {
        /// URL that was requested.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The payload is not a JSON object.
    #[error("invalid schema document from {origin}: {reason}")]
    InvalidDocument {
        /// Where the payload came from (URL or cache path).
        origin: String,
        /// Parse failure description.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// No per-user cache location could be determined.
    #[error("cannot determine the user home directory for the schema cache")]
    NoCacheLocation,

    /// Reading or writing the cache file failed.
    #[error("schema cache error at '{}': {source}", .path.display())]
    Cache {
        /// Cache file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Per-file validation failure.
///
/// The `Display` output of each variant is the exact first diagnostic line
/// reported for the file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    /// The file is not syntactically valid YAML.
    #[error("{path}: YAML parsing error - {detail}")]
    Yaml { path: String, detail: String },

    /// The file is not syntactically valid JSON.
    #[error("{path}: JSON parsing error - {detail}")]
    Json { path: String, detail: String },

    /// The document parsed but does not conform to the schema.
    #[error("{path}: Schema validation error - {message}")]
    Schema {
        path: String,
        message: String,
        /// Segments (object keys, array indices) locating the violation
        /// inside the document. Empty for a root-level violation.
        location: Vec<String>,
    },

    /// Anything else: missing file, invalid UTF-8, unrepresentable YAML,
    /// or a schema that does not compile.
    #[error("{path}: Unexpected error - {detail}")]
    Unexpected { path: String, detail: String },
}

impl FileError {
    /// All diagnostic lines for this failure, in print order.
    ///
    /// Schema violations with a document location get a second, indented
    /// `at path:` line joining the segments with arrows.
    pub fn diagnostic_lines(&self) -> Vec<String> {
        let mut lines = vec![self.to_string()];
        if let FileError::Schema { location, .. } = self {
            if !location.is_empty() {
                lines.push(format!("  at path: {}", location.join(" -> ")));
            }
        }
        lines
    }
}
