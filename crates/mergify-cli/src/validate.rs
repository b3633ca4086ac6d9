//! # Validate Command
//!
//! Enumerates the input files, obtains the schema once, and validates each
//! file in order. Preserves the interface of the `validate-mergify`
//! pre-commit hook: `validate-mergify [FILES]... [--schema-url URL]`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use mergify_schema::{
    get_schema, ConfigValidator, HttpSchemaSource, SchemaCache, SchemaSource, DEFAULT_SCHEMA_URL,
};

/// Arguments for the validate command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Mergify configuration filenames to validate.
    pub filenames: Vec<PathBuf>,

    /// URL to the Mergify schema (default: official URL).
    #[arg(long, default_value = DEFAULT_SCHEMA_URL)]
    pub schema_url: String,

    /// Always download the schema, ignoring a fresh cached copy.
    #[arg(long)]
    pub no_cache: bool,

    /// Directory holding the cached schema (default: ~/.cache).
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

impl ValidateArgs {
    /// Arguments for `filenames` with every option at its default.
    pub fn for_files(filenames: Vec<PathBuf>) -> Self {
        Self {
            filenames,
            schema_url: DEFAULT_SCHEMA_URL.to_string(),
            no_cache: false,
            cache_dir: None,
        }
    }

    fn schema_cache(&self) -> anyhow::Result<SchemaCache> {
        match &self.cache_dir {
            Some(dir) => Ok(SchemaCache::in_dir(dir)),
            None => Ok(SchemaCache::default_location()?),
        }
    }
}

/// Execute the validate command against the published schema over HTTP.
///
/// Returns the process exit code. With no filenames this returns `0`
/// before any HTTP client is created.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> anyhow::Result<u8> {
    if args.filenames.is_empty() {
        tracing::debug!("no files to validate");
        return Ok(0);
    }
    let source = HttpSchemaSource::new().context("Failed to fetch Mergify schema")?;
    run_validate_with(args, &source, out)
}

/// Execute the validate command with an explicit schema source.
///
/// # Errors
///
/// Returns an error when the schema cannot be obtained or `out` cannot be
/// written. Per-file failures are not errors; they set the exit code to 1.
pub fn run_validate_with(
    args: &ValidateArgs,
    source: &dyn SchemaSource,
    out: &mut dyn Write,
) -> anyhow::Result<u8> {
    if args.filenames.is_empty() {
        tracing::debug!("no files to validate");
        return Ok(0);
    }

    let cache = args.schema_cache()?;
    tracing::debug!(
        cache = %cache.path().display(),
        schema_url = %args.schema_url,
        use_cache = !args.no_cache,
        "obtaining schema"
    );
    let schema = get_schema(!args.no_cache, &args.schema_url, &cache, source)
        .context("Failed to fetch Mergify schema")?;

    let validator = ConfigValidator::new(&schema);

    let mut failed = 0usize;
    for filename in &args.filenames {
        let outcome = validator.validate_file(filename);
        if !outcome.passed() {
            failed += 1;
            outcome.write_to(out)?;
        }
    }

    tracing::info!(
        files = args.filenames.len(),
        failed,
        "validation complete"
    );

    Ok(if failed == 0 { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use mergify_schema::{SchemaDocument, SchemaError};
    use serde_json::json;

    struct FixedSource {
        calls: Cell<usize>,
    }

    impl SchemaSource for FixedSource {
        fn fetch(&self, url: &str) -> Result<SchemaDocument, SchemaError> {
            self.calls.set(self.calls.get() + 1);
            SchemaDocument::from_value(
                json!({
                    "type": "object",
                    "properties": {"pull_request_rules": {"type": "array"}}
                }),
                url,
            )
        }
    }

    fn fixed() -> FixedSource {
        FixedSource {
            calls: Cell::new(0),
        }
    }

    #[test]
    fn no_files_returns_zero_without_fetching() {
        let source = fixed();
        let mut out = Vec::new();
        let code = run_validate_with(&ValidateArgs::for_files(Vec::new()), &source, &mut out).unwrap();
        assert_eq!(code, 0);
        assert_eq!(source.calls.get(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn no_files_over_http_returns_zero() {
        let mut out = Vec::new();
        let args = ValidateArgs {
            schema_url: "http://127.0.0.1:1/unreachable.json".to_string(),
            ..ValidateArgs::for_files(Vec::new())
        };
        assert_eq!(run_validate(&args, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn schema_fetched_once_for_many_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.yml");
        std::fs::write(&a, r#"{"pull_request_rules": []}"#).unwrap();
        std::fs::write(&b, "pull_request_rules: []\n").unwrap();

        let source = fixed();
        let args = ValidateArgs {
            no_cache: true,
            cache_dir: Some(dir.path().join("cache")),
            ..ValidateArgs::for_files(vec![a, b])
        };
        let mut out = Vec::new();
        let code = run_validate_with(&args, &source, &mut out).unwrap();

        assert_eq!(code, 0);
        assert_eq!(source.calls.get(), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn default_args_use_published_url() {
        let args = ValidateArgs::for_files(Vec::new());
        assert_eq!(args.schema_url, DEFAULT_SCHEMA_URL);
        assert!(!args.no_cache);
        assert!(args.cache_dir.is_none());
    }
}
