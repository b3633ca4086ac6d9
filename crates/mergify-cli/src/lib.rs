//! # mergify-cli — Mergify Configuration Linter
//!
//! Provides the `validate-mergify` command, a pre-commit style hook that
//! checks Mergify configuration files against the published schema:
//!
//! ```bash
//! validate-mergify .mergify.yml
//! validate-mergify .mergify.yml .github/mergify.yml --schema-url https://example.org/schema.json
//! ```
//!
//! ## Exit Status
//!
//! - `0` — no files given, or every file is valid.
//! - `1` — at least one file failed, or the schema could not be obtained.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; schema retrieval and validation are
//!   delegated to `mergify-schema`.
//! - Per-file diagnostics go to the writer handed to the command (stdout in
//!   the binary); the fatal schema failure is returned to `main`, which
//!   prints it on stderr.

pub mod validate;
