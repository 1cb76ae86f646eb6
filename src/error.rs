//! Error types for the md2jsonld library.
//!
//! Two error types reflect two layers of the pipeline:
//!
//! * [`Md2JsonLdError`] is **fatal**: the run cannot continue. Every failure
//!   in the pipeline ends up here, including extractor failures. Returned
//!   as `Err(Md2JsonLdError)` from the top-level `convert*` functions.
//!
//! * [`ExtractionError`] is what a single [`crate::extract::Extractor`]
//!   returns when its source is unreadable or malformed. The pipeline wraps
//!   it in [`Md2JsonLdError::Extraction`] together with the document path.
//!
//! There is no partial-success mode: either every document converts and the
//! manifest is written, or the run stops at the first error.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the md2jsonld library.
#[derive(Debug, Error)]
pub enum Md2JsonLdError {
    // ── Path errors ───────────────────────────────────────────────────────
    /// An input or output root could not be made absolute.
    #[error("Cannot resolve path '{path}': {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Scan errors ───────────────────────────────────────────────────────
    /// Walking the input tree failed on some entry.
    #[error("Failed to scan '{root}': {detail}")]
    Scan { root: PathBuf, detail: String },

    // ── Per-document errors ───────────────────────────────────────────────
    /// An extractor could not read or parse its source.
    #[error("Extraction failed for '{path}': {source}")]
    Extraction {
        path: String,
        #[source]
        source: ExtractionError,
    },

    /// A record or the manifest could not be encoded as JSON.
    #[error("Failed to serialise '{path}': {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create an output directory or write an output file.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (a conversion task panicked, runtime
    /// could not start, ...).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of a single extractor on a single document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The source document could not be read.
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source was read but its content is unusable.
    #[error("malformed source '{path}': {detail}")]
    Malformed { path: PathBuf, detail: String },

    /// An external command (e.g. `git`) failed or could not be started.
    #[error("command `{command}` failed: {detail}")]
    Command { command: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_display_names_document() {
        let e = Md2JsonLdError::Extraction {
            path: "guides/intro.md".into(),
            source: ExtractionError::Malformed {
                path: PathBuf::from("/in/guides/intro.md"),
                detail: "invalid UTF-8".into(),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("guides/intro.md"), "got: {msg}");
        assert!(!msg.contains('\n'), "diagnostic must be a single line: {msg}");
    }

    #[test]
    fn extraction_source_is_chained() {
        use std::error::Error as _;

        let e = Md2JsonLdError::Extraction {
            path: "a.md".into(),
            source: ExtractionError::Command {
                command: "git log".into(),
                detail: "not found".into(),
            },
        };
        let source = e.source().expect("source should be set");
        assert!(source.to_string().contains("git log"));
    }

    #[test]
    fn write_display_includes_path() {
        let e = Md2JsonLdError::Write {
            path: PathBuf::from("/out/a.jsonld"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/out/a.jsonld"));
    }
}
