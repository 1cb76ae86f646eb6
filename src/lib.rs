//! # md2jsonld
//!
//! Convert a directory tree of Markdown documents into a mirrored tree of
//! JSON-LD records, plus one manifest listing every record.
//!
//! ## Why this crate?
//!
//! Static sites and content pipelines often need per-document metadata
//! (title, outline, authors, creation and modification dates) in a
//! machine-readable form. Extracting it once, concurrently, into schema.org
//! `CreativeWork` records lets downstream tools consume plain JSON instead of
//! re-parsing Markdown and re-walking git history on every build.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input tree
//!  │
//!  ├─ 1. Scan      depth-first walk for *.md, file-name order
//!  ├─ 2. Map       a/b/doc.md → a/b/doc.jsonld
//!  ├─ 3. Extract   one task per document: record ← markdown ← git
//!  ├─ 4. Encode    compact or tab-indented JSON
//!  ├─ 5. Write     mkdir -p + atomic write per record
//!  └─ 6. Manifest  _index.jsonld, written once after every task joins
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use md2jsonld::{convert_tree, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().prettify(true).build()?;
//!     let report = convert_tree("docs", "public/data", &config).await?;
//!     eprintln!("{} records, manifest at {}",
//!         report.len(),
//!         report.manifest_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Custom extractors
//!
//! Implement [`Extractor`] and pass your own [`ExtractorChain`] to the
//! config builder. Extractors run in chain order; later extractors win on
//! field collisions.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2jsonld` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod record;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert_document, convert_tree, convert_tree_sync};
pub use error::{ExtractionError, Md2JsonLdError};
pub use extract::{Extractor, ExtractorChain, GitExtractor, MarkdownExtractor};
pub use output::ConversionReport;
pub use pipeline::paths::{DocumentPath, PathMapper};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use record::{DocumentRecord, Manifest};
