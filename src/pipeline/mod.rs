//! Pipeline stages for Markdown-to-JSON-LD conversion.
//!
//! Each submodule implements exactly one step, so each is independently
//! testable. The orchestration that ties them together with the extractor
//! chain lives in [`crate::convert`].
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ paths ──▶ (extractors) ──▶ serialize ──▶ write
//! (walk)   (map)      (record)         (JSON)       (fs)
//! ```
//!
//! 1. [`scan`]: list source documents under the input root
//! 2. [`paths`]: map each document path to its record path
//! 3. [`serialize`]: encode a record or the manifest, compact or tabbed
//! 4. [`write`]: create output directories and write files atomically

pub mod paths;
pub mod scan;
pub mod serialize;
pub mod write;
