//! Progress-callback trait for per-document conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to observe a
//! run as it happens: drive a progress bar, count failures, or forward
//! events to whatever the host application uses.
//!
//! # Example
//!
//! ```rust
//! use md2jsonld::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct Counter(AtomicUsize);
//!
//! impl ConversionProgressCallback for Counter {
//!     fn on_document_complete(&self, document: &str, record: &str) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{document} -> {record}");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(Counter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each document.
///
/// Documents are converted concurrently on blocking worker threads, so the
/// per-document methods may be called from several threads at once and in
/// any order. Implementations must protect shared state accordingly. All
/// methods default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after the scan, before any document is converted.
    fn on_conversion_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called when a document's record has been written.
    ///
    /// # Arguments
    /// * `document`: input-relative source path
    /// * `record`: output-relative record path
    fn on_document_complete(&self, document: &str, record: &str) {
        let _ = (document, record);
    }

    /// Called when a document fails. The run stops after this.
    fn on_document_error(&self, document: &str, error: &str) {
        let _ = (document, error);
    }

    /// Called once after every document is written and the manifest is on
    /// disk. Not called when the run fails.
    fn on_conversion_complete(&self, total_documents: usize) {
        let _ = total_documents;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
