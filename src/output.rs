//! Result type returned by a successful tree conversion.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Output-relative record paths, in discovery order. Identical to the
    /// manifest's element list.
    pub documents: Vec<String>,

    /// Absolute path of the written manifest.
    pub manifest_path: PathBuf,

    /// Wall-clock duration of the whole run.
    pub duration_ms: u64,
}

impl ConversionReport {
    /// Number of converted documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
