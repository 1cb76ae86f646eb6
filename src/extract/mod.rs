//! Metadata extractors and the ordered chain that applies them.
//!
//! An [`Extractor`] is one capability: look at a source document (its bytes,
//! its version-control history, anything out of band) and merge fields into
//! the document's [`DocumentRecord`]. Extractors do not know about each other.
//! The [`ExtractorChain`] runs them in a fixed order; when two extractors write
//! the same field the later one silently wins.
//!
//! Extractors are synchronous and must be `Send + Sync`: the pipeline shares
//! one chain across every concurrent conversion task and calls it from
//! blocking worker threads.

pub mod git;
pub mod markdown;

use crate::error::ExtractionError;
use crate::pipeline::paths::DocumentPath;
use crate::record::DocumentRecord;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

pub use git::GitExtractor;
pub use markdown::MarkdownExtractor;

/// A single metadata-extraction capability.
pub trait Extractor: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Inspect `document` and merge fields into `record`.
    fn extract(
        &self,
        record: &mut DocumentRecord,
        document: &DocumentPath,
    ) -> Result<(), ExtractionError>;
}

/// Ordered list of extractors applied to every document.
#[derive(Clone, Default)]
pub struct ExtractorChain {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractorChain {
    /// An empty chain. Records come out with only the linked-data header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Markdown structure first, then git history.
    pub fn standard(source_extension: &str, output_extension: &str) -> Self {
        Self::new()
            .with(MarkdownExtractor::new(source_extension, output_extension))
            .with(GitExtractor::new())
    }

    /// Append an extractor to the end of the chain.
    pub fn with(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractors.push(Arc::new(extractor));
        self
    }

    /// Append an already-shared extractor.
    pub fn push(&mut self, extractor: Arc<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Extractor names in application order.
    pub fn names(&self) -> Vec<&str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Run every extractor in order. Stops at the first failure: a record
    /// missing one extractor's fields is never handed on.
    pub fn apply(
        &self,
        record: &mut DocumentRecord,
        document: &DocumentPath,
    ) -> Result<(), ExtractionError> {
        for extractor in &self.extractors {
            debug!("{}: {}", extractor.name(), document);
            extractor.extract(record, document).map_err(|e| {
                error!("Extractor '{}' failed on {}: {}", extractor.name(), document, e);
                e
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for ExtractorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::{Path, PathBuf};

    struct Fixed(&'static str, &'static str);

    impl Extractor for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn extract(
            &self,
            record: &mut DocumentRecord,
            _document: &DocumentPath,
        ) -> Result<(), ExtractionError> {
            record.insert(self.0, self.1);
            Ok(())
        }
    }

    struct Failing;

    impl Extractor for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn extract(
            &self,
            _record: &mut DocumentRecord,
            document: &DocumentPath,
        ) -> Result<(), ExtractionError> {
            Err(ExtractionError::Malformed {
                path: document.absolute().to_path_buf(),
                detail: "broken".into(),
            })
        }
    }

    fn doc() -> DocumentPath {
        DocumentPath::new(Path::new("/in"), &PathBuf::from("a.md"))
    }

    #[test]
    fn applies_in_order_last_writer_wins() {
        let chain = ExtractorChain::new()
            .with(Fixed("name", "first"))
            .with(Fixed("name", "second"));
        let mut record = DocumentRecord::new();
        chain.apply(&mut record, &doc()).unwrap();
        assert_eq!(record.get("name"), Some(&json!("second")));
    }

    #[test]
    fn stops_at_first_failure() {
        let chain = ExtractorChain::new()
            .with(Failing)
            .with(Fixed("name", "never"));
        let mut record = DocumentRecord::new();
        assert!(chain.apply(&mut record, &doc()).is_err());
        assert!(!record.contains_key("name"));
    }

    #[test]
    fn shared_extractor_can_be_pushed() {
        let shared: Arc<dyn Extractor> = Arc::new(Fixed("name", "pushed"));
        let mut chain = ExtractorChain::new().with(Fixed("name", "first"));
        chain.push(shared.clone());
        assert_eq!(chain.len(), 2);
        assert_eq!(Arc::strong_count(&shared), 2);

        let mut record = DocumentRecord::new();
        chain.apply(&mut record, &doc()).unwrap();
        assert_eq!(record.get("name"), Some(&json!("pushed")));
    }

    #[test]
    fn standard_chain_order() {
        let chain = ExtractorChain::standard("md", "jsonld");
        assert_eq!(chain.names(), vec!["markdown", "git"]);
        assert_eq!(format!("{chain:?}"), r#"["markdown", "git"]"#);
    }
}
