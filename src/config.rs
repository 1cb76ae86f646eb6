//! Configuration types for Markdown-to-JSON-LD conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. One struct holds every knob, so a
//! config is cheap to clone into each conversion task and easy to log.
//!
//! The CLI only exposes `--prettify`; the remaining fields exist for library
//! callers that convert other extensions or plug in their own extractors.

use crate::error::Md2JsonLdError;
use crate::extract::ExtractorChain;
use crate::progress::ProgressCallback;
use std::fmt;

/// Default recognised source extension.
pub const DEFAULT_SOURCE_EXTENSION: &str = "md";

/// Default extension of written records.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "jsonld";

/// Default manifest file name, written at the output root.
pub const DEFAULT_MANIFEST_NAME: &str = "_index.jsonld";

/// Configuration for a tree conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use md2jsonld::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .prettify(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.extractors.names(), vec!["markdown", "git"]);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Indent JSON output with tabs. Default: false.
    pub prettify: bool,

    /// Extension (without the dot) of files to convert. Default: `md`.
    pub source_extension: String,

    /// Extension (without the dot) of written records. Default: `jsonld`.
    pub output_extension: String,

    /// Manifest file name inside the output root. Default: `_index.jsonld`.
    pub manifest_name: String,

    /// Descend into symlinked directories while scanning. Default: true.
    pub follow_links: bool,

    /// Extractors applied to every document, in order.
    /// Default: markdown structure, then git history.
    pub extractors: ExtractorChain,

    /// Optional observer for per-document progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            prettify: false,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            follow_links: true,
            extractors: ExtractorChain::standard(
                DEFAULT_SOURCE_EXTENSION,
                DEFAULT_OUTPUT_EXTENSION,
            ),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("prettify", &self.prettify)
            .field("source_extension", &self.source_extension)
            .field("output_extension", &self.output_extension)
            .field("manifest_name", &self.manifest_name)
            .field("follow_links", &self.follow_links)
            .field("extractors", &self.extractors)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
            custom_extractors: false,
        }
    }
}

/// Builder for [`ConversionConfig`].
///
/// Unless [`extractors`](Self::extractors) is called, `build()` assembles the
/// standard chain for the configured extensions, so link rewriting follows a
/// changed extension automatically.
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
    custom_extractors: bool,
}

impl ConversionConfigBuilder {
    pub fn prettify(mut self, v: bool) -> Self {
        self.config.prettify = v;
        self
    }

    pub fn source_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.source_extension = ext.into();
        self
    }

    pub fn output_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.output_extension = ext.into();
        self
    }

    pub fn manifest_name(mut self, name: impl Into<String>) -> Self {
        self.config.manifest_name = name.into();
        self
    }

    pub fn follow_links(mut self, v: bool) -> Self {
        self.config.follow_links = v;
        self
    }

    pub fn extractors(mut self, chain: ExtractorChain) -> Self {
        self.config.extractors = chain;
        self.custom_extractors = true;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ConversionConfig, Md2JsonLdError> {
        let c = &self.config;
        validate_extension("source", &c.source_extension)?;
        validate_extension("output", &c.output_extension)?;
        if c.source_extension == c.output_extension {
            return Err(Md2JsonLdError::InvalidConfig(format!(
                "source and output extensions must differ, both are '{}'",
                c.source_extension
            )));
        }
        if c.manifest_name.is_empty() || c.manifest_name.contains(['/', '\\']) {
            return Err(Md2JsonLdError::InvalidConfig(format!(
                "manifest name must be a bare file name, got '{}'",
                c.manifest_name
            )));
        }

        if !self.custom_extractors {
            let chain = ExtractorChain::standard(
                &self.config.source_extension,
                &self.config.output_extension,
            );
            self.config.extractors = chain;
        }
        Ok(self.config)
    }
}

fn validate_extension(which: &str, ext: &str) -> Result<(), Md2JsonLdError> {
    if ext.is_empty() {
        return Err(Md2JsonLdError::InvalidConfig(format!(
            "{which} extension must not be empty"
        )));
    }
    if ext.starts_with('.') || ext.contains(['/', '\\']) {
        return Err(Md2JsonLdError::InvalidConfig(format!(
            "{which} extension must be bare (like 'md'), got '{ext}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert!(!c.prettify);
        assert_eq!(c.source_extension, "md");
        assert_eq!(c.output_extension, "jsonld");
        assert_eq!(c.manifest_name, "_index.jsonld");
        assert!(c.follow_links);
        assert_eq!(c.extractors.names(), vec!["markdown", "git"]);
    }

    #[test]
    fn builder_sets_fields() {
        let c = ConversionConfig::builder()
            .prettify(true)
            .source_extension("markdown")
            .output_extension("json")
            .manifest_name("index.json")
            .follow_links(false)
            .build()
            .unwrap();
        assert!(c.prettify);
        assert_eq!(c.source_extension, "markdown");
        assert_eq!(c.manifest_name, "index.json");
        assert!(!c.follow_links);
    }

    #[test]
    fn custom_chain_is_kept() {
        let c = ConversionConfig::builder()
            .extractors(ExtractorChain::new())
            .build()
            .unwrap();
        assert!(c.extractors.is_empty());
    }

    #[test]
    fn rejects_dotted_extension() {
        let err = ConversionConfig::builder()
            .source_extension(".md")
            .build()
            .unwrap_err();
        assert!(matches!(err, Md2JsonLdError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_identical_extensions() {
        let err = ConversionConfig::builder()
            .output_extension("md")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("must differ"), "got: {err}");
    }

    #[test]
    fn rejects_nested_manifest_name() {
        assert!(ConversionConfig::builder()
            .manifest_name("sub/_index.jsonld")
            .build()
            .is_err());
        assert!(ConversionConfig::builder().manifest_name("").build().is_err());
    }
}
