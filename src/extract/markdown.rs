//! Markdown structure extraction.
//!
//! Reads the document and records its title, heading outline, word count and
//! body. Relative links to other Markdown documents are rewritten to point at
//! their converted records, so links keep working inside the output tree.
//!
//! Parsing is line based: ATX headings (`# Title`)
//! and inline links (`[text](target)`) are all the record needs. Fenced code
//! blocks are skipped for every rule so example Markdown inside a fence does
//! not leak into the outline or get its links rewritten.

use crate::error::ExtractionError;
use crate::extract::Extractor;
use crate::pipeline::paths::DocumentPath;
use crate::record::DocumentRecord;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

static RE_ATX_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.*)$").unwrap());

static RE_CLOSING_HASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[ \t]+)#+[ \t]*$").unwrap());

static RE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").unwrap());

static RE_INLINE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\]\(([^)\s]+)((?:\s+"[^"]*")?)\)"#).unwrap());

static RE_URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// Extracts `name`, `headline`, `text`, `wordCount` and `encodingFormat`.
#[derive(Debug, Clone)]
pub struct MarkdownExtractor {
    source_suffix: String,
    output_suffix: String,
}

impl MarkdownExtractor {
    pub fn new(source_extension: &str, output_extension: &str) -> Self {
        Self {
            source_suffix: format!(".{source_extension}"),
            output_suffix: format!(".{output_extension}"),
        }
    }
}

impl Default for MarkdownExtractor {
    fn default() -> Self {
        Self::new("md", "jsonld")
    }
}

impl Extractor for MarkdownExtractor {
    fn name(&self) -> &str {
        "markdown"
    }

    fn extract(
        &self,
        record: &mut DocumentRecord,
        document: &DocumentPath,
    ) -> Result<(), ExtractionError> {
        let path = document.absolute();
        let bytes = std::fs::read(path).map_err(|e| ExtractionError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let content = String::from_utf8(bytes).map_err(|e| ExtractionError::Malformed {
            path: path.to_path_buf(),
            detail: format!("not valid UTF-8: {e}"),
        })?;
        let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);

        let parsed = self.parse(content);
        debug!(
            "{}: {} headings, {} words",
            document,
            parsed.headings.len(),
            parsed.word_count
        );

        if let Some(title) = parsed.title {
            record.insert("name", title);
        }
        if !parsed.headings.is_empty() {
            record.insert(
                "headline",
                Value::Array(parsed.headings.into_iter().map(Value::String).collect()),
            );
        }
        record.insert("text", parsed.text);
        record.insert("wordCount", parsed.word_count);
        record.insert("encodingFormat", "text/markdown");
        Ok(())
    }
}

/// What one pass over a Markdown document yields.
#[derive(Debug, Default, PartialEq)]
struct ParsedMarkdown {
    title: Option<String>,
    headings: Vec<String>,
    text: String,
    word_count: u64,
}

impl MarkdownExtractor {
    fn parse(&self, content: &str) -> ParsedMarkdown {
        let mut parsed = ParsedMarkdown {
            text: String::with_capacity(content.len()),
            ..Default::default()
        };
        let mut fence: Option<String> = None;

        for line in content.split_inclusive('\n') {
            let bare = line.trim_end_matches(['\n', '\r']);

            if let Some(open) = &fence {
                if closes_fence(bare, open) {
                    fence = None;
                }
                parsed.word_count += count_words(bare);
                parsed.text.push_str(line);
                continue;
            }
            if let Some(caps) = RE_FENCE.captures(bare) {
                fence = Some(caps[1].to_string());
                parsed.text.push_str(line);
                continue;
            }

            if let Some(caps) = RE_ATX_HEADING.captures(bare) {
                let text = RE_CLOSING_HASHES.replace(&caps[2], "").trim().to_string();
                if !text.is_empty() {
                    if caps[1].len() == 1 && parsed.title.is_none() {
                        parsed.title = Some(text.clone());
                    }
                    parsed.headings.push(text);
                }
            }

            parsed.word_count += count_words(bare);
            parsed.text.push_str(&self.rewrite_links(line));
        }

        parsed
    }

    /// Point relative links at `*.md` documents to their `*.jsonld` records.
    fn rewrite_links(&self, line: &str) -> String {
        RE_INLINE_LINK
            .replace_all(line, |caps: &Captures| {
                format!("]({}{})", self.rewrite_target(&caps[1]), &caps[2])
            })
            .into_owned()
    }

    fn rewrite_target(&self, target: &str) -> String {
        if RE_URL_SCHEME.is_match(target) || target.starts_with('#') {
            return target.to_string();
        }
        let split = target.find(['#', '?']).unwrap_or(target.len());
        let (path, rest) = target.split_at(split);
        match path.strip_suffix(&self.source_suffix) {
            Some(stem) if !stem.is_empty() => format!("{stem}{}{rest}", self.output_suffix),
            _ => target.to_string(),
        }
    }
}

/// A closing fence is a run of the opening fence character, at least as
/// long as the opener, with nothing else on the line.
fn closes_fence(line: &str, open: &str) -> bool {
    let run = line.trim();
    let Some(ch) = open.chars().next() else {
        return false;
    };
    run.len() >= open.len() && run.chars().all(|c| c == ch)
}

fn count_words(line: &str) -> u64 {
    line.split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .count() as u64
}
