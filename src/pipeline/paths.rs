//! Path mapping between the input tree and the output tree.
//!
//! Documents are identified by a [`DocumentPath`]: the path relative to the
//! input root, with `/` separators on every platform. The absolute location
//! is resolved once at discovery time and carried alongside, so no stage
//! ever needs to change the process working directory.
//!
//! [`PathMapper`] is a pure rule: swap the trailing source extension for the
//! output extension and keep every directory segment. Only the *trailing*
//! extension is replaced. A directory literally named `notes.md/` keeps its
//! name, and the manifest entry always matches the written file.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// An input-relative, slash-normalised path to one source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    relative: String,
    absolute: PathBuf,
}

impl DocumentPath {
    /// Build a document path from the absolute input root and a path
    /// relative to it.
    pub fn new(root: &Path, relative: &Path) -> Self {
        Self {
            relative: normalise(relative),
            absolute: join_components(root, relative),
        }
    }

    /// The slash-separated path relative to the input root.
    pub fn as_str(&self) -> &str {
        &self.relative
    }

    /// The absolute path of the source document on disk.
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative)
    }
}

impl AsRef<str> for DocumentPath {
    fn as_ref(&self) -> &str {
        &self.relative
    }
}

/// Maps document paths to record paths by extension substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapper {
    source_suffix: String,
    output_suffix: String,
}

impl PathMapper {
    /// Create a mapper from bare extensions (`"md"`, `"jsonld"`).
    pub fn new(source_extension: &str, output_extension: &str) -> Self {
        Self {
            source_suffix: format!(".{source_extension}"),
            output_suffix: format!(".{output_extension}"),
        }
    }

    /// Whether a file name carries the recognised source extension.
    ///
    /// Compares raw bytes, so a name that is not valid UTF-8 is still
    /// recognised.
    pub fn is_source(&self, file_name: impl AsRef<OsStr>) -> bool {
        let name = file_name.as_ref().as_encoded_bytes();
        let suffix = self.source_suffix.as_bytes();
        name.len() > suffix.len() && name.ends_with(suffix)
    }

    /// Map an input-relative document path to an output-relative record path.
    ///
    /// `a/b/doc.md` → `a/b/doc.jsonld`. A path without the source extension
    /// gets the output extension appended.
    pub fn map(&self, document: &str) -> String {
        match document.strip_suffix(&self.source_suffix) {
            Some(stem) => format!("{stem}{}", self.output_suffix),
            None => format!("{document}{}", self.output_suffix),
        }
    }

    /// Absolute location of a record path under `output_root`.
    pub fn output_path(&self, output_root: &Path, record: &str) -> PathBuf {
        join_slashed(output_root, record)
    }

    /// The directory that must exist before `output_path` can be written.
    pub fn output_dir(output_path: &Path) -> Option<&Path> {
        output_path.parent()
    }
}

/// Render a relative path with `/` separators, dropping `.` segments.
fn normalise(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Append the normal and `..` segments of `relative` to `root` without
/// passing them through a lossy string.
fn join_components(root: &Path, relative: &Path) -> PathBuf {
    relative
        .components()
        .fold(root.to_path_buf(), |mut acc, c| {
            match c {
                Component::Normal(s) => acc.push(s),
                Component::ParentDir => acc.push(".."),
                _ => {}
            }
            acc
        })
}

fn join_slashed(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |acc, seg| acc.join(seg))
}
