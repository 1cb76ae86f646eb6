//! Directory discovery: list every source document under the input root.
//!
//! ## Ordering
//!
//! The manifest lists documents in discovery order, and two runs over the
//! same tree must produce identical manifests. Siblings are visited in
//! file-name order; the walk itself is depth-first.
//!
//! ## Errors
//!
//! The first unreadable entry aborts the whole scan. Nothing is skipped: a
//! source document whose path is not valid UTF-8 cannot be named in the
//! manifest, so it is an error too. The root itself must be a directory.

use crate::error::Md2JsonLdError;
use crate::pipeline::paths::{DocumentPath, PathMapper};
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Walk `root` and return every regular file carrying the source extension,
/// in depth-first, file-name order.
///
/// `root` must already be absolute. Directories are always descended
/// (symlinked ones too when `follow_links` is set); files without the
/// source extension are skipped.
pub fn scan_documents(
    root: &Path,
    mapper: &PathMapper,
    follow_links: bool,
) -> Result<Vec<DocumentPath>, Md2JsonLdError> {
    let is_dir = std::fs::metadata(root)
        .map_err(|e| Md2JsonLdError::Scan {
            root: root.to_path_buf(),
            detail: e.to_string(),
        })?
        .is_dir();
    if !is_dir {
        return Err(Md2JsonLdError::Scan {
            root: root.to_path_buf(),
            detail: "input root is not a directory".into(),
        });
    }

    let walker = WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name();

    let mut documents = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| Md2JsonLdError::Scan {
            root: root.to_path_buf(),
            detail: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if !mapper.is_source(entry.file_name()) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Md2JsonLdError::Scan {
                root: root.to_path_buf(),
                detail: format!("{}: {e}", entry.path().display()),
            })?;
        if relative.to_str().is_none() {
            return Err(Md2JsonLdError::Scan {
                root: root.to_path_buf(),
                detail: format!("{}: path is not valid UTF-8", entry.path().display()),
            });
        }
        let doc = DocumentPath::new(root, relative);
        debug!("Discovered {}", doc);
        documents.push(doc);
    }

    info!("Found {} documents under {}", documents.len(), root.display());
    Ok(documents)
}
