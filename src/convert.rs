//! Tree conversion entry points.
//!
//! ## Run shape
//!
//! ```text
//! scan ──▶ spawn one task per document ──▶ build manifest ──▶ join all ──▶ write manifest
//!              │                                                 ▲
//!              └─ record → extractors → JSON → mkdir → write ────┘
//! ```
//!
//! Every document is converted by its own `spawn_blocking` task: extractors
//! read files and run `git`, which is blocking work. Tasks share nothing
//! mutable. Each owns its record and writes a distinct output path, so the
//! only synchronisation is the join barrier before the manifest write.
//!
//! The manifest is derived from the discovered paths, not from task results,
//! and is built while the tasks run. It is written only after every task has
//! succeeded; the first failure ends the run with no manifest on disk. Tasks
//! still in flight at that point are detached, not cancelled, so the state
//! of the output tree after a failure is undefined.
//!
//! All paths are resolved against absolute roots up front. The process
//! working directory is never changed.

use crate::config::ConversionConfig;
use crate::error::Md2JsonLdError;
use crate::output::ConversionReport;
use crate::pipeline::paths::{DocumentPath, PathMapper};
use crate::pipeline::{scan, serialize, write};
use crate::record::{DocumentRecord, Manifest};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// Convert every source document under `input_dir` into a record under
/// `output_dir`, then write the manifest.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Any failure is fatal and returned as-is: unresolvable roots, a scan
/// error, an extractor failure on any document, a serialisation failure, or
/// a write failure. No manifest is written when an error is returned.
pub async fn convert_tree(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Md2JsonLdError> {
    let total_start = Instant::now();

    // ── Step 1: Resolve roots ────────────────────────────────────────────
    let input_root = resolve_root(input_dir.as_ref())?;
    let output_root = resolve_root(output_dir.as_ref())?;
    info!(
        "Starting conversion: {} -> {}",
        input_root.display(),
        output_root.display()
    );

    // ── Step 2: Discover documents ───────────────────────────────────────
    let mapper = PathMapper::new(&config.source_extension, &config.output_extension);
    let documents = {
        let root = input_root.clone();
        let mapper = mapper.clone();
        let follow_links = config.follow_links;
        tokio::task::spawn_blocking(move || scan::scan_documents(&root, &mapper, follow_links))
            .await
            .map_err(|e| Md2JsonLdError::Internal(format!("Scan task panicked: {e}")))??
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(documents.len());
    }

    write::ensure_dir(&output_root)?;

    // ── Step 3: Fan out, one task per document ───────────────────────────
    let mut tasks: FuturesUnordered<_> = documents
        .iter()
        .map(|doc| {
            let doc = doc.clone();
            let output_root = output_root.clone();
            let config = config.clone();
            tokio::task::spawn_blocking(move || convert_and_report(&doc, &output_root, &config))
        })
        .collect();

    // ── Step 4: Manifest from discovery order ────────────────────────────
    let manifest = Manifest::new(documents.iter().map(|d| mapper.map(d.as_str())).collect());

    // ── Step 5: Join barrier ─────────────────────────────────────────────
    while let Some(joined) = tasks.next().await {
        joined.map_err(|e| Md2JsonLdError::Internal(format!("Conversion task panicked: {e}")))??;
    }

    // ── Step 6: Write the manifest, exactly once ─────────────────────────
    let manifest_path = output_root.join(&config.manifest_name);
    let bytes = serialize::to_json_bytes(&manifest, config.prettify).map_err(|e| {
        Md2JsonLdError::Serialization {
            path: config.manifest_name.clone(),
            source: e,
        }
    })?;
    write::write_atomic(&manifest_path, &bytes)?;

    let duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Conversion complete: {} documents, {}ms total",
        manifest.len(),
        duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(manifest.len());
    }

    Ok(ConversionReport {
        documents: manifest.elements,
        manifest_path,
        duration_ms,
    })
}

/// Synchronous wrapper around [`convert_tree`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_tree_sync(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Md2JsonLdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Md2JsonLdError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert_tree(input_dir, output_dir, config))
}

/// Convert one document and write its record under `output_root`.
///
/// Allocates a fresh record, applies the extractor chain, serialises the
/// result and writes it to the mapped path, creating parent directories as
/// needed. Returns the absolute path of the written record.
pub fn convert_document(
    document: &DocumentPath,
    output_root: &Path,
    config: &ConversionConfig,
) -> Result<PathBuf, Md2JsonLdError> {
    let mapper = PathMapper::new(&config.source_extension, &config.output_extension);

    let mut record = DocumentRecord::creative_work();
    config
        .extractors
        .apply(&mut record, document)
        .map_err(|e| Md2JsonLdError::Extraction {
            path: document.as_str().to_string(),
            source: e,
        })?;

    let bytes = serialize::to_json_bytes(&record, config.prettify).map_err(|e| {
        Md2JsonLdError::Serialization {
            path: document.as_str().to_string(),
            source: e,
        }
    })?;

    let out = mapper.output_path(output_root, &mapper.map(document.as_str()));
    if let Some(dir) = PathMapper::output_dir(&out) {
        write::ensure_dir(dir)?;
    }
    write::write_atomic(&out, &bytes)?;

    debug!("Wrote {} ({} bytes)", out.display(), bytes.len());
    Ok(out)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Per-task body: convert, then notify the progress callback.
fn convert_and_report(
    document: &DocumentPath,
    output_root: &Path,
    config: &ConversionConfig,
) -> Result<PathBuf, Md2JsonLdError> {
    let result = convert_document(document, output_root, config);
    match &result {
        Ok(_) => {
            if let Some(ref cb) = config.progress_callback {
                let record = PathMapper::new(&config.source_extension, &config.output_extension)
                    .map(document.as_str());
                cb.on_document_complete(document.as_str(), &record);
            }
        }
        Err(e) => {
            error!("Failed to convert {}: {}", document, e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_document_error(document.as_str(), &e.to_string());
            }
        }
    }
    result
}

fn resolve_root(path: &Path) -> Result<PathBuf, Md2JsonLdError> {
    std::path::absolute(path).map_err(|e| Md2JsonLdError::PathResolution {
        path: path.to_path_buf(),
        source: e,
    })
}
