//! Output writes: directory creation and atomic file replacement.
//!
//! Sibling documents are converted concurrently, so several tasks may try to
//! create the same output subdirectory at once. `create_dir_all` treats an
//! existing directory as success, which makes the race harmless.
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! reader never observes a half-written record.

use crate::error::Md2JsonLdError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Permission bits for created output directories.
pub const DIR_MODE: u32 = 0o755;

/// Permission bits for written output files.
pub const FILE_MODE: u32 = 0o644;

/// Create `dir` and every missing parent. Existing directories are fine.
pub fn ensure_dir(dir: &Path) -> Result<(), Md2JsonLdError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(dir).map_err(|e| Md2JsonLdError::Write {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Write `bytes` to `path` via a temporary file and rename.
///
/// The parent directory must already exist.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Md2JsonLdError> {
    let tmp = tmp_path(path);
    let write_err = |source| Md2JsonLdError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    let mut file = options.open(&tmp).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    drop(file);

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        write_err(e)
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
