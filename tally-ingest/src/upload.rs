//! Staging of uploaded statement bytes.
//!
//! An upload is written to a temporary file that lives exactly as long as the
//! [`StagedUpload`] guard. The file is removed on drop, whether parsing
//! succeeded or not.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StatementError;

#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    source_name: String,
}

impl StagedUpload {
    /// Write `bytes` into a fresh temporary file inside `dir`.
    pub fn stage(dir: impl AsRef<Path>, filename: &str, bytes: &[u8]) -> Result<Self, StatementError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(StatementError::Staging)?;

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".pdf")
            .tempfile_in(dir)
            .map_err(StatementError::Staging)?;
        file.write_all(bytes).map_err(StatementError::Staging)?;
        file.flush().map_err(StatementError::Staging)?;

        debug!(path = %file.path().display(), bytes = bytes.len(), "staged upload");
        Ok(Self {
            file,
            source_name: source_basename(filename),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Client-supplied file name reduced to its basename
    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}

/// Basename of a client-supplied path, with both separator styles stripped.
pub fn source_basename(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name).trim();
    if base.is_empty() || base == "." || base == ".." {
        "upload.pdf".to_string()
    } else {
        base.to_string()
    }
}

/// Basename of a local path, for report metadata
pub fn path_basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_basename(&path.to_string_lossy()))
}

/// Default staging directory under the system temp dir
pub fn default_upload_dir() -> PathBuf {
    std::env::temp_dir().join("tally-uploads")
}
