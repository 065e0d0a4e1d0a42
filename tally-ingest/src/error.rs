//! Error types for document loading and statement extraction

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The PDF could not be opened, decrypted or read. Always fatal.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load PDF: {0}")]
    Load(String),

    #[error("PDF is encrypted and no password was given")]
    PasswordRequired,

    #[error("incorrect password for encrypted PDF")]
    InvalidPassword,

    #[error("cannot decrypt PDF: {0}")]
    Decryption(String),

    #[error("failed to extract text from page {page}: {reason}")]
    Extraction { page: u32, reason: String },
}

/// Fatal failures of a whole statement run
#[derive(Error, Debug)]
pub enum StatementError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("no text could be extracted from the PDF")]
    EmptyDocument,

    #[error("failed to stage uploaded file: {0}")]
    Staging(#[source] io::Error),
}

