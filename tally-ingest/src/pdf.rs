//! PDF text extraction.
//!
//! Returns one string per page that carries text, in page order. Encrypted
//! documents are first tried with the empty user password (owner-password-only
//! statements), then with the caller's password.
//!
//! Page text comes from `pdf-extract`, which places glyphs by position so
//! columns moved apart with `Td`/`Tm` stay separated by whitespace. Pages it
//! cannot handle fall back to lopdf's raw content-stream text.

use lopdf::Document;
use lopdf::encryption::DecryptionError;
use pdf_extract::PlainTextOutput;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{DocumentError, StatementError};

/// Extract the text of every non-empty page of the PDF at `path`.
pub fn extract_pages(path: impl AsRef<Path>, password: Option<&str>) -> Result<Vec<String>, DocumentError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read PDF");
    extract_pages_from_mem(&bytes, password)
}

/// Same as [`extract_pages`] for an in-memory document.
pub fn extract_pages_from_mem(bytes: &[u8], password: Option<&str>) -> Result<Vec<String>, DocumentError> {
    let doc = open_document(bytes, password)?;
    page_texts(&doc)
}

/// Like [`extract_pages`], but a document without any text is an error.
pub fn extract_pages_checked(path: impl AsRef<Path>, password: Option<&str>) -> Result<Vec<String>, StatementError> {
    let pages = extract_pages(path, password)?;
    if pages.is_empty() {
        return Err(StatementError::EmptyDocument);
    }
    Ok(pages)
}

fn open_document(bytes: &[u8], password: Option<&str>) -> Result<Document, DocumentError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| {
        let msg = e.to_string();
        if password.is_none() && mentions_encryption(&msg) {
            DocumentError::PasswordRequired
        } else {
            DocumentError::Load(msg)
        }
    })?;

    if !doc.is_encrypted() {
        return Ok(doc);
    }

    // A failed attempt leaves the document untouched
    match doc.decrypt("") {
        Ok(()) => {
            debug!("opened encrypted PDF with the empty user password");
            Ok(doc)
        }
        Err(e) if is_incorrect_password(&e) => {
            let Some(pwd) = password else {
                return Err(DocumentError::PasswordRequired);
            };
            doc.decrypt(pwd).map_err(|e| {
                debug!(error = %e, "decryption failed");
                if is_incorrect_password(&e) {
                    DocumentError::InvalidPassword
                } else {
                    DocumentError::Decryption(e.to_string())
                }
            })?;
            Ok(doc)
        }
        Err(e) => Err(DocumentError::Decryption(e.to_string())),
    }
}

fn page_texts(doc: &Document) -> Result<Vec<String>, DocumentError> {
    let page_ids = doc.get_pages();
    let total = page_ids.len();
    let mut pages = Vec::with_capacity(total);

    for page_number in page_ids.into_keys() {
        let text = page_text(doc, page_number)?;
        if text.trim().is_empty() {
            debug!(page = page_number, "page has no text");
            continue;
        }
        pages.push(text);
    }

    info!(pages = total, with_text = pages.len(), "extracted PDF text");
    Ok(pages)
}

fn page_text(doc: &Document, page_number: u32) -> Result<String, DocumentError> {
    let mut text = String::new();
    let layout = {
        let mut output = PlainTextOutput::new(&mut text);
        pdf_extract::output_doc_page(doc, &mut output, page_number)
    };

    match layout {
        Ok(()) if !text.trim().is_empty() => return Ok(text),
        Ok(()) => debug!(page = page_number, "layout extraction found no text"),
        Err(e) => warn!(page = page_number, error = ?e, "layout extraction failed, using raw page text"),
    }

    doc.extract_text(&[page_number])
        .map_err(|e| DocumentError::Extraction {
            page: page_number,
            reason: e.to_string(),
        })
}

fn is_incorrect_password(e: &lopdf::Error) -> bool {
    matches!(e, lopdf::Error::Decryption(DecryptionError::IncorrectPassword))
}

fn mentions_encryption(msg: &str) -> bool {
    let msg = msg.to_ascii_lowercase();
    msg.contains("encrypt") || msg.contains("password")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{columnar_statement_pdf, encrypted_statement_pdf, statement_pdf};
    use crate::parse_pages;

    const TALABAT: &[&str] = &["05/01/2024 TALABAT DELIVERY 45.00"];

    #[test]
    fn test_garbage_bytes_fail_to_load() {
        let err = extract_pages_from_mem(b"definitely not a pdf", None).unwrap_err();
        assert!(matches!(err, DocumentError::Load(_)), "got {err:?}");
    }

    #[test]
    fn test_truncated_document_fails_to_load() {
        let err = extract_pages_from_mem(b"%PDF-1.5\nthis is truncated", None).unwrap_err();
        assert!(matches!(err, DocumentError::Load(_)), "got {err:?}");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = extract_pages("/nonexistent/statement.pdf", None).unwrap_err();
        match err {
            DocumentError::Io { path, .. } => assert!(path.ends_with("statement.pdf")),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_encryption_hint_detection() {
        assert!(mentions_encryption("Document is Encrypted"));
        assert!(mentions_encryption("bad password"));
        assert!(!mentions_encryption("invalid xref"));
    }

    #[test]
    fn test_extracts_pages_in_order_and_skips_blank_pages() {
        let pdf = statement_pdf(&[
            &["Statement Period: January 2024", "05/01/2024 TALABAT DELIVERY 45.00"],
            &[],
            &["06/01/2024 SALARY CREDIT -5000.00"],
        ])
        .unwrap();

        let pages = extract_pages_from_mem(&pdf, None).unwrap();
        assert_eq!(pages.len(), 2, "blank page should be omitted: {pages:?}");
        assert!(pages[0].contains("TALABAT DELIVERY"));
        assert!(pages[1].contains("SALARY CREDIT"));

        let parsed = parse_pages(&pages);
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[0].amount, 45.0);
        assert_eq!(parsed.lines[1].amount, -5000.0);
    }

    #[test]
    fn test_columns_placed_with_td_stay_separated() {
        let pdf = columnar_statement_pdf(&[
            ["05/01/2024", "TALABAT DELIVERY", "45.00"],
            ["06/01/2024", "SALARY CREDIT", "-5000.00"],
        ])
        .unwrap();

        let pages = extract_pages_from_mem(&pdf, None).unwrap();
        let parsed = parse_pages(&pages);
        assert_eq!(parsed.stats.matched, 2, "text was {pages:?}");
        assert_eq!(parsed.stats.unmatched, 0);
        assert_eq!(parsed.lines[0].description, "TALABAT DELIVERY");
        assert_eq!(parsed.lines[0].amount, 45.0);
        assert_eq!(parsed.lines[1].description, "SALARY CREDIT");
        assert_eq!(parsed.lines[1].amount, -5000.0);
    }

    #[test]
    fn test_extract_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.pdf");
        fs::write(&path, statement_pdf(&[&["01/03/2024 CARREFOUR DUBAI MALL 125.50"]]).unwrap()).unwrap();

        let pages = extract_pages(&path, None).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("CARREFOUR DUBAI MALL"));
    }

    #[test]
    fn test_document_without_text_is_empty_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.pdf");
        fs::write(&path, statement_pdf(&[&[]]).unwrap()).unwrap();

        let err = extract_pages_checked(&path, None).unwrap_err();
        assert!(matches!(err, StatementError::EmptyDocument), "got {err:?}");
    }

    #[test]
    fn test_user_password_required() {
        let pdf = encrypted_statement_pdf(&[TALABAT], "1234", "owner").unwrap();
        let err = extract_pages_from_mem(&pdf, None).unwrap_err();
        assert!(matches!(err, DocumentError::PasswordRequired), "got {err:?}");
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let pdf = encrypted_statement_pdf(&[TALABAT], "1234", "owner").unwrap();
        let err = extract_pages_from_mem(&pdf, Some("9999")).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidPassword), "got {err:?}");
    }

    #[test]
    fn test_correct_password_decrypts() {
        let pdf = encrypted_statement_pdf(&[TALABAT], "1234", "owner").unwrap();
        let pages = extract_pages_from_mem(&pdf, Some("1234")).unwrap();
        let parsed = parse_pages(&pages);
        assert_eq!(parsed.lines.len(), 1);
        assert_eq!(parsed.lines[0].description, "TALABAT DELIVERY");
    }

    #[test]
    fn test_owner_password_only_opens_without_password() {
        let pdf = encrypted_statement_pdf(&[TALABAT], "", "owner").unwrap();
        for password in [None, Some(""), Some("anything")] {
            let pages = extract_pages_from_mem(&pdf, password).unwrap();
            assert_eq!(pages.len(), 1, "password {password:?}");
            assert!(pages[0].contains("TALABAT DELIVERY"));
        }
    }
}
