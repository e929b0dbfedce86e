//! Document text extraction — turns an untrusted PDF payload into plain text.
//!
//! Pure transform over the bytes: no storage access, no network. Any payload
//! that cannot be parsed as a well-formed PDF, or that parses to nothing but
//! whitespace, is rejected with `AppError::Extraction`.

use crate::errors::AppError;

/// Extracts plain text from a PDF payload.
pub fn extract_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("failed to parse PDF: {e}")))?;
    reject_if_blank(text)
}

/// A document that parses but contains no extractable text is unusable:
/// there is nothing to analyze, so fail before any AI call is made.
fn reject_if_blank(text: String) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Extraction(
            "no text could be extracted from the document".to_string(),
        ));
    }
    Ok(text)
}
