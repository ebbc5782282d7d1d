//! PDF text extraction for uploaded style guides.
//!
//! `pdf_extract` can panic on malformed input instead of returning an error, so the
//! call is wrapped in `catch_unwind`. Either way the caller gets all pages or nothing.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Document is empty")]
    Empty,

    #[error("PDF extraction failed: {0}")]
    Malformed(String),

    #[error("PDF extraction panicked (malformed document)")]
    Panicked,
}

/// Extracts the text of every page, in page order, each page followed by a newline.
pub fn extract_text(document: &[u8]) -> Result<String, ExtractionError> {
    if document.is_empty() {
        return Err(ExtractionError::Empty);
    }

    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(document)
    }))
    .map_err(|_| ExtractionError::Panicked)?
    .map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    debug!("Extracted {} PDF pages", pages.len());

    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}
