//! Reading and writing the comparison document.

use std::path::Path;

use comoprecio_core::{write_json, ComparisonDocument};

use crate::error::ScraperError;

/// Writes `doc` as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`ScraperError::Output`] if the document cannot be written.
pub fn save_document(path: &Path, doc: &ComparisonDocument) -> Result<(), ScraperError> {
    write_json(path, doc)?;

    tracing::info!(path = %path.display(), products = doc.products.len(), "comparison document saved");
    Ok(())
}

/// Loads a previously saved document, or an empty one when the file is
/// missing or unreadable.
#[must_use]
pub fn load_existing(path: &Path) -> ComparisonDocument {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no existing document");
            return ComparisonDocument::empty();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "existing document is not valid JSON, starting empty");
        ComparisonDocument::empty()
    })
}
