//! JSON document store.
//!
//! Documents live under a single root directory as `<uuid>.json`, one file
//! per document, in the [`dto`] wire format. The engine itself has no
//! opinion on persistence; this module is the host-side store the cli (and
//! any other frontend) shares.

pub mod dto;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::models::{Document, DocumentId, DocumentSummary};
use dto::{DocumentDto, DtoError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),
    #[error("invalid documents directory: {0}")]
    InvalidDocumentsDir(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document file {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode document: {0}")]
    Encode(serde_json::Error),
    #[error(transparent)]
    Dto(#[from] DtoError),
}

pub fn validate_documents_dir(path: &Path) -> Result<(), StoreError> {
    if !path.exists() || !path.is_dir() {
        return Err(StoreError::InvalidDocumentsDir(
            "directory does not exist".to_string(),
        ));
    }
    Ok(())
}

fn document_path(root: &Path, id: DocumentId) -> PathBuf {
    root.join(format!("{id}.json"))
}

/// Write a document to `<root>/<id>.json`, creating the root if needed.
pub fn save_document(root: &Path, doc: &Document) -> Result<(), StoreError> {
    fs::create_dir_all(root)?;
    let dto = DocumentDto::from_domain(doc);
    let json = serde_json::to_string_pretty(&dto).map_err(StoreError::Encode)?;
    fs::write(document_path(root, doc.id), json)?;
    debug!(id = %doc.id, title = %doc.title, "document saved");
    Ok(())
}

pub fn load_document(root: &Path, id: DocumentId) -> Result<Document, StoreError> {
    let path = document_path(root, id);
    if !path.exists() {
        return Err(StoreError::NotFound(id));
    }
    read_document_file(&path)
}

pub fn delete_document(root: &Path, id: DocumentId) -> Result<(), StoreError> {
    let path = document_path(root, id);
    if !path.exists() {
        return Err(StoreError::NotFound(id));
    }
    fs::remove_file(path)?;
    debug!(%id, "document deleted");
    Ok(())
}

/// Summaries of every document under the root, newest first.
pub fn list_documents(root: &Path) -> Result<Vec<DocumentSummary>, StoreError> {
    validate_documents_dir(root)?;

    let mut summaries = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            summaries.push(read_document_file(&path)?.summary());
        }
    }
    summaries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));
    Ok(summaries)
}

/// The journal entry for `day`, if one has been created.
pub fn load_journal(root: &Path, day: NaiveDate) -> Result<Option<Document>, StoreError> {
    validate_documents_dir(root)?;

    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        let doc = read_document_file(&path)?;
        if doc.is_journal && doc.day() == day {
            return Ok(Some(doc));
        }
    }
    Ok(None)
}

/// Today's journal entry, created (and saved) on first access.
pub fn load_or_create_todays_journal(root: &Path) -> Result<Document, StoreError> {
    let today = Utc::now().date_naive();
    if let Some(doc) = load_journal(root, today)? {
        return Ok(doc);
    }
    let doc = Document::journal_for(today);
    save_document(root, &doc)?;
    debug!(id = %doc.id, "created today's journal");
    Ok(doc)
}

fn read_document_file(path: &Path) -> Result<Document, StoreError> {
    let content = fs::read_to_string(path)?;
    let dto: DocumentDto =
        serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(dto.to_domain()?)
}
