//! Document store
//!
//! Persists the full document list as a single JSON array in
//! `documents.json`. Individual documents can also be written to and read
//! from `<id>.json` files in the same directory.

use super::json_file::{read_json, write_json};
use super::models::Document;
use crate::config::DOCUMENTS_FILE_NAME;
use crate::error::{AppError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// File-backed document store
#[derive(Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Create a store rooted at the application data directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the data directory if needed
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Document store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Load all documents in persisted order.
    ///
    /// A missing, unreadable or corrupt list is a `Storage` error. When an id
    /// appears more than once only its first entry is kept.
    pub async fn list(&self) -> Result<Vec<Document>> {
        let mut documents: Vec<Document> = read_json(&self.list_path()).await?;

        let mut seen = HashSet::with_capacity(documents.len());
        documents.retain(|d| {
            let first = seen.insert(d.id);
            if !first {
                tracing::warn!("Dropping duplicate document entry: {}", d.id);
            }
            first
        });

        tracing::debug!("Loaded {} documents", documents.len());
        Ok(documents)
    }

    /// Overwrite the persisted list with `documents`
    pub async fn save(&self, documents: &[Document]) -> Result<()> {
        write_json(&self.list_path(), documents).await?;
        tracing::debug!("Saved {} documents", documents.len());
        Ok(())
    }

    /// Remove the document with `id` from `documents`, then persist the list.
    ///
    /// Returns the removed document, or `None` (and writes nothing) when no
    /// document has that id.
    pub async fn delete(
        &self,
        documents: &mut Vec<Document>,
        id: Uuid,
    ) -> Result<Option<Document>> {
        let Some(index) = documents.iter().position(|d| d.id == id) else {
            return Ok(None);
        };

        let removed = documents.remove(index);
        self.save(documents).await?;

        tracing::debug!("Deleted document: {}", id);

        Ok(Some(removed))
    }

    /// Write a single document to `<id>.json`
    pub async fn save_document(&self, document: &Document) -> Result<()> {
        write_json(&self.document_path(document.id), document).await
    }

    /// Read a single document from `<id>.json`
    pub async fn load_document(&self, id: Uuid) -> Result<Document> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(AppError::DocumentNotFound(id.to_string()));
        }
        read_json(&path).await
    }

    /// Remove `<id>.json` if present
    pub async fn remove_document_file(&self, id: Uuid) -> Result<()> {
        let path = self.document_path(id);
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).await?;
        Ok(())
    }

    /// Path of the list file
    pub fn list_path(&self) -> PathBuf {
        self.root.join(DOCUMENTS_FILE_NAME)
    }

    fn document_path(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}
