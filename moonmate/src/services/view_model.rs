//! Document view-model
//!
//! The single writer for documents, selection, settings and layout state.
//! UI layers read state through accessors and learn about changes by
//! subscribing to `ViewModelEvent`s.
//!
//! Persistence failures never escape a mutation: they are logged, kept in
//! the error slot and broadcast as `ViewModelEvent::Error`, while the
//! in-memory state stays usable.

use crate::config::{
    AUTO_SAVE_INTERVAL, DEFAULT_CHAT_SIDEBAR_WIDTH, MAX_CHAT_SIDEBAR_WIDTH,
    MIN_CHAT_SIDEBAR_WIDTH,
};
use crate::error::{AppError, Result};
use crate::storage::json_file::write_atomic;
use crate::storage::{
    clamp_font_size, Document, DocumentStore, ExportFormat, Settings, SettingsStore,
};
use std::path::Path;
use tokio::sync::broadcast;
use tokio::time::Instant;
use uuid::Uuid;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change notifications for observers of the view-model
#[derive(Debug, Clone, PartialEq)]
pub enum ViewModelEvent {
    DocumentsChanged,
    SelectionChanged(Option<Uuid>),
    SettingsChanged(Settings),
    LayoutChanged,
    Saved,
    Error(String),
}

/// Window layout state, kept in memory only
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    pub sidebar_visible: bool,
    pub chat_sidebar_visible: bool,
    pub chat_sidebar_width: f64,
    /// Text currently selected in the editor, quoted by the chat panel
    pub selected_text: String,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            sidebar_visible: true,
            chat_sidebar_visible: false,
            chat_sidebar_width: DEFAULT_CHAT_SIDEBAR_WIDTH,
            selected_text: String::new(),
        }
    }
}

pub struct DocumentViewModel {
    documents: Vec<Document>,
    selected_id: Option<Uuid>,
    settings: Settings,
    layout: LayoutState,
    error: Option<String>,
    last_save: Instant,
    document_store: DocumentStore,
    settings_store: SettingsStore,
    events: broadcast::Sender<ViewModelEvent>,
}

impl DocumentViewModel {
    /// Load settings and documents and restore the last selection.
    ///
    /// When the document list cannot be loaded a single blank document is
    /// created and persisted.
    pub async fn open(document_store: DocumentStore, settings_store: SettingsStore) -> Self {
        let settings = settings_store.load().await;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut view_model = Self {
            documents: Vec::new(),
            selected_id: None,
            settings,
            layout: LayoutState::default(),
            error: None,
            last_save: Instant::now(),
            document_store,
            settings_store,
            events,
        };

        if !view_model.document_store.list_path().exists() {
            tracing::info!("No document list found, starting with a blank document");
            view_model.create_document().await;
        } else {
            match view_model.document_store.list().await {
                Ok(documents) => view_model.documents = documents,
                Err(e) => {
                    tracing::error!("Failed to load documents: {}", e);
                    view_model.record_error(&e);
                    view_model.create_document().await;
                }
            }
        }

        view_model.selected_id = view_model
            .settings
            .last_opened_document_id
            .filter(|id| view_model.contains(*id))
            .or_else(|| view_model.documents.first().map(|d| d.id));

        tracing::info!(
            "Opened {} documents, selected: {:?}",
            view_model.documents.len(),
            view_model.selected_id
        );

        view_model
    }

    // ===== Observation =====

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ViewModelEvent> {
        self.events.subscribe()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, id: Uuid) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected_id
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.selected_id.and_then(|id| self.document(id))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    /// Most recent persistence or export failure
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// When the document list was last written successfully
    pub fn last_saved(&self) -> Instant {
        self.last_save
    }

    /// Status bar entries for the selected document, honouring the
    /// word/character count toggles
    pub fn status_bar(&self) -> Vec<String> {
        let Some(document) = self.selected_document() else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        if self.settings.show_word_count {
            entries.push(format!("{} words", document.word_count()));
        }
        if self.settings.show_character_count {
            entries.push(format!("{} characters", document.character_count()));
        }
        entries
    }

    // ===== Documents =====

    /// Append a blank document, persist the list and select it
    pub async fn create_document(&mut self) -> Uuid {
        let document = Document::new();
        let id = document.id;

        tracing::info!("Creating new document: {}", id);

        self.documents.push(document);
        self.emit(ViewModelEvent::DocumentsChanged);
        self.persist_documents().await;
        self.set_selection(Some(id)).await;

        id
    }

    /// Rename the selected document
    pub async fn update_title(&mut self, title: &str) {
        let Some(document) = self.selected_document_mut() else {
            return;
        };
        document.set_title(title);
        self.emit(ViewModelEvent::DocumentsChanged);
        self.persist_documents().await;
    }

    /// Replace the body of the selected document
    pub async fn update_content(&mut self, content: &str) {
        let Some(document) = self.selected_document_mut() else {
            return;
        };
        document.set_content(content);
        self.emit(ViewModelEvent::DocumentsChanged);
        self.persist_documents().await;
    }

    /// Remove a document. If it was selected, the first remaining document
    /// becomes selected, or nothing when the list is empty.
    pub async fn delete_document(&mut self, id: Uuid) -> bool {
        tracing::info!("Deleting document: {}", id);

        let removed = match self.document_store.delete(&mut self.documents, id).await {
            Ok(removed) => {
                if removed.is_some() {
                    self.last_save = Instant::now();
                }
                removed.is_some()
            }
            Err(e) => {
                tracing::error!("Failed to save documents after delete: {}", e);
                self.record_error(&e);
                // The in-memory removal stands even though the write failed
                !self.contains(id)
            }
        };

        if !removed {
            tracing::warn!("Document not found for delete: {}", id);
            return false;
        }

        if let Err(e) = self.document_store.remove_document_file(id).await {
            tracing::warn!("Failed to remove standalone copy of {}: {}", id, e);
        }

        self.emit(ViewModelEvent::DocumentsChanged);

        if self.selected_id == Some(id) {
            let next = self.documents.first().map(|d| d.id);
            self.set_selection(next).await;
        }

        true
    }

    /// Select a document (or nothing) and remember it as last opened.
    ///
    /// Unknown ids are ignored and return false.
    pub async fn select_document(&mut self, id: Option<Uuid>) -> bool {
        if let Some(id) = id {
            if !self.contains(id) {
                tracing::warn!("Ignoring selection of unknown document: {}", id);
                return false;
            }
        }
        self.set_selection(id).await;
        true
    }

    /// Explicit save of the document list
    pub async fn save_document(&mut self) -> bool {
        self.persist_documents().await
    }

    /// Persist documents and settings if the autosave interval has passed
    /// since the last save. Returns whether anything was written.
    pub async fn autosave(&mut self) -> bool {
        if !self.autosave_due() {
            return false;
        }

        tracing::debug!("Autosaving");
        let documents_saved = self.persist_documents().await;
        let settings_saved = self.persist_settings().await;
        documents_saved && settings_saved
    }

    pub fn autosave_due(&self) -> bool {
        self.last_save.elapsed() >= AUTO_SAVE_INTERVAL
    }

    /// Write the selected document to its own `<id>.json` file
    pub async fn save_document_copy(&mut self) -> Result<()> {
        let Some(document) = self.selected_document() else {
            return Err(AppError::Generic("No document selected".to_string()));
        };

        let result = self.document_store.save_document(document).await;
        if let Err(e) = &result {
            tracing::error!("Failed to save document copy: {}", e);
            self.record_error(e);
        }
        result
    }

    /// Load a document from its own `<id>.json` file, add it to the list
    /// and select it. A document already in the list is only selected.
    pub async fn load_document(&mut self, id: Uuid) -> Result<()> {
        if self.contains(id) {
            self.set_selection(Some(id)).await;
            return Ok(());
        }

        let document = match self.document_store.load_document(id).await {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Failed to load document {}: {}", id, e);
                self.record_error(&e);
                return Err(e);
            }
        };

        tracing::info!("Loaded document: {}", document.id);

        self.documents.push(document);
        self.emit(ViewModelEvent::DocumentsChanged);
        self.persist_documents().await;
        self.set_selection(Some(id)).await;

        Ok(())
    }

    /// Export the selected document.
    ///
    /// Only plain text is supported; it writes the content verbatim. With no
    /// selection an empty file is written.
    pub async fn export_document(
        &mut self,
        format: ExportFormat,
        destination: &Path,
    ) -> Result<()> {
        let result = match format {
            ExportFormat::Txt => {
                let content = self
                    .selected_document()
                    .map(|d| d.content.clone())
                    .unwrap_or_default();
                write_atomic(destination, content.as_bytes()).await
            }
            other => Err(AppError::UnsupportedFormat(other)),
        };

        match &result {
            Ok(()) => tracing::info!("Exported document to {:?}", destination),
            Err(e) => {
                tracing::error!("Failed to export document: {}", e);
                self.record_error(e);
            }
        }

        result
    }

    // ===== Settings =====

    pub async fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggled();
        self.settings_changed().await;
    }

    pub async fn update_show_word_count(&mut self, show: bool) {
        self.settings.show_word_count = show;
        self.settings_changed().await;
    }

    pub async fn update_show_character_count(&mut self, show: bool) {
        self.settings.show_character_count = show;
        self.settings_changed().await;
    }

    /// Set the editor font size, clamped to the supported range
    pub async fn set_font_size(&mut self, size: f64) {
        self.settings.font_size = clamp_font_size(size);
        self.settings_changed().await;
    }

    pub async fn adjust_font_size(&mut self, delta: f64) {
        self.set_font_size(self.settings.font_size + delta).await;
    }

    pub async fn set_font_name(&mut self, name: &str) {
        self.settings.font_name = name.to_string();
        self.settings_changed().await;
    }

    // ===== Layout =====

    pub fn toggle_sidebar(&mut self) {
        self.layout.sidebar_visible = !self.layout.sidebar_visible;
        self.emit(ViewModelEvent::LayoutChanged);
    }

    pub fn set_chat_sidebar_visible(&mut self, visible: bool) {
        self.layout.chat_sidebar_visible = visible;
        self.emit(ViewModelEvent::LayoutChanged);
    }

    pub fn toggle_chat_sidebar(&mut self) {
        self.set_chat_sidebar_visible(!self.layout.chat_sidebar_visible);
    }

    /// Resize the chat sidebar, clamped to [250, 500]
    pub fn update_chat_sidebar_width(&mut self, width: f64) {
        let width = if width.is_nan() {
            DEFAULT_CHAT_SIDEBAR_WIDTH
        } else {
            width.clamp(MIN_CHAT_SIDEBAR_WIDTH, MAX_CHAT_SIDEBAR_WIDTH)
        };
        self.layout.chat_sidebar_width = width;
        self.emit(ViewModelEvent::LayoutChanged);
    }

    pub fn set_selected_text(&mut self, text: &str) {
        self.layout.selected_text = text.to_string();
        self.emit(ViewModelEvent::LayoutChanged);
    }

    // ===== Internals =====

    fn contains(&self, id: Uuid) -> bool {
        self.documents.iter().any(|d| d.id == id)
    }

    fn selected_document_mut(&mut self) -> Option<&mut Document> {
        let id = self.selected_id?;
        self.documents.iter_mut().find(|d| d.id == id)
    }

    async fn set_selection(&mut self, id: Option<Uuid>) {
        self.selected_id = id;
        self.settings.last_opened_document_id = id;
        self.emit(ViewModelEvent::SelectionChanged(id));
        self.settings_changed().await;
    }

    async fn settings_changed(&mut self) {
        self.emit(ViewModelEvent::SettingsChanged(self.settings.clone()));
        self.persist_settings().await;
    }

    async fn persist_documents(&mut self) -> bool {
        match self.document_store.save(&self.documents).await {
            Ok(()) => {
                self.last_save = Instant::now();
                self.emit(ViewModelEvent::Saved);
                true
            }
            Err(e) => {
                tracing::error!("Failed to save documents: {}", e);
                self.record_error(&e);
                false
            }
        }
    }

    async fn persist_settings(&mut self) -> bool {
        match self.settings_store.save(&self.settings).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save settings: {}", e);
                self.record_error(&e);
                false
            }
        }
    }

    fn record_error(&mut self, error: &AppError) {
        let message = error.to_string();
        self.error = Some(message.clone());
        self.emit(ViewModelEvent::Error(message));
    }

    fn emit(&self, event: ViewModelEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
