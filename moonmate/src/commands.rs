//! Commands exposed to front-ends
//!
//! All commands follow the pattern:
//! - Take AppState as first parameter
//! - Return Result<T, AppError>
//! - Surface persistence failures recorded by the view-model as errors

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::services::{render_response, ChatSession, DiffLine, DocumentViewModel, SearchState};
use crate::storage::{Document, ExportFormat, Settings};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

/// Row in the document list
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: Uuid,
    pub title: String,
    pub word_count: usize,
    pub selected: bool,
}

/// Application information
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
}

/// Partial settings change; `None` leaves a field untouched
#[derive(Debug, Default, Clone)]
pub struct SettingsUpdate {
    pub toggle_theme: bool,
    pub font_size: Option<f64>,
    pub font_name: Option<String>,
    pub show_word_count: Option<bool>,
    pub show_character_count: Option<bool>,
}

pub fn get_app_info(state: &AppState) -> AppInfo {
    AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.config.data_dir.to_string_lossy().to_string(),
    }
}

// ===== Document Commands =====

pub async fn list_documents(state: &AppState) -> Vec<DocumentSummary> {
    let view_model = state.view_model.lock().await;
    let selected = view_model.selected_id();

    view_model
        .documents()
        .iter()
        .map(|d| DocumentSummary {
            id: d.id,
            title: d.title.clone(),
            word_count: d.word_count(),
            selected: Some(d.id) == selected,
        })
        .collect()
}

pub async fn create_document(state: &AppState, title: Option<String>) -> Result<Document> {
    let mut view_model = state.view_model.lock().await;
    view_model.clear_error();

    let id = view_model.create_document().await;
    if let Some(title) = title {
        view_model.update_title(&title).await;
    }
    check_error(&mut view_model)?;

    find(&view_model, id)
}

/// Select a document and return it
pub async fn open_document(state: &AppState, id: Uuid) -> Result<Document> {
    let mut view_model = state.view_model.lock().await;
    view_model.clear_error();

    if !view_model.select_document(Some(id)).await {
        return Err(AppError::DocumentNotFound(id.to_string()));
    }
    check_error(&mut view_model)?;

    find(&view_model, id)
}

pub async fn update_document(
    state: &AppState,
    id: Uuid,
    title: Option<String>,
    content: Option<String>,
) -> Result<Document> {
    let mut view_model = state.view_model.lock().await;
    view_model.clear_error();

    if !view_model.select_document(Some(id)).await {
        return Err(AppError::DocumentNotFound(id.to_string()));
    }
    if let Some(title) = title {
        view_model.update_title(&title).await;
    }
    if let Some(content) = content {
        view_model.update_content(&content).await;
    }
    check_error(&mut view_model)?;

    find(&view_model, id)
}

pub async fn delete_document(state: &AppState, id: Uuid) -> Result<()> {
    let mut view_model = state.view_model.lock().await;
    view_model.clear_error();

    if !view_model.delete_document(id).await {
        return Err(AppError::DocumentNotFound(id.to_string()));
    }
    check_error(&mut view_model)
}

pub async fn export_document(
    state: &AppState,
    id: Uuid,
    format: ExportFormat,
    destination: &Path,
) -> Result<()> {
    let mut view_model = state.view_model.lock().await;
    view_model.clear_error();

    if !view_model.select_document(Some(id)).await {
        return Err(AppError::DocumentNotFound(id.to_string()));
    }
    view_model.export_document(format, destination).await
}

/// Write a standalone `<id>.json` copy of a document
pub async fn snapshot_document(state: &AppState, id: Uuid) -> Result<()> {
    let mut view_model = state.view_model.lock().await;
    view_model.clear_error();

    if !view_model.select_document(Some(id)).await {
        return Err(AppError::DocumentNotFound(id.to_string()));
    }
    view_model.save_document_copy().await
}

/// Bring a standalone `<id>.json` copy back into the document list
pub async fn restore_document(state: &AppState, id: Uuid) -> Result<Document> {
    let mut view_model = state.view_model.lock().await;
    view_model.clear_error();

    view_model.load_document(id).await?;
    find(&view_model, id)
}

/// Find `query` in a document's content
pub async fn find_in_document(state: &AppState, id: Uuid, query: &str) -> Result<SearchState> {
    let view_model = state.view_model.lock().await;
    let document = find(&view_model, id)?;

    let mut search = SearchState::new();
    search.update(&document.content, query);
    Ok(search)
}

// ===== Chat Commands =====

/// Ask the configured text improver about `selected_text` and return the
/// classified response lines
pub async fn improve_text(
    state: &AppState,
    selected_text: &str,
    prompt: &str,
) -> Result<Vec<DiffLine>> {
    let mut session = ChatSession::new(Some(selected_text.to_string()));

    let reply = session
        .send(&state.improver, prompt)
        .await
        .ok_or_else(|| {
            AppError::Generic("Selected text and prompt must not be empty".to_string())
        })?;

    Ok(render_response(&reply.text))
}

// ===== Settings Commands =====

pub async fn get_settings(state: &AppState) -> Settings {
    state.view_model.lock().await.settings().clone()
}

pub async fn update_settings(state: &AppState, update: SettingsUpdate) -> Result<Settings> {
    let mut view_model = state.view_model.lock().await;
    view_model.clear_error();

    if update.toggle_theme {
        view_model.toggle_theme().await;
    }
    if let Some(size) = update.font_size {
        view_model.set_font_size(size).await;
    }
    if let Some(name) = update.font_name {
        view_model.set_font_name(&name).await;
    }
    if let Some(show) = update.show_word_count {
        view_model.update_show_word_count(show).await;
    }
    if let Some(show) = update.show_character_count {
        view_model.update_show_character_count(show).await;
    }
    check_error(&mut view_model)?;

    Ok(view_model.settings().clone())
}

fn find(view_model: &DocumentViewModel, id: Uuid) -> Result<Document> {
    view_model
        .document(id)
        .cloned()
        .ok_or_else(|| AppError::DocumentNotFound(id.to_string()))
}

fn check_error(view_model: &mut DocumentViewModel) -> Result<()> {
    match view_model.take_error() {
        Some(message) => Err(AppError::Storage(message)),
        None => Ok(()),
    }
}
