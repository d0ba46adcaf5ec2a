//! Application state and initialization
//!
//! This module builds the stores, the view-model and the text-improvement
//! client from an `AppConfig` and hands them out through `AppState`.

use crate::config::{AppConfig, AUTO_SAVE_INTERVAL};
use crate::error::Result;
use crate::services::{AutosaveService, DocumentViewModel, TextImprovementClient};
use crate::storage::{DocumentStore, SettingsStore};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub view_model: Arc<Mutex<DocumentViewModel>>,
    pub improver: TextImprovementClient,
}

impl AppState {
    /// Start the periodic autosave for this state's view-model
    pub fn start_autosave(&self) -> AutosaveService {
        AutosaveService::start(self.view_model.clone(), AUTO_SAVE_INTERVAL)
    }
}

/// Application setup - called once on startup
pub async fn setup(config: AppConfig) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", config.data_dir);

    let document_store = DocumentStore::new(config.data_dir.clone());
    document_store.initialize().await?;
    let settings_store = SettingsStore::new(config.data_dir.clone());

    let view_model = DocumentViewModel::open(document_store, settings_store).await;
    let improver = TextImprovementClient::from_config(&config.client)?;

    tracing::info!("Application initialized successfully");

    Ok(AppState {
        config,
        view_model: Arc::new(Mutex::new(view_model)),
        improver,
    })
}
