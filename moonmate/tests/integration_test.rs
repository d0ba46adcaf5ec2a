//! Integration tests for MoonMate
//!
//! These tests verify end-to-end functionality including:
//! - Document persistence and reload
//! - Settings fallback
//! - Text improvement through the configured client

use moonmate::app::{setup, AppState};
use moonmate::commands;
use moonmate::config::{AppConfig, ClientBackend, ClientConfig};
use moonmate::services::{ChatSession, DiffLine, MessageKind, TextImprovementClient};
use moonmate::storage::{Document, DocumentStore, Settings, SettingsStore, Theme};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn test_config(data_dir: &Path) -> AppConfig {
    AppConfig {
        data_dir: data_dir.to_path_buf(),
        client: ClientConfig {
            mock_delay: Duration::ZERO,
            ..ClientConfig::default()
        },
    }
}

/// Helper to create application state in a fresh data directory
async fn create_test_app() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let state = setup(test_config(temp_dir.path())).await.unwrap();
    (state, temp_dir)
}

#[tokio::test]
async fn test_document_list_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::new(temp_dir.path().to_path_buf());
    store.initialize().await.unwrap();

    let documents: Vec<Document> = (0..5)
        .map(|i| Document::with_content(format!("Doc {}", i), format!("body number {}", i)))
        .collect();

    store.save(&documents).await.unwrap();
    let loaded = store.list().await.unwrap();

    assert_eq!(loaded, documents);

    // Saving the same list twice leaves identical bytes on disk
    let first = std::fs::read(store.list_path()).unwrap();
    store.save(&loaded).await.unwrap();
    let second = std::fs::read(store.list_path()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_create_edit_reload_workflow() {
    let temp_dir = TempDir::new().unwrap();

    let id = {
        let state = setup(test_config(temp_dir.path())).await.unwrap();
        let doc = commands::create_document(&state, None).await.unwrap();
        commands::update_document(
            &state,
            doc.id,
            Some("Draft".to_string()),
            Some("Hello world".to_string()),
        )
        .await
        .unwrap();
        doc.id
    };

    // Fresh state over the same directory
    let state = setup(test_config(temp_dir.path())).await.unwrap();
    let view_model = state.view_model.lock().await;

    assert_eq!(view_model.documents().len(), 2);
    assert_eq!(view_model.selected_id(), Some(id));

    let doc = view_model.selected_document().unwrap();
    assert_eq!(doc.title, "Draft");
    assert_eq!(doc.content, "Hello world");
    assert_eq!(doc.word_count(), 2);
    assert!(doc.modified_at >= doc.created_at);
}

#[tokio::test]
async fn test_delete_moves_selection() {
    let (state, _temp) = create_test_app().await;
    let first = commands::list_documents(&state).await[0].id;
    let second = commands::create_document(&state, Some("Second".to_string()))
        .await
        .unwrap();

    commands::delete_document(&state, second.id).await.unwrap();

    let list = commands::list_documents(&state).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, first);
    assert!(list[0].selected);

    let persisted = DocumentStore::new(state.config.data_dir.clone())
        .list()
        .await
        .unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].id, first);
}

#[tokio::test]
async fn test_corrupt_settings_fall_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("settings.json"), "{ not json").unwrap();

    let settings = SettingsStore::new(temp_dir.path().to_path_buf()).load().await;
    assert_eq!(settings, Settings::default());

    let state = setup(test_config(temp_dir.path())).await.unwrap();
    assert_eq!(commands::get_settings(&state).await.theme, Theme::Light);
}

#[tokio::test]
async fn test_settings_survive_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let state = setup(test_config(temp_dir.path())).await.unwrap();
        commands::update_settings(
            &state,
            commands::SettingsUpdate {
                toggle_theme: true,
                font_size: Some(20.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let state = setup(test_config(temp_dir.path())).await.unwrap();
    let settings = commands::get_settings(&state).await;
    assert_eq!(settings.theme, Theme::Dark);
    assert_eq!(settings.font_size, 20.0);
}

#[tokio::test]
async fn test_mock_chat_session() {
    let (state, _temp) = create_test_app().await;
    let mut session = ChatSession::new(Some("old".to_string()));

    let reply = session.send(&state.improver, "any prompt").await.unwrap();
    assert_eq!(reply.text, "Suggested Edit\n- old\n+ old");

    let ordered = session.ordered_messages();
    let kinds: Vec<MessageKind> = ordered.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MessageKind::SelectedText,
            MessageKind::Prompt,
            MessageKind::Response
        ]
    );
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_http_client_through_config() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/improve-text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "originalText": "teh cat",
            "improvedText": "Suggested Edit\n- teh cat\n+ the cat"
        })))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(temp_dir.path());
    config.client.backend = ClientBackend::Http;
    config.client.base_url = server.uri();

    let state = setup(config).await.unwrap();
    assert!(matches!(state.improver, TextImprovementClient::Http(_)));

    let lines = commands::improve_text(&state, "teh cat", "fix typos")
        .await
        .unwrap();

    assert_eq!(
        lines,
        vec![
            DiffLine::Header("Suggested Edit".to_string()),
            DiffLine::Removed("teh cat".to_string()),
            DiffLine::Added("the cat".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_http_failure_becomes_inline_error() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = TextImprovementClient::from_config(&ClientConfig {
        backend: ClientBackend::Http,
        base_url: server.uri(),
        ..ClientConfig::default()
    })
    .unwrap();

    let mut session = ChatSession::new(Some("text".to_string()));
    let reply = session.send(&client, "improve").await.unwrap();

    assert_eq!(reply.kind, MessageKind::Response);
    assert!(reply.text.starts_with("Error: "));
}
