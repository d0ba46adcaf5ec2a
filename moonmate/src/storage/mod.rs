//! Storage module
//!
//! File-backed persistence for documents and settings.

pub mod documents;
pub mod json_file;
pub mod models;
pub mod settings;

pub use documents::DocumentStore;
pub use models::*;
pub use settings::SettingsStore;
