//! Persisted models
//!
//! Rust structs for everything written to the data directory.
//! Field names are camelCase on disk.

use crate::config::{
    DEFAULT_DOCUMENT_TITLE, DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

/// A single user note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Document {
    /// Create a blank "Untitled" document with a fresh id
    pub fn new() -> Self {
        Self::with_content(DEFAULT_DOCUMENT_TITLE, "")
    }

    pub fn with_content(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Number of whitespace-delimited words in the content
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Number of user-perceived characters in the content
    pub fn character_count(&self) -> usize {
        self.content.graphemes(true).count()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Editor colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// User preferences, one per install
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_name")]
    pub font_name: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub show_word_count: bool,
    #[serde(default)]
    pub show_character_count: bool,
    #[serde(default)]
    pub last_opened_document_id: Option<Uuid>,
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_name() -> String {
    DEFAULT_FONT_NAME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            font_name: default_font_name(),
            theme: Theme::default(),
            show_word_count: true,
            show_character_count: false,
            last_opened_document_id: None,
        }
    }
}

/// Clamp a font size into the supported range. NaN maps to the default.
pub fn clamp_font_size(size: f64) -> f64 {
    if size.is_nan() {
        return DEFAULT_FONT_SIZE;
    }
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Export target format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Rtf,
    Pdf,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Rtf => "rtf",
            ExportFormat::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" => Ok(ExportFormat::Txt),
            "rtf" => Ok(ExportFormat::Rtf),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}
