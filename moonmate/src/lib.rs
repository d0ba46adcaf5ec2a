//! MoonMate library
//!
//! Document and settings persistence, the document view-model, and the
//! text-improvement chat panel, independent of any UI toolkit.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod services;
pub mod storage;
