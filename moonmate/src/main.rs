// MoonMate - distraction-free notes with a text-improvement side panel
// Entry point for the headless command-line front-end

use anyhow::Context;
use clap::{Parser, Subcommand};
use moonmate::app;
use moonmate::commands::{self, SettingsUpdate};
use moonmate::config::{AppConfig, ClientBackend};
use moonmate::services::DiffLine;
use moonmate::storage::ExportFormat;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "moonmate", version, about = "MoonMate notes from the command line")]
struct Cli {
    /// Directory holding documents.json and settings.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Text improvement backend: mock or http
    #[arg(long, global = true)]
    client: Option<ClientBackend>,

    /// Base URL of the text improvement service
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all documents
    List,
    /// Create a new document
    New {
        #[arg(long)]
        title: Option<String>,
    },
    /// Print a document and select it
    Show { id: Uuid },
    /// Change a document's title and/or content
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a document
    Delete { id: Uuid },
    /// Export a document's content
    Export {
        id: Uuid,
        destination: PathBuf,
        #[arg(long, default_value = "txt")]
        format: ExportFormat,
    },
    /// Write a standalone copy of a document
    Snapshot { id: Uuid },
    /// Bring a standalone copy back into the list
    Restore { id: Uuid },
    /// Find text in a document
    Find { id: Uuid, query: String },
    /// Ask the text improvement service to revise some text
    Improve { text: String, prompt: String },
    /// Show or change settings
    Settings {
        #[arg(long)]
        theme_toggle: bool,
        #[arg(long)]
        font_size: Option<f64>,
        #[arg(long)]
        font_name: Option<String>,
        #[arg(long)]
        word_count: Option<bool>,
        #[arg(long)]
        char_count: Option<bool>,
    },
    /// Print version and data directory
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moonmate=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(backend) = cli.client {
        config.client.backend = backend;
    }
    if let Some(url) = cli.api_url {
        config.client.base_url = url;
    }

    tracing::info!("Starting MoonMate");

    let state = app::setup(config)
        .await
        .context("failed to initialize application")?;

    match cli.command {
        Command::List => {
            for doc in commands::list_documents(&state).await {
                let marker = if doc.selected { "*" } else { " " };
                println!("{} {}  {}  ({} words)", marker, doc.id, doc.title, doc.word_count);
            }
        }
        Command::New { title } => {
            let doc = commands::create_document(&state, title).await?;
            println!("{}", doc.id);
        }
        Command::Show { id } => {
            let doc = commands::open_document(&state, id).await?;
            println!("# {}\n\n{}", doc.title, doc.content);
            let status = state.view_model.lock().await.status_bar();
            if !status.is_empty() {
                println!("\n{}", status.join("  "));
            }
        }
        Command::Edit { id, title, content } => {
            let doc = commands::update_document(&state, id, title, content).await?;
            println!("Updated {} ({} words)", doc.id, doc.word_count());
        }
        Command::Delete { id } => {
            commands::delete_document(&state, id).await?;
            println!("Deleted {}", id);
        }
        Command::Export {
            id,
            destination,
            format,
        } => {
            commands::export_document(&state, id, format, &destination).await?;
            println!("Exported to {}", destination.display());
        }
        Command::Snapshot { id } => {
            commands::snapshot_document(&state, id).await?;
            println!("Saved copy of {}", id);
        }
        Command::Restore { id } => {
            let doc = commands::restore_document(&state, id).await?;
            println!("Restored {} ({})", doc.id, doc.title);
        }
        Command::Find { id, query } => {
            let search = commands::find_in_document(&state, id, &query).await?;
            match search.status() {
                Some(status) => {
                    println!("{}", status);
                    for range in search.matches() {
                        println!("  bytes {}..{}", range.start, range.end);
                    }
                }
                None => println!("No matches"),
            }
        }
        Command::Improve { text, prompt } => {
            for line in commands::improve_text(&state, &text, &prompt).await? {
                match line {
                    DiffLine::Header(header) => println!("[{}]", header),
                    DiffLine::Removed(removed) => println!("- {}", removed),
                    DiffLine::Added(added) => println!("+ {}", added),
                    DiffLine::Context(context) => println!("  {}", context),
                }
            }
        }
        Command::Settings {
            theme_toggle,
            font_size,
            font_name,
            word_count,
            char_count,
        } => {
            let update = SettingsUpdate {
                toggle_theme: theme_toggle,
                font_size,
                font_name,
                show_word_count: word_count,
                show_character_count: char_count,
            };
            let settings = commands::update_settings(&state, update).await?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Command::Info => {
            let info = commands::get_app_info(&state);
            println!("MoonMate {} ({})", info.version, info.app_data_dir);
        }
    }

    Ok(())
}
