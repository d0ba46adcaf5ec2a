//! JSON file helpers
//!
//! Whole-file reads and atomic whole-file writes. A write goes to a sibling
//! temp file which is synced and then renamed over the target, so readers
//! only ever see the previous or the new contents.

use crate::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Serialize `value` as pretty JSON and atomically replace `path` with it
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &data).await
}

/// Read and decode a JSON file
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read(path).await.map_err(|e| {
        AppError::Storage(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_slice(&data).map_err(|e| {
        AppError::Storage(format!("Failed to decode {}: {}", path.display(), e))
    })
}

/// Atomically replace `path` with `data`
pub async fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let temp_path = temp_path_for(path);
    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(AppError::Storage(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        )));
    }

    tracing::debug!("Wrote {} ({} bytes)", path.display(), data.len());

    Ok(())
}

fn temp_path_for(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
