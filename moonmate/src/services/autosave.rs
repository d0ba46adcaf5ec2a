//! Autosave service
//!
//! Ticks on a fixed period and asks the view-model to persist. The
//! view-model skips the write when it saved recently, so the timer only acts
//! as a backstop for edits that were not written already.

use super::view_model::DocumentViewModel;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Background autosave timer. Stops when dropped.
pub struct AutosaveService {
    handle: Option<JoinHandle<()>>,
}

impl AutosaveService {
    /// Start ticking every `period`, first tick one period from now
    pub fn start(view_model: Arc<Mutex<DocumentViewModel>>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let saved = view_model.lock().await.autosave().await;
                if saved {
                    tracing::debug!("Autosave completed");
                }
            }
        });

        tracing::info!("Autosave started (every {:?})", period);

        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the timer
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::info!("Autosave stopped");
        }
    }
}

impl Drop for AutosaveService {
    fn drop(&mut self) {
        self.stop();
    }
}
