//! Periodic refresh of the cached dashboard view.
//!
//! A tick fetches one snapshot, rebuilds every chart and replaces the cached
//! view. A failed tick leaves the last good view in place and records the
//! failure so the page can show it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::db::SightingSource;
use crate::errors::{AppError, ErrorKind};
use crate::models::chart::DashboardView;
use crate::services::dashboard;

/// Why the most recent failed tick failed.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshFailure {
    pub kind: ErrorKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl RefreshFailure {
    fn from_error(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            at: Utc::now(),
        }
    }
}

/// Cached dashboard state served to the page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStatus {
    /// View from the last successful tick.
    pub view: Option<DashboardView>,
    /// Set while the most recent tick failed; cleared by the next success.
    pub last_error: Option<RefreshFailure>,
    /// Polling period for the page; `None` in render-once mode.
    pub refresh_interval_ms: Option<u64>,
    pub successful_ticks: u64,
    pub failed_ticks: u64,
}

/// Runs refresh ticks and owns the cached status.
#[derive(Clone)]
pub struct Refresher {
    source: Arc<dyn SightingSource>,
    top_n: usize,
    status: Arc<RwLock<DashboardStatus>>,
    tick_lock: Arc<Mutex<()>>,
}

impl Refresher {
    pub fn new(source: Arc<dyn SightingSource>, top_n: usize, refresh_interval_ms: Option<u64>) -> Self {
        let status = DashboardStatus {
            refresh_interval_ms,
            ..DashboardStatus::default()
        };
        Self {
            source,
            top_n,
            status: Arc::new(RwLock::new(status)),
            tick_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn status(&self) -> DashboardStatus {
        self.status.read().await.clone()
    }

    /// Last good view, or `Unavailable` when no tick has succeeded yet.
    pub async fn current_view(&self) -> Result<DashboardView, AppError> {
        let status = self.status.read().await;
        match (&status.view, &status.last_error) {
            (Some(view), _) => Ok(view.clone()),
            (None, Some(failure)) => Err(AppError::Unavailable(failure.message.clone())),
            (None, None) => Err(AppError::Unavailable(
                "No dashboard data has been loaded yet".to_string(),
            )),
        }
    }

    /// Run one fetch-aggregate-publish cycle. Ticks never overlap.
    pub async fn tick(&self) -> Result<DashboardView, AppError> {
        let _guard = self.tick_lock.lock().await;

        match dashboard::load_view(self.source.as_ref(), self.top_n).await {
            Ok(view) => {
                let mut status = self.status.write().await;
                status.view = Some(view.clone());
                status.last_error = None;
                status.successful_ticks += 1;
                info!(total = view.total, tick = status.successful_ticks, "Dashboard refreshed");
                Ok(view)
            }
            Err(err) => {
                let mut status = self.status.write().await;
                status.last_error = Some(RefreshFailure::from_error(&err));
                status.failed_ticks += 1;
                warn!(
                    error = %err,
                    kind = ?err.kind(),
                    keeping_last_good = status.view.is_some(),
                    "Dashboard refresh failed"
                );
                Err(err)
            }
        }
    }

    /// Load the view once if nothing has been loaded yet (render-once mode).
    pub async fn ensure_loaded(&self) -> Result<DashboardView, AppError> {
        if let Ok(view) = self.current_view().await {
            return Ok(view);
        }
        self.tick().await
    }

    /// Tick immediately, then every `period` until `shutdown` flips to true.
    /// Missed ticks are skipped rather than replayed in a burst.
    pub fn spawn(self, period: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_ms = period.as_millis() as u64, "Dashboard refresher started");
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            info!("Dashboard refresher shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        // Failures are recorded in the status; keep ticking.
                        let _ = self.tick().await;
                    }
                }
            }
        })
    }
}
