pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use db::SightingSource;
use services::refresher::Refresher;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn SightingSource>,
    pub dashboard: Refresher,
    pub config: config::AppConfig,
}

impl AppState {
    pub fn new(config: config::AppConfig, source: Arc<dyn SightingSource>) -> Self {
        let interval = config.auto_refresh.then_some(config.refresh_interval_ms);
        let dashboard = Refresher::new(source.clone(), config.top_n, interval);
        Self {
            source,
            dashboard,
            config,
        }
    }
}
