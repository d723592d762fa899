pub mod analysis;
pub mod api;
pub mod charts;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod scraper;

use std::sync::Arc;
use config::Config;
use reqwest::Client;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// One client for the whole process; it carries the fetch timeouts.
    pub client: Client,
}

impl AppState {
    pub fn new(config: Config) -> error::Result<Self> {
        let client = crate::scraper::build_client(&config)?;
        Ok(AppState {
            config: Arc::new(config),
            client,
        })
    }
}
