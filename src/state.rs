use std::sync::Arc;

use anyhow::{Context, Result};
use ufpcal_core::service::SWEEP_INTERVAL;
use ufpcal_core::{CalendarService, UpstreamClient};

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub calendars: Arc<CalendarService<UpstreamClient>>,
}

impl AppState {
    /// Build the calendar service and start its cache sweeper.
    ///
    /// Must be called from within the tokio runtime.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let upstream = UpstreamClient::new(&config.upstream_url)
            .context("Failed to build upstream HTTP client")?;
        let calendars = CalendarService::new(upstream);
        calendars.cache().spawn_sweeper(SWEEP_INTERVAL);

        Ok(AppState {
            calendars: Arc::new(calendars),
        })
    }
}
