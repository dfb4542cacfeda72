//! Application state container
//!
//! Shared, read-only state handed to every request handler via axum's
//! state extraction.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::services::ProviderDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,

    /// Upstream adapters, holding the credentials captured at startup
    pub dispatcher: Arc<ProviderDispatcher>,

    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let dispatcher = ProviderDispatcher::from_settings(&settings)?;

        tracing::debug!(
            claude = dispatcher.status().claude,
            openai = dispatcher.status().openai,
            "Provider credentials loaded"
        );

        Ok(Self::with_dispatcher(settings, dispatcher))
    }

    pub fn with_dispatcher(settings: Settings, dispatcher: ProviderDispatcher) -> Self {
        Self {
            settings: Arc::new(settings),
            dispatcher: Arc::new(dispatcher),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
