use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

/// Delay before the follow-up check of a queued job.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_millis(1500);

const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Per-session workflow settings.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub poll_delay: Duration,
    /// Buffered events before slow subscribers start lagging
    pub event_capacity: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            poll_delay: DEFAULT_POLL_DELAY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl WorkflowConfig {
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub service_url: String,
    pub service_token: Option<String>,
    pub workflow: WorkflowConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let poll_delay = match env::var("PAGE_EXTRACT_POLL_DELAY_MS") {
            Ok(ms) => Duration::from_millis(
                ms.parse()
                    .context("PAGE_EXTRACT_POLL_DELAY_MS must be a number of milliseconds")?,
            ),
            Err(_) => DEFAULT_POLL_DELAY,
        };

        Ok(Self {
            service_url: env::var("PAGE_EXTRACT_SERVICE_URL")
                .context("PAGE_EXTRACT_SERVICE_URL must be set")?,
            service_token: env::var("PAGE_EXTRACT_SERVICE_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            workflow: WorkflowConfig::default().with_poll_delay(poll_delay),
        })
    }
}
