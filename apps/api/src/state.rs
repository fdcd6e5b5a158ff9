use std::time::Duration;

use crate::config::Config;
use crate::interview::chooser::{Chooser, RandomChooser};
use crate::interview::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = SessionStore::new(
            config.max_sessions,
            Duration::from_secs(config.session_idle_secs),
        );
        Self { config, sessions }
    }

    /// Random source for a new session. A configured seed makes every session's
    /// draws reproducible.
    pub fn session_chooser(&self) -> Box<dyn Chooser + Send> {
        Box::new(RandomChooser::from_seed_option(self.config.interview_seed))
    }
}
