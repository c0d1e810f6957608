//! # Application State
//!
//! [`App`] wires configuration, the HTTP backend and the session store into
//! a [`ClientContext`]. [`AppState`] is the shared state of the loopback
//! redirect listener.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use wash_core::{
    BoxedBookingBackend, BoxedSessionStore, ClientContext, FileSessionStore, Language, Route, Session,
};
use wash_http::{ClientConfig, HttpBackend};

/// Everything a command needs
#[derive(Debug, Clone)]
pub struct App {
    pub config: ClientConfig,
    pub ctx: ClientContext,
}

impl App {
    /// Load config from the environment and connect to the REST backend
    pub fn from_env() -> anyhow::Result<Self> {
        let config = ClientConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let backend = HttpBackend::new(config.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize HTTP backend: {}", e))?;
        let store = Arc::new(FileSessionStore::new(&config.session_file));

        info!(
            api = %config.api_base_url,
            session_file = %config.session_file.display(),
            "client configured"
        );
        Ok(Self::new(config, Arc::new(backend), store))
    }

    /// Build from explicit parts
    pub fn new(config: ClientConfig, backend: BoxedBookingBackend, store: BoxedSessionStore) -> Self {
        let ctx = ClientContext::new(backend, Session::init(store))
            .with_language(config.language)
            .with_payment_method_id(config.payment_method_id);
        Self { config, ctx }
    }

    pub fn language(&self) -> Language {
        self.ctx.language
    }
}

/// Shared state for the redirect listener
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where redirect outcomes are delivered
    pub redirects: mpsc::Sender<Route>,
    /// Language of the landing pages
    pub language: Language,
}

impl AppState {
    pub fn new(redirects: mpsc::Sender<Route>, language: Language) -> Self {
        Self { redirects, language }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wash_core::MemorySessionStore;

    #[test]
    fn test_app_applies_config_to_context() {
        let config = ClientConfig::new("http://localhost:9/api").with_language(Language::En);
        let backend = HttpBackend::new(config.clone()).unwrap();

        let app = App::new(config, Arc::new(backend), Arc::new(MemorySessionStore::new()));

        assert_eq!(app.language(), Language::En);
        assert_eq!(app.ctx.payment_method_id, 2);
        assert_eq!(app.ctx.backend.backend_name(), "http");
        assert!(!app.ctx.session.is_authenticated());
    }
}
