use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::documents::Session;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single active-document session. Handlers hold the lock only across
    /// storage calls, never across an AI request.
    pub session: Arc<Mutex<Session>>,
    pub llm: LlmClient,
    pub config: Config,
}

impl AppState {
    pub fn new(session: Session, llm: LlmClient, config: Config) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            llm,
            config,
        }
    }
}
