//! Application State

use std::sync::Arc;

use crypto_analysis::Analyst;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Market data client + recommendation engine
    pub analyst: Arc<Analyst>,
}

impl AppState {
    pub fn new(analyst: Analyst) -> Self {
        Self {
            analyst: Arc::new(analyst),
        }
    }
}
