//! Application state
//!
//! Shared state across all handlers.

use coach_agent_chat::ChatStore;
use coach_agent_config::Settings;
use coach_agent_engine::{SampledWeather, SynthesisEngine};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::context::ContextProviders;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration, behind a lock for reload support
    pub config: Arc<RwLock<Settings>>,
    /// Chat session store
    pub store: Arc<ChatStore>,
    /// Synthesis engine
    pub engine: Arc<SynthesisEngine>,
    /// Read-only context providers
    pub context: Arc<ContextProviders>,
}

impl AppState {
    /// Create application state with the seeded demo roster
    ///
    /// The engine gets the sampled weather selector here, at the application
    /// boundary; the engine default stays deterministic for direct use.
    pub fn new(config: Settings) -> Self {
        let store = Arc::new(ChatStore::new(config.chat.clone()));
        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            engine: Arc::new(SynthesisEngine::with_weather(Arc::new(SampledWeather))),
            context: Arc::new(ContextProviders::seeded()),
        }
    }

    /// Get a read guard to the current configuration
    pub fn get_config(&self) -> parking_lot::RwLockReadGuard<'_, Settings> {
        self.config.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_wires_seeded_context() {
        let state = AppState::new(Settings::default());
        assert_eq!(state.context.athletes().len(), 2);
        assert_eq!(state.store.count(), 0);
    }
}
