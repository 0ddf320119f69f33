//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;
use thought_partner_core::orchestrator::ChatOrchestrator;
use thought_partner_core::ports::CompletionService;
use thought_partner_core::store::ProjectStore;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ProjectStore>>,
    pub orchestrator: ChatOrchestrator,
}

impl AppState {
    /// Wires the orchestrator to the same store the item handlers use.
    pub fn new(store: ProjectStore, completion: Arc<dyn CompletionService>) -> Self {
        let store = Arc::new(Mutex::new(store));
        let orchestrator = ChatOrchestrator::new(store.clone(), completion);
        Self {
            store,
            orchestrator,
        }
    }
}
