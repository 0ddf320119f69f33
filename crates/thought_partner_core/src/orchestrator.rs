//! crates/thought_partner_core/src/orchestrator.rs
//!
//! Runs one chat turn: store the user's message, ask the language model,
//! turn its reply into an agent message plus positioned whiteboard items.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::{MessageDescriptor, MessageRole};
use crate::layout::{layout, Viewport};
use crate::parser::parse;
use crate::ports::CompletionService;
use crate::store::ProjectStore;

/// Shown to the user when the completion provider fails.
pub const PROVIDER_FAILURE_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// What one call to [`ChatOrchestrator::handle_user_message`] added to the project.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub user_message_id: Uuid,
    pub agent_message_id: Uuid,
    pub created_items: Vec<Uuid>,
    pub provider_failed: bool,
}

/// Coordinates the store, the completion provider, the parser and the layout engine.
#[derive(Clone)]
pub struct ChatOrchestrator {
    store: Arc<Mutex<ProjectStore>>,
    completion: Arc<dyn CompletionService>,
}

impl ChatOrchestrator {
    pub fn new(store: Arc<Mutex<ProjectStore>>, completion: Arc<dyn CompletionService>) -> Self {
        Self { store, completion }
    }

    pub fn store(&self) -> &Arc<Mutex<ProjectStore>> {
        &self.store
    }

    /// Handles a message the user submitted in the chat panel.
    ///
    /// The store is not locked while the provider is working, so two turns
    /// submitted back to back may interleave their messages.
    pub async fn handle_user_message(&self, text: &str, viewport: Viewport) -> ChatTurn {
        let (user_message_id, history, project_context) = {
            let mut store = self.store.lock().await;
            let id = store
                .add_message(MessageDescriptor::new(MessageRole::User, text))
                .await;
            (
                id,
                store.messages().to_vec(),
                store.project().description.clone(),
            )
        };

        let reply = self
            .completion
            .complete(&history, project_context.as_deref())
            .await;

        let mut store = self.store.lock().await;
        let raw = match reply {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error getting agent response: {}", e);
                let agent_message_id = store
                    .add_message(MessageDescriptor::new(
                        MessageRole::Agent,
                        PROVIDER_FAILURE_REPLY,
                    ))
                    .await;
                return ChatTurn {
                    user_message_id,
                    agent_message_id,
                    created_items: Vec::new(),
                    provider_failed: true,
                };
            }
        };
        debug!("Raw agent response: {}", raw);

        let parsed = parse(&raw);
        let agent_message_id = store
            .add_message(MessageDescriptor::new(
                MessageRole::Agent,
                parsed.cleaned_content,
            ))
            .await;

        let positioned = layout(&parsed.items, store.items(), viewport);
        let mut created_items = Vec::with_capacity(positioned.len());
        for item in positioned {
            created_items.push(store.add_item(item).await);
        }
        if !created_items.is_empty() {
            info!("Agent added {} items to the whiteboard.", created_items.len());
        }

        ChatTurn {
            user_message_id,
            agent_message_id,
            created_items,
            provider_failed: false,
        }
    }
}
