//! crates/thought_partner_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The store and orchestrator only talk to storage and the language model
//! through these traits, so adapters can be swapped without touching the core.

use async_trait::async_trait;

use crate::domain::{ChatMessage, Project};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., storage, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A durable slot holding the whole project aggregate.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Reads the persisted project, or `None` if nothing was ever saved.
    async fn load(&self) -> PortResult<Option<Project>>;

    /// Overwrites the slot with the given project.
    async fn save(&self, project: &Project) -> PortResult<()>;
}

/// The language model behind the chat panel.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Produces the agent's free-text reply to the conversation so far.
    async fn complete(
        &self,
        history: &[ChatMessage],
        project_context: Option<&str>,
    ) -> PortResult<String>;
}
