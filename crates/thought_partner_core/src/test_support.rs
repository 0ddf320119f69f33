//! In-memory fakes of the ports, shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{ChatMessage, Project};
use crate::ports::{CompletionService, PortError, PortResult, ProjectRepository};

#[derive(Default)]
pub struct MemoryRepository {
    slot: Mutex<Option<Project>>,
    saves: Mutex<usize>,
}

impl MemoryRepository {
    pub fn saved(&self) -> Option<Project> {
        self.slot.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl ProjectRepository for MemoryRepository {
    async fn load(&self) -> PortResult<Option<Project>> {
        Ok(self.slot.lock().unwrap().clone())
    }

    async fn save(&self, project: &Project) -> PortResult<()> {
        *self.slot.lock().unwrap() = Some(project.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

pub struct FailingRepository;

#[async_trait]
impl ProjectRepository for FailingRepository {
    async fn load(&self) -> PortResult<Option<Project>> {
        Err(PortError::Unexpected("slot unreadable".to_string()))
    }

    async fn save(&self, _project: &Project) -> PortResult<()> {
        Err(PortError::Unexpected("disk full".to_string()))
    }
}

/// Replies with a fixed string (or fails) and records what it was asked.
pub struct ScriptedCompletion {
    reply: Option<String>,
    calls: Mutex<Vec<(Vec<ChatMessage>, Option<String>)>>,
}

impl ScriptedCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        history: &[ChatMessage],
        project_context: Option<&str>,
    ) -> PortResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((history.to_vec(), project_context.map(str::to_string)));
        self.reply
            .clone()
            .ok_or_else(|| PortError::Unexpected("provider unavailable".to_string()))
    }
}
