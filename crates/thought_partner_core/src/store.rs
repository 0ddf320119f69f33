//! crates/thought_partner_core/src/store.rs
//!
//! The item/message store. Owns the project aggregate and writes the whole of
//! it through the `ProjectRepository` port after every mutation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::{
    timestamp_after, ChatMessage, ItemDescriptor, ItemKind, ItemPatch, MessageDescriptor, Point,
    Project, ProjectPatch, WhiteboardItem,
};
use crate::ports::ProjectRepository;

/// Canonical in-memory state of one project, kept in sync with its persistence slot.
///
/// Writes are best-effort: a failed save is logged and the in-memory change stays.
pub struct ProjectStore {
    project: Project,
    repository: Arc<dyn ProjectRepository>,
}

impl ProjectStore {
    /// Loads the saved project, or starts a fresh one if none exists or it cannot be read.
    pub async fn open(repository: Arc<dyn ProjectRepository>) -> Self {
        let project = match repository.load().await {
            Ok(Some(project)) => {
                info!(
                    "Loaded project {} with {} items and {} messages.",
                    project.id,
                    project.items.len(),
                    project.messages.len()
                );
                project
            }
            Ok(None) => {
                info!("No saved project found. Starting a new one.");
                Project::default()
            }
            Err(e) => {
                error!("Error loading saved project, starting a new one: {}", e);
                Project::default()
            }
        };
        Self {
            project,
            repository,
        }
    }

    /// Wraps an already-built project without touching the repository.
    #[cfg(test)]
    pub(crate) fn with_project(project: Project, repository: Arc<dyn ProjectRepository>) -> Self {
        Self {
            project,
            repository,
        }
    }

    //=====================================================================================
    // Reads
    //=====================================================================================

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn items(&self) -> &[WhiteboardItem] {
        &self.project.items
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.project.messages
    }

    pub fn item(&self, id: Uuid) -> Option<&WhiteboardItem> {
        self.project.items.iter().find(|item| item.id == id)
    }

    //=====================================================================================
    // Item Mutations
    //=====================================================================================

    /// Appends a new item and returns its freshly issued id.
    pub async fn add_item(&mut self, descriptor: ItemDescriptor) -> Uuid {
        let now = Utc::now();
        let (max_w, max_h) = descriptor.kind.max_dimensions();
        let item = WhiteboardItem {
            id: Uuid::new_v4(),
            kind: descriptor.kind,
            position: descriptor.position,
            content: descriptor.content,
            width: clamp_dimension(descriptor.width, max_w),
            height: clamp_dimension(descriptor.height, max_h),
            color: descriptor.color,
            created_by: descriptor.created_by,
            created_at: now,
            updated_at: now,
            shape_type: descriptor.shape_type,
            start_point: descriptor.start_point,
            end_point: descriptor.end_point,
            columns: descriptor.columns,
            rows: descriptor.rows,
        };
        let id = item.id;
        debug!("Adding {} item {}.", item.kind.as_str(), id);

        self.project.items.push(item);
        self.touch_and_persist().await;
        id
    }

    /// Adds a user item with placeholder content, centered on `center`.
    pub async fn add_blank_item(&mut self, kind: ItemKind, center: Point) -> Uuid {
        self.add_item(ItemDescriptor::blank(kind, center)).await
    }

    /// Merges `patch` into the item with `id`. Returns `false` if no such item exists.
    pub async fn update_item(&mut self, id: Uuid, patch: ItemPatch) -> bool {
        let Some(item) = self.project.items.iter_mut().find(|item| item.id == id) else {
            debug!("Update ignored: item {} not found.", id);
            return false;
        };

        let (max_w, max_h) = item.kind.max_dimensions();
        if let Some(position) = patch.position {
            item.position = position;
        }
        if let Some(content) = patch.content {
            item.content = content;
        }
        if patch.width.is_some() {
            item.width = clamp_dimension(patch.width, max_w);
        }
        if patch.height.is_some() {
            item.height = clamp_dimension(patch.height, max_h);
        }
        if patch.color.is_some() {
            item.color = patch.color;
        }
        if patch.shape_type.is_some() {
            item.shape_type = patch.shape_type;
        }
        if patch.start_point.is_some() {
            item.start_point = patch.start_point;
        }
        if patch.end_point.is_some() {
            item.end_point = patch.end_point;
        }
        if patch.columns.is_some() {
            item.columns = patch.columns;
        }
        if patch.rows.is_some() {
            item.rows = patch.rows;
        }
        item.updated_at = timestamp_after(item.updated_at);

        self.touch_and_persist().await;
        true
    }

    /// Removes the item with `id`. Returns `false` if no such item exists.
    pub async fn delete_item(&mut self, id: Uuid) -> bool {
        let before = self.project.items.len();
        self.project.items.retain(|item| item.id != id);
        if self.project.items.len() == before {
            debug!("Delete ignored: item {} not found.", id);
            return false;
        }

        self.touch_and_persist().await;
        true
    }

    /// Clears the board. Messages are kept.
    pub async fn delete_all_items(&mut self) {
        info!(
            "Deleting all {} items from project {}.",
            self.project.items.len(),
            self.project.id
        );
        self.project.items.clear();
        self.touch_and_persist().await;
    }

    //=====================================================================================
    // Messages and Project Metadata
    //=====================================================================================

    /// Appends a chat message. Messages are never edited or removed.
    pub async fn add_message(&mut self, descriptor: MessageDescriptor) -> Uuid {
        let message = ChatMessage {
            id: Uuid::new_v4(),
            role: descriptor.role,
            content: descriptor.content,
            timestamp: Utc::now(),
            related_items: descriptor.related_items,
        };
        let id = message.id;

        self.project.messages.push(message);
        self.touch_and_persist().await;
        id
    }

    pub async fn update_project(&mut self, patch: ProjectPatch) {
        if let Some(name) = patch.name {
            self.project.name = name;
        }
        if patch.description.is_some() {
            self.project.description = patch.description;
        }
        self.touch_and_persist().await;
    }

    async fn touch_and_persist(&mut self) {
        self.project.updated_at = timestamp_after(self.project.updated_at);
        if let Err(e) = self.repository.save(&self.project).await {
            error!("Error saving project {}: {}", self.project.id, e);
        }
    }
}

fn clamp_dimension(value: Option<f64>, max: f64) -> Option<f64> {
    value.map(|v| v.clamp(0.0, max))
}
