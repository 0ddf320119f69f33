pub mod domain;
pub mod layout;
pub mod orchestrator;
pub mod parser;
pub mod ports;
pub mod store;

pub use domain::{
    ChatMessage, ItemDescriptor, ItemKind, ItemPatch, MessageDescriptor, MessageRole, Point,
    Project, ProjectPatch, Provenance, ShapeType, WhiteboardItem,
};
pub use layout::{layout, Viewport};
pub use orchestrator::{ChatOrchestrator, ChatTurn};
pub use parser::{parse, ParsedResponse};
pub use ports::{CompletionService, PortError, PortResult, ProjectRepository};
pub use store::ProjectStore;

#[cfg(test)]
mod test_support;
