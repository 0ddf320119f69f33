//! services/api/src/web/protocol.rs
//!
//! Request and response payloads of the REST API. Field names are camelCase
//! to match the records the browser client already stores.

use serde::{Deserialize, Serialize};
use thought_partner_core::domain::{ItemDescriptor, ItemPatch, ProjectPatch, Provenance};
use thought_partner_core::layout::Viewport;
use thought_partner_core::ports::{PortError, PortResult};
use utoipa::ToSchema;

use crate::adapters::records::{parse_kind, parse_shape, ItemRecord, MessageRecord, PointRecord};

//=========================================================================================
// Payloads Sent FROM the Client
//=========================================================================================

/// A new item, as drawn or pasted by the user (or forwarded from a voice tool call).
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: PointRecord,
    #[serde(default)]
    pub content: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
    /// Defaults to `user`.
    pub created_by: Option<String>,
    pub shape_type: Option<String>,
    pub start_point: Option<PointRecord>,
    pub end_point: Option<PointRecord>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
}

impl CreateItemRequest {
    pub fn to_descriptor(self) -> PortResult<ItemDescriptor> {
        let kind = parse_kind(&self.kind)?;
        let created_by = match self.created_by.as_deref() {
            None => Provenance::User,
            Some(name) => Provenance::from_name(name).ok_or_else(|| {
                PortError::Unexpected(format!("Unknown item provenance '{}'", name))
            })?,
        };
        let (default_w, default_h) = kind.default_dimensions();
        Ok(ItemDescriptor {
            kind,
            position: self.position.into(),
            content: self.content,
            width: Some(self.width.unwrap_or(default_w)),
            height: Some(self.height.unwrap_or(default_h)),
            color: self.color,
            created_by,
            shape_type: self.shape_type.as_deref().map(parse_shape).transpose()?,
            start_point: self.start_point.map(Into::into),
            end_point: self.end_point.map(Into::into),
            columns: self.columns,
            rows: self.rows,
        })
    }
}

/// A toolbar click: placeholder item of `type`, centered on `center`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct BlankItemRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub center: PointRecord,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub position: Option<PointRecord>,
    pub content: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
    pub shape_type: Option<String>,
    pub start_point: Option<PointRecord>,
    pub end_point: Option<PointRecord>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
}

impl UpdateItemRequest {
    pub fn to_patch(self) -> PortResult<ItemPatch> {
        Ok(ItemPatch {
            position: self.position.map(Into::into),
            content: self.content,
            width: self.width,
            height: self.height,
            color: self.color,
            shape_type: self.shape_type.as_deref().map(parse_shape).transpose()?,
            start_point: self.start_point.map(Into::into),
            end_point: self.end_point.map(Into::into),
            columns: self.columns,
            rows: self.rows,
        })
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateProjectRequest> for ProjectPatch {
    fn from(request: UpdateProjectRequest) -> Self {
        ProjectPatch {
            name: request.name,
            description: request.description,
        }
    }
}

/// A message typed into the chat panel, with the canvas size at submit time.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub content: String,
    pub viewport_width: Option<f64>,
    pub viewport_height: Option<f64>,
}

impl ChatRequest {
    /// The measured viewport, falling back per axis when a size is missing or not positive.
    pub fn viewport(&self) -> Viewport {
        let fallback = Viewport::default();
        Viewport::new(
            self.viewport_width
                .filter(|w| *w > 0.0)
                .unwrap_or(fallback.width),
            self.viewport_height
                .filter(|h| *h > 0.0)
                .unwrap_or(fallback.height),
        )
    }
}

//=========================================================================================
// Payloads Sent FROM the Server
//=========================================================================================

/// Everything one chat turn added to the project.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnResponse {
    pub user_message: MessageRecord,
    pub agent_message: MessageRecord,
    pub created_items: Vec<ItemRecord>,
    pub provider_failed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use thought_partner_core::domain::{ItemKind, Point, ShapeType};

    #[test]
    fn create_request_fills_defaults() {
        let request: CreateItemRequest = serde_json::from_str(
            r#"{"type":"shape","position":{"x":10,"y":20},"shapeType":"star"}"#,
        )
        .expect("valid payload");
        let descriptor = request.to_descriptor().expect("valid descriptor");
        assert_eq!(descriptor.kind, ItemKind::Shape);
        assert_eq!(descriptor.position, Point::new(10.0, 20.0));
        assert_eq!(descriptor.created_by, Provenance::User);
        assert_eq!(descriptor.shape_type, Some(ShapeType::Star));
        assert_eq!(descriptor.width, Some(150.0));
    }

    #[test]
    fn create_request_rejects_unknown_names() {
        let request: CreateItemRequest = serde_json::from_str(
            r#"{"type":"sticky","position":{"x":0,"y":0},"createdBy":"robot"}"#,
        )
        .expect("valid json");
        assert!(request.to_descriptor().is_err());
    }

    #[test]
    fn chat_viewport_falls_back_per_axis() {
        let request = ChatRequest {
            content: "hi".to_string(),
            viewport_width: Some(1280.0),
            viewport_height: Some(0.0),
        };
        assert_eq!(request.viewport(), Viewport::new(1280.0, 600.0));
    }
}
