//! services/api/src/adapters/records.rs
//!
//! The JSON shape of a persisted project, and the conversions between it and
//! the core domain types. This is the only place where timestamps are turned
//! into strings and back.
//!
//! The shape matches the blob the browser client keeps under its storage key:
//! camelCase field names, `type` for the item kind, lowercase enum names.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thought_partner_core::domain::{
    ChatMessage, ItemKind, MessageRole, Point, Project, Provenance, ShapeType, WhiteboardItem,
};
use thought_partner_core::ports::{PortError, PortResult};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Timestamp Encoding
//=========================================================================================

/// Encodes a timestamp as RFC 3339 in UTC, keeping sub-second precision.
pub fn encode_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Decodes an RFC 3339 timestamp, including JavaScript `toISOString()` output.
pub fn decode_timestamp(value: &str) -> PortResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| PortError::Unexpected(format!("Invalid timestamp '{}': {}", value, e)))
}

//=========================================================================================
// Record Structs
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for PointRecord {
    fn from(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
        }
    }
}

impl From<PointRecord> for Point {
    fn from(record: PointRecord) -> Self {
        Point::new(record.x, record.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: PointRecord,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<PointRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<PointRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

impl ItemRecord {
    pub fn from_domain(item: &WhiteboardItem) -> Self {
        Self {
            id: item.id,
            kind: item.kind.as_str().to_string(),
            position: item.position.into(),
            content: item.content.clone(),
            width: item.width,
            height: item.height,
            color: item.color.clone(),
            created_by: item.created_by.as_str().to_string(),
            created_at: encode_timestamp(item.created_at),
            updated_at: encode_timestamp(item.updated_at),
            shape_type: item.shape_type.map(|shape| shape.as_str().to_string()),
            start_point: item.start_point.map(Into::into),
            end_point: item.end_point.map(Into::into),
            columns: item.columns,
            rows: item.rows,
        }
    }

    pub fn to_domain(self) -> PortResult<WhiteboardItem> {
        Ok(WhiteboardItem {
            id: self.id,
            kind: parse_kind(&self.kind)?,
            position: self.position.into(),
            content: self.content,
            width: self.width,
            height: self.height,
            color: self.color,
            created_by: Provenance::from_name(&self.created_by).ok_or_else(|| {
                PortError::Unexpected(format!("Unknown item provenance '{}'", self.created_by))
            })?,
            created_at: decode_timestamp(&self.created_at)?,
            updated_at: decode_timestamp(&self.updated_at)?,
            shape_type: self.shape_type.as_deref().map(parse_shape).transpose()?,
            start_point: self.start_point.map(Into::into),
            end_point: self.end_point.map(Into::into),
            columns: self.columns,
            rows: self.rows,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: Uuid,
    pub role: String,
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub related_items: Vec<Uuid>,
}

impl MessageRecord {
    pub fn from_domain(message: &ChatMessage) -> Self {
        Self {
            id: message.id,
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
            timestamp: encode_timestamp(message.timestamp),
            related_items: message.related_items.clone(),
        }
    }

    pub fn to_domain(self) -> PortResult<ChatMessage> {
        Ok(ChatMessage {
            id: self.id,
            role: MessageRole::from_name(&self.role).ok_or_else(|| {
                PortError::Unexpected(format!("Unknown message role '{}'", self.role))
            })?,
            content: self.content,
            timestamp: decode_timestamp(&self.timestamp)?,
            related_items: self.related_items,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<ItemRecord>,
    pub messages: Vec<MessageRecord>,
    pub created_at: String,
    pub updated_at: String,
}

impl ProjectRecord {
    pub fn from_domain(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            items: project.items.iter().map(ItemRecord::from_domain).collect(),
            messages: project
                .messages
                .iter()
                .map(MessageRecord::from_domain)
                .collect(),
            created_at: encode_timestamp(project.created_at),
            updated_at: encode_timestamp(project.updated_at),
        }
    }

    pub fn to_domain(self) -> PortResult<Project> {
        Ok(Project {
            id: self.id,
            name: self.name,
            description: self.description,
            items: self
                .items
                .into_iter()
                .map(ItemRecord::to_domain)
                .collect::<PortResult<_>>()?,
            messages: self
                .messages
                .into_iter()
                .map(MessageRecord::to_domain)
                .collect::<PortResult<_>>()?,
            created_at: decode_timestamp(&self.created_at)?,
            updated_at: decode_timestamp(&self.updated_at)?,
        })
    }
}

//=========================================================================================
// Whole-Blob Helpers
//=========================================================================================

pub fn encode_project(project: &Project) -> PortResult<String> {
    serde_json::to_string(&ProjectRecord::from_domain(project))
        .map_err(|e| PortError::Unexpected(e.to_string()))
}

pub fn decode_project(blob: &str) -> PortResult<Project> {
    let record: ProjectRecord = serde_json::from_str(blob)
        .map_err(|e| PortError::Unexpected(format!("Malformed project blob: {}", e)))?;
    record.to_domain()
}

pub fn parse_kind(name: &str) -> PortResult<ItemKind> {
    ItemKind::from_name(name)
        .ok_or_else(|| PortError::Unexpected(format!("Unknown item type '{}'", name)))
}

pub fn parse_shape(name: &str) -> PortResult<ShapeType> {
    ShapeType::from_name(name)
        .ok_or_else(|| PortError::Unexpected(format!("Unknown shape type '{}'", name)))
}
