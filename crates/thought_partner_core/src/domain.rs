//! crates/thought_partner_core/src/domain.rs
//!
//! Defines the pure, core data structures for the whiteboard and chat.
//! These structs are independent of any storage or serialization format.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

//=========================================================================================
// Geometry
//=========================================================================================

/// A 2D coordinate on the whiteboard canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

//=========================================================================================
// Item Kinds and Per-Kind Tables
//=========================================================================================

/// The closed set of things that can live on the whiteboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Sticky,
    Text,
    Image,
    Shape,
    Connection,
    Heading,
    BulletPoints,
    Arrow,
    Table,
}

impl ItemKind {
    pub const ALL: [ItemKind; 9] = [
        ItemKind::Sticky,
        ItemKind::Text,
        ItemKind::Image,
        ItemKind::Shape,
        ItemKind::Connection,
        ItemKind::Heading,
        ItemKind::BulletPoints,
        ItemKind::Arrow,
        ItemKind::Table,
    ];

    /// The kinds an agent may create through `[create <kind>]` directives,
    /// in the order the parser extracts them.
    pub const fn directive_kinds() -> [ItemKind; 5] {
        [
            ItemKind::Sticky,
            ItemKind::Heading,
            ItemKind::BulletPoints,
            ItemKind::Text,
            ItemKind::Table,
        ]
    }

    /// The lowercase name used on the wire and inside directive tags.
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemKind::Sticky => "sticky",
            ItemKind::Text => "text",
            ItemKind::Image => "image",
            ItemKind::Shape => "shape",
            ItemKind::Connection => "connection",
            ItemKind::Heading => "heading",
            ItemKind::BulletPoints => "bulletpoints",
            ItemKind::Arrow => "arrow",
            ItemKind::Table => "table",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    /// Default `(width, height)` for a freshly created item of this kind.
    pub const fn default_dimensions(self) -> (f64, f64) {
        match self {
            ItemKind::Sticky => (240.0, 200.0),
            ItemKind::Text => (300.0, 150.0),
            ItemKind::Image => (300.0, 200.0),
            ItemKind::Shape => (150.0, 150.0),
            ItemKind::Connection => (200.0, 100.0),
            ItemKind::Heading => (400.0, 100.0),
            ItemKind::BulletPoints => (300.0, 200.0),
            ItemKind::Arrow => (200.0, 50.0),
            ItemKind::Table => (400.0, 200.0),
        }
    }

    /// Upper bound on `(width, height)`; the store clamps to it.
    pub const fn max_dimensions(self) -> (f64, f64) {
        match self {
            ItemKind::Heading => (1000.0, 300.0),
            ItemKind::Connection | ItemKind::Arrow => (800.0, 200.0),
            ItemKind::Table => (1200.0, 800.0),
            ItemKind::Sticky
            | ItemKind::Text
            | ItemKind::Image
            | ItemKind::Shape
            | ItemKind::BulletPoints => (800.0, 800.0),
        }
    }

    /// Placeholder content for items added from the toolbar.
    pub const fn placeholder_content(self) -> &'static str {
        match self {
            ItemKind::Sticky => "Add your notes here...",
            ItemKind::Text => "Add text content here...",
            ItemKind::Image => "Paste an image here or enter image URL...",
            ItemKind::Shape => "Shape description...",
            ItemKind::Connection => "Connection description...",
            ItemKind::Heading => "# Main Heading",
            ItemKind::BulletPoints => "• First item\n• Second item\n• Third item",
            ItemKind::Arrow => "→",
            ItemKind::Table => "Column 1,Column 2\nValue 1,Value 2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Rectangle,
    Circle,
    Triangle,
    Star,
}

impl ShapeType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Circle => "circle",
            ShapeType::Triangle => "triangle",
            ShapeType::Star => "star",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            ShapeType::Rectangle,
            ShapeType::Circle,
            ShapeType::Triangle,
            ShapeType::Star,
        ]
        .into_iter()
        .find(|shape| shape.as_str().eq_ignore_ascii_case(name))
    }
}

/// Who put an item on the board. Never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    User,
    Agent,
}

impl Provenance {
    pub const fn as_str(self) -> &'static str {
        match self {
            Provenance::User => "user",
            Provenance::Agent => "agent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user" => Some(Provenance::User),
            "agent" => Some(Provenance::Agent),
            _ => None,
        }
    }
}

//=========================================================================================
// Whiteboard Items
//=========================================================================================

/// A single visual object on the whiteboard canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct WhiteboardItem {
    pub id: Uuid,
    pub kind: ItemKind,
    pub position: Point,
    pub content: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
    pub created_by: Provenance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub shape_type: Option<ShapeType>,
    pub start_point: Option<Point>,
    pub end_point: Option<Point>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
}

impl WhiteboardItem {
    /// Width and height, falling back to the kind's defaults when unset.
    pub fn size(&self) -> (f64, f64) {
        let (default_w, default_h) = self.kind.default_dimensions();
        (
            self.width.unwrap_or(default_w),
            self.height.unwrap_or(default_h),
        )
    }
}

/// Everything needed to create an item; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDescriptor {
    pub kind: ItemKind,
    pub position: Point,
    pub content: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
    pub created_by: Provenance,
    pub shape_type: Option<ShapeType>,
    pub start_point: Option<Point>,
    pub end_point: Option<Point>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
}

impl ItemDescriptor {
    /// A descriptor with the kind's default dimensions and no optional extras.
    pub fn new(kind: ItemKind, content: impl Into<String>, created_by: Provenance) -> Self {
        let (width, height) = kind.default_dimensions();
        Self {
            kind,
            position: Point::default(),
            content: content.into(),
            width: Some(width),
            height: Some(height),
            color: None,
            created_by,
            shape_type: None,
            start_point: None,
            end_point: None,
            columns: None,
            rows: None,
        }
    }

    /// The item a user gets from the toolbar: placeholder content, centered on `center`.
    pub fn blank(kind: ItemKind, center: Point) -> Self {
        let mut descriptor = Self::new(kind, kind.placeholder_content(), Provenance::User);
        let (width, height) = kind.default_dimensions();
        descriptor.position = Point::new(center.x - width / 2.0, center.y - height / 2.0);
        match kind {
            ItemKind::Arrow => {
                descriptor.start_point = Some(Point::new(0.0, 0.0));
                descriptor.end_point = Some(Point::new(150.0, 0.0));
            }
            ItemKind::Shape => descriptor.shape_type = Some(ShapeType::Rectangle),
            _ => {}
        }
        descriptor
    }

    pub fn size(&self) -> (f64, f64) {
        let (default_w, default_h) = self.kind.default_dimensions();
        (
            self.width.unwrap_or(default_w),
            self.height.unwrap_or(default_h),
        )
    }
}

/// A partial update to an item. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub position: Option<Point>,
    pub content: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
    pub shape_type: Option<ShapeType>,
    pub start_point: Option<Point>,
    pub end_point: Option<Point>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
}

impl ItemPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }
}

//=========================================================================================
// Chat Messages
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Agent,
    System,
}

impl MessageRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Agent => "agent",
            MessageRole::System => "system",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user" => Some(MessageRole::User),
            "agent" => Some(MessageRole::Agent),
            "system" => Some(MessageRole::System),
            _ => None,
        }
    }
}

/// One entry in the chat panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Ids of whiteboard items this message refers to.
    pub related_items: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageDescriptor {
    pub role: MessageRole,
    pub content: String,
    pub related_items: Vec<Uuid>,
}

impl MessageDescriptor {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            related_items: Vec::new(),
        }
    }
}

//=========================================================================================
// Project (Aggregate Root)
//=========================================================================================

/// All items and messages of one whiteboard session.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<WhiteboardItem>,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            items: Vec::new(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("New Project", Some("A new whiteboard project".to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Returns the current time, nudged forward if the clock has not moved past `previous`.
pub fn timestamp_after(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip_case_insensitively() {
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::from_name(kind.as_str()), Some(kind));
            assert_eq!(
                ItemKind::from_name(&kind.as_str().to_uppercase()),
                Some(kind)
            );
        }
        assert_eq!(ItemKind::from_name("whiteboard"), None);
    }

    #[test]
    fn defaults_fit_within_maxima() {
        for kind in ItemKind::ALL {
            let (w, h) = kind.default_dimensions();
            let (max_w, max_h) = kind.max_dimensions();
            assert!(w <= max_w && h <= max_h, "{:?} defaults exceed maxima", kind);
        }
    }

    #[test]
    fn blank_arrow_and_shape_get_their_extras() {
        let arrow = ItemDescriptor::blank(ItemKind::Arrow, Point::new(500.0, 300.0));
        assert_eq!(arrow.start_point, Some(Point::new(0.0, 0.0)));
        assert_eq!(arrow.end_point, Some(Point::new(150.0, 0.0)));
        assert_eq!(arrow.position, Point::new(400.0, 275.0));
        assert_eq!(arrow.created_by, Provenance::User);

        let shape = ItemDescriptor::blank(ItemKind::Shape, Point::new(0.0, 0.0));
        assert_eq!(shape.shape_type, Some(ShapeType::Rectangle));
        assert_eq!(shape.content, "Shape description...");
    }

    #[test]
    fn timestamp_after_is_strictly_later() {
        let future = Utc::now() + Duration::seconds(60);
        assert!(timestamp_after(future) > future);
        let past = Utc::now() - Duration::seconds(60);
        assert!(timestamp_after(past) > past);
    }
}
