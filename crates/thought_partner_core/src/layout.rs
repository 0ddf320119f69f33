//! crates/thought_partner_core/src/layout.rs
//!
//! Places newly created items on the visible part of the board.
//!
//! This is a grid heuristic, not bin packing: new items fill up to three
//! columns, and the grid starts below the most recently added item. Collisions
//! with other existing items are not checked.

use crate::domain::{ItemDescriptor, WhiteboardItem};

/// Gap between items and between items and the viewport edge.
pub const MARGIN: f64 = 20.0;
pub const MAX_COLUMNS: usize = 3;
/// Rows are never shorter than this, so short items keep a regular rhythm.
pub const MIN_ROW_HEIGHT: f64 = 200.0;
/// How close to the bottom edge the grid may start before it moves right instead.
const BOTTOM_RESERVE: f64 = 100.0;

/// The visible size of the whiteboard canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    /// Used when the canvas could not be measured.
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Where the grid of new items starts, and why.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Origin {
    /// The board is empty.
    Fresh { x: f64, y: f64 },
    /// Below the last existing item.
    BelowExisting { x: f64, y: f64 },
    /// Below would run off the bottom, so back to the top, right of the last item.
    ShiftedRight { x: f64, y: f64 },
}

impl Origin {
    pub fn coordinates(self) -> (f64, f64) {
        match self {
            Origin::Fresh { x, y }
            | Origin::BelowExisting { x, y }
            | Origin::ShiftedRight { x, y } => (x, y),
        }
    }
}

/// Decides where the next batch starts, based on the last item on the board.
pub fn plan_origin(existing: &[WhiteboardItem], viewport: Viewport) -> Origin {
    let Some(last) = existing.last() else {
        return Origin::Fresh {
            x: MARGIN,
            y: MARGIN,
        };
    };

    let (last_width, last_height) = last.size();
    let below = last.position.y + last_height + MARGIN;
    if below > viewport.height - BOTTOM_RESERVE {
        Origin::ShiftedRight {
            x: last.position.x + last_width + MARGIN,
            y: MARGIN,
        }
    } else {
        Origin::BelowExisting {
            x: MARGIN,
            y: below,
        }
    }
}

/// Returns `new_items` with positions assigned, in the same order.
pub fn layout(
    new_items: &[ItemDescriptor],
    existing: &[WhiteboardItem],
    viewport: Viewport,
) -> Vec<ItemDescriptor> {
    if new_items.is_empty() {
        return Vec::new();
    }

    let columns = new_items.len().min(MAX_COLUMNS);
    let column_width = (viewport.width - MARGIN) / columns as f64 - MARGIN;
    let (start_x, start_y) = plan_origin(existing, viewport).coordinates();

    let mut placed = Vec::with_capacity(new_items.len());
    let mut row_top = start_y;
    for row in new_items.chunks(columns) {
        let row_height = row
            .iter()
            .map(|item| item.size().1.max(MIN_ROW_HEIGHT) + MARGIN)
            .fold(0.0, f64::max);

        for (column, item) in row.iter().enumerate() {
            let (width, height) = item.size();
            let x = start_x + column as f64 * (column_width + MARGIN);
            let mut positioned = item.clone();
            positioned.position.x = clamp_axis(x, width, viewport.width);
            positioned.position.y = clamp_axis(row_top, height, viewport.height);
            placed.push(positioned);
        }

        row_top += row_height;
    }
    placed
}

/// Keeps an item of `size` inside `[MARGIN, extent - size - MARGIN]`, never below `MARGIN`.
fn clamp_axis(value: f64, size: f64, extent: f64) -> f64 {
    let upper = (extent - size - MARGIN).max(MARGIN);
    value.clamp(MARGIN, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemKind, Point, Provenance};
    use chrono::Utc;
    use uuid::Uuid;

    fn stickies(count: usize) -> Vec<ItemDescriptor> {
        (0..count)
            .map(|n| {
                ItemDescriptor::new(ItemKind::Sticky, format!("note {}", n), Provenance::Agent)
            })
            .collect()
    }

    fn existing_at(x: f64, y: f64, width: f64, height: f64) -> WhiteboardItem {
        let now = Utc::now();
        WhiteboardItem {
            id: Uuid::new_v4(),
            kind: ItemKind::Text,
            position: Point::new(x, y),
            content: "existing".to_string(),
            width: Some(width),
            height: Some(height),
            color: None,
            created_by: Provenance::User,
            created_at: now,
            updated_at: now,
            shape_type: None,
            start_point: None,
            end_point: None,
            columns: None,
            rows: None,
        }
    }

    #[test]
    fn four_items_stay_inside_viewport_and_cycle_columns() {
        let viewport = Viewport::new(900.0, 600.0);
        let placed = layout(&stickies(4), &[], viewport);
        assert_eq!(placed.len(), 4);

        for item in &placed {
            let (w, h) = item.size();
            assert!(item.position.x >= 0.0 && item.position.x <= 900.0 - w);
            assert!(item.position.y >= 0.0 && item.position.y <= 600.0 - h);
        }

        // Columns repeat every three items; the fourth starts a new row.
        assert_eq!(placed[0].position.x, placed[3].position.x);
        assert!(placed[0].position.x < placed[1].position.x);
        assert!(placed[1].position.x < placed[2].position.x);
        assert_eq!(placed[0].position.y, placed[1].position.y);
        assert!(placed[3].position.y > placed[0].position.y);
    }

    #[test]
    fn grid_uses_column_width_and_row_height() {
        let placed = layout(&stickies(4), &[], Viewport::new(900.0, 600.0));
        let column_width = 880.0 / 3.0 - MARGIN;
        assert_eq!(placed[0].position, Point::new(MARGIN, MARGIN));
        assert!((placed[1].position.x - (MARGIN + column_width + MARGIN)).abs() < 1e-9);
        assert_eq!(placed[3].position.y, MARGIN + 200.0 + MARGIN);
    }

    #[test]
    fn short_items_still_get_minimum_row_height() {
        let heading = |n: usize| {
            ItemDescriptor::new(ItemKind::Heading, format!("h{}", n), Provenance::Agent)
        };
        let items: Vec<_> = (0..4).map(heading).collect();
        let placed = layout(&items, &[], Viewport::new(1400.0, 900.0));
        assert_eq!(placed[3].position.y - placed[0].position.y, MIN_ROW_HEIGHT + MARGIN);
    }

    #[test]
    fn starts_below_last_existing_item_when_room_remains() {
        let existing = [existing_at(40.0, 100.0, 300.0, 150.0)];
        let viewport = Viewport::new(900.0, 800.0);
        assert_eq!(
            plan_origin(&existing, viewport),
            Origin::BelowExisting { x: MARGIN, y: 270.0 }
        );
        let placed = layout(&stickies(1), &existing, viewport);
        assert_eq!(placed[0].position, Point::new(MARGIN, 270.0));
    }

    #[test]
    fn low_last_item_resets_to_top_and_shifts_right() {
        let existing = [existing_at(20.0, 500.0, 300.0, 200.0)];
        let viewport = Viewport::new(900.0, 600.0);
        assert_eq!(
            plan_origin(&existing, viewport),
            Origin::ShiftedRight { x: 340.0, y: MARGIN }
        );
        let placed = layout(&stickies(1), &existing, viewport);
        assert_eq!(placed[0].position, Point::new(340.0, MARGIN));
    }

    #[test]
    fn positions_are_clamped_into_small_viewports() {
        let placed = layout(&stickies(3), &[], Viewport::new(200.0, 150.0));
        for item in placed {
            assert_eq!(item.position, Point::new(MARGIN, MARGIN));
        }
    }

    #[test]
    fn layout_preserves_order_and_content() {
        let items = stickies(5);
        let placed = layout(&items, &[], Viewport::default());
        let contents: Vec<_> = placed.iter().map(|i| i.content.clone()).collect();
        let expected: Vec<_> = items.iter().map(|i| i.content.clone()).collect();
        assert_eq!(contents, expected);
        assert!(layout(&[], &[], Viewport::default()).is_empty());
    }
}
