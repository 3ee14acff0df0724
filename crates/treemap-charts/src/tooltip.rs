//! Tooltip placement and content.

use treemap_common::{Point, TooltipPosition};
use treemap_config::DEFAULT_TOOLTIP_OFFSET;

/// Places the tooltip next to the pointer, relative to the container origin.
///
/// No clamping: near the right or bottom edge the tooltip can overflow the container.
#[must_use]
pub fn position(
    pointer_x: f64,
    pointer_y: f64,
    container_origin_x: f64,
    container_origin_y: f64,
    offset: f64,
) -> TooltipPosition {
    TooltipPosition {
        left: pointer_x - container_origin_x + offset,
        top: pointer_y - container_origin_y + offset,
    }
}

/// [`position`] with a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPositioner {
    offset: f64,
}

impl Default for TooltipPositioner {
    fn default() -> Self {
        Self::new(DEFAULT_TOOLTIP_OFFSET)
    }
}

impl TooltipPositioner {
    /// Creates a positioner with the given offset.
    #[must_use]
    pub const fn new(offset: f64) -> Self {
        Self { offset }
    }

    /// Position for a pointer and container origin, both in client coordinates.
    #[must_use]
    pub fn position(&self, pointer: Point, container_origin: Point) -> TooltipPosition {
        position(
            pointer.x,
            pointer.y,
            container_origin.x,
            container_origin.y,
            self.offset,
        )
    }
}

/// What the tooltip says about a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    /// Tile name, shown in bold.
    pub name: String,
    /// Tile category.
    pub category: Option<String>,
    /// Tile value as written in the source.
    pub value: Option<String>,
}

impl TooltipContent {
    /// The three tooltip lines.
    #[must_use]
    pub fn lines(&self) -> [String; 3] {
        [
            self.name.clone(),
            format!("Category: {}", self.category.as_deref().unwrap_or("")),
            format!("Value: {}", self.value.as_deref().unwrap_or("")),
        ]
    }
}
