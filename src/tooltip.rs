//! Viewport-clamped tooltip placement, shared by every hoverable chart.

use serde::{Deserialize, Serialize};

/// Gap between the pointer and the tooltip box.
pub const ANCHOR_OFFSET: f64 = 16.0;
/// Minimum distance kept from every viewport edge.
pub const EDGE_PAD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left corner for a tooltip of size `tip` anchored at `anchor`.
///
/// Prefers above-right of the anchor, drops below-right when the top edge would clip,
/// then pulls the box back inside the right, left, bottom and top edges in that order.
/// A box larger than the viewport ends up pinned to the top-left padding.
pub fn clamp_tooltip(anchor: Point, tip: Size, viewport: Size) -> Point {
    let mut x = anchor.x + ANCHOR_OFFSET;
    let mut y = anchor.y - tip.height - ANCHOR_OFFSET;

    if y < EDGE_PAD {
        y = anchor.y + ANCHOR_OFFSET;
    }
    if x + tip.width + EDGE_PAD > viewport.width {
        x = viewport.width - tip.width - EDGE_PAD;
    }
    if x < EDGE_PAD {
        x = EDGE_PAD;
    }
    if y + tip.height + EDGE_PAD > viewport.height {
        y = viewport.height - tip.height - EDGE_PAD;
    }
    if y < EDGE_PAD {
        y = EDGE_PAD;
    }
    Point { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = clamp_tooltip(Point::new(5.0, 5.0), Size::new(50.0, 20.0), Size::new(300.0, 200.0));
        let b = clamp_tooltip(Point::new(5.0, 5.0), Size::new(50.0, 20.0), Size::new(300.0, 200.0));
        assert_eq!(a, b);
    }
}
