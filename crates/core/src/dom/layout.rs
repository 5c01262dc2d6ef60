use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Axis-aligned box in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlapping region, or `None` when the boxes do not touch.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < x || bottom < y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Measurements the host's layout engine can answer.
pub trait LayoutProbe {
    /// Border box of an element relative to the viewport.
    fn rect(&self, node: NodeId) -> Option<Rect>;

    /// Computed flex/grid `gap` of a container.
    fn gap(&self, _node: NodeId) -> Option<f32> {
        None
    }

    fn width(&self, node: NodeId) -> Option<f32> {
        self.rect(node).map(|rect| rect.width)
    }
}

/// In-memory probe for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    rects: HashMap<NodeId, Rect>,
    gaps: HashMap<NodeId, f32>,
}

impl StaticLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.rects.insert(node, rect);
    }

    pub fn set_width(&mut self, node: NodeId, width: f32) {
        let rect = self.rects.entry(node).or_default();
        rect.width = width;
    }

    pub fn set_gap(&mut self, node: NodeId, gap: f32) {
        self.gaps.insert(node, gap);
    }
}

impl LayoutProbe for StaticLayout {
    fn rect(&self, node: NodeId) -> Option<Rect> {
        self.rects.get(&node).copied()
    }

    fn gap(&self, node: NodeId) -> Option<f32> {
        self.gaps.get(&node).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_overlapping_boxes() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 80.0, 50.0, 20.0)));
        assert!(a.intersection(&Rect::new(200.0, 0.0, 10.0, 10.0)).is_none());
    }
}
