use serde::{Deserialize, Serialize};

use crate::canvas::Vec2;

/// Straight-alpha colour with channels in `0..=255` and alpha in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS colour string, as a 2D canvas context expects it.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Minimal 2D drawing surface. A web host forwards these calls to a
/// `CanvasRenderingContext2D`.
pub trait Surface {
    fn clear(&mut self, width: f32, height: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: f32);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
        glow: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
}

/// Surface that records every call, for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn circles(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn lines(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

impl Surface for DrawList {
    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            glow,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_colour_format() {
        let cyan = Rgba::rgb(0, 243, 255).with_alpha(0.6);
        assert_eq!(cyan.css(), "rgba(0, 243, 255, 0.6)");
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(4.0).a, 1.0);
    }

    #[test]
    fn records_commands() {
        let mut list = DrawList::new();
        list.clear(10.0, 10.0);
        list.fill_circle(Vec2::new(1.0, 1.0), 2.0, Rgba::rgb(0, 0, 0), 0.0);
        list.stroke_line(Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0, Rgba::rgb(0, 0, 0));
        assert_eq!(list.circles(), 1);
        assert_eq!(list.lines(), 1);
        assert_eq!(list.commands().len(), 3);
    }
}
