//! Decorative canvas animations.
//!
//! Animations are plain per-frame update functions. A host frame source
//! (`requestAnimationFrame` on the web, a timer natively) calls
//! [`FrameLoop::tick`]; nothing here schedules itself.

mod constellation;
mod web;

use std::cell::Cell;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::render::Surface;

pub use constellation::{Constellation, Particle};
pub use web::{SpringWeb, WebNode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Last known pointer position, shared between the single listener that
/// writes it and every animation that reads it.
#[derive(Debug, Clone, Default)]
pub struct PointerContext {
    position: Rc<Cell<Option<Vec2>>>,
}

impl PointerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, x: f32, y: f32) {
        self.position.set(Some(Vec2::new(x, y)));
    }

    /// The pointer left the document.
    pub fn clear(&self) {
        self.position.set(None);
    }

    pub fn get(&self) -> Option<Vec2> {
        self.position.get()
    }
}

pub trait Animation {
    fn name(&self) -> &'static str;

    /// Rebuilds the entity layout for a new canvas size.
    fn resize(&mut self, width: f32, height: f32);

    /// Advances the simulation by one frame.
    fn update(&mut self, frame: u64);

    fn draw(&self, surface: &mut dyn Surface);
}

/// Stops the animation it was returned for.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    id: u64,
    running: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

struct Entry {
    id: u64,
    animation: Box<dyn Animation>,
    running: Rc<Cell<bool>>,
    frame: u64,
}

/// Drives a set of animations from host frame ticks.
pub struct FrameLoop {
    entries: Vec<Entry>,
    next_id: u64,
    width: f32,
    height: f32,
    visible: bool,
}

impl FrameLoop {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            width,
            height,
            visible: true,
        }
    }

    pub fn spawn(&mut self, mut animation: Box<dyn Animation>) -> LoopHandle {
        animation.resize(self.width, self.height);
        let running = Rc::new(Cell::new(true));
        let id = self.next_id;
        self.next_id += 1;
        tracing::debug!(name = animation.name(), id, "animation started");
        self.entries.push(Entry {
            id,
            animation,
            running: running.clone(),
            frame: 0,
        });
        LoopHandle { id, running }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        for entry in &mut self.entries {
            entry.animation.resize(width, height);
        }
    }

    /// Hidden pages keep their state but skip simulation and drawing.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Advances and draws every running animation. Returns how many ran.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> usize {
        self.entries.retain(|entry| {
            let running = entry.running.get();
            if !running {
                tracing::debug!(name = entry.animation.name(), id = entry.id, "animation stopped");
            }
            running
        });
        if !self.visible {
            return 0;
        }
        for entry in &mut self.entries {
            entry.animation.update(entry.frame);
            entry.animation.draw(surface);
            entry.frame += 1;
        }
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("animations", &self.entries.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("visible", &self.visible)
            .finish()
    }
}
