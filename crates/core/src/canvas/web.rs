use crate::config::{WebConfig, MIN_WEB_SPACING};
use crate::render::{Rgba, Surface};

use super::{Animation, PointerContext, Vec2};

const NODE_COLOR: Rgba = Rgba::rgb(0, 243, 255);
const LINK_COLOR: Rgba = Rgba::rgb(188, 19, 254);
const NODE_RADIUS: f32 = 1.5;
const WAVE_SPEED: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebNode {
    pub origin: Vec2,
    pub position: Vec2,
    pub velocity: Vec2,
    phase: f32,
}

/// A grid of nodes held to their origins by springs and pushed away by the
/// pointer.
#[derive(Debug, Clone)]
pub struct SpringWeb {
    config: WebConfig,
    pointer: PointerContext,
    nodes: Vec<WebNode>,
    cols: usize,
    rows: usize,
    width: f32,
    height: f32,
}

impl SpringWeb {
    pub fn new(config: WebConfig, pointer: PointerContext) -> Self {
        Self {
            config,
            pointer,
            nodes: Vec::new(),
            cols: 0,
            rows: 0,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn nodes(&self) -> &[WebNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [WebNode] {
        &mut self.nodes
    }

    /// Grid dimensions as `(columns, rows)`.
    pub fn grid(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn tile(&mut self) {
        let spacing = if self.config.spacing.is_finite() {
            self.config.spacing.max(MIN_WEB_SPACING)
        } else {
            WebConfig::default().spacing
        };
        self.cols = (self.width / spacing).ceil() as usize + 1;
        self.rows = (self.height / spacing).ceil() as usize + 1;
        self.cols = self.cols.max(2);
        self.rows = self.rows.max(2);

        let step_x = self.width / (self.cols - 1) as f32;
        let step_y = self.height / (self.rows - 1) as f32;
        self.nodes = (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (col, row)))
            .map(|(col, row)| {
                let origin = Vec2::new(col as f32 * step_x, row as f32 * step_y);
                WebNode {
                    origin,
                    position: origin,
                    velocity: Vec2::ZERO,
                    phase: (col + row) as f32 * 0.5,
                }
            })
            .collect();
        tracing::trace!(cols = self.cols, rows = self.rows, "web re-tiled");
    }
}

impl Animation for SpringWeb {
    fn name(&self) -> &'static str {
        "spring-web"
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.tile();
    }

    fn update(&mut self, frame: u64) {
        let config = self.config;
        let pointer = self.pointer.get();
        let t = frame as f32 * WAVE_SPEED;

        for node in &mut self.nodes {
            let rest = node.origin + Vec2::new(0.0, config.wave_amplitude * (t + node.phase).sin());
            node.velocity += (rest - node.position) * config.stiffness;

            if let Some(pointer) = pointer {
                let away = node.position - pointer;
                let distance = away.length();
                if distance > f32::EPSILON && distance < config.pointer_radius {
                    let force = (config.pointer_radius - distance) / config.pointer_radius;
                    node.velocity += away * (force * config.pointer_push / distance);
                }
            }

            node.velocity = node.velocity * config.friction;
            node.position += node.velocity;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(self.width, self.height);
        let reach = self.config.link_distance;

        for row in 0..self.rows {
            for col in 0..self.cols {
                let node = &self.nodes[row * self.cols + col];
                let right = (col + 1 < self.cols).then(|| &self.nodes[row * self.cols + col + 1]);
                let below = (row + 1 < self.rows).then(|| &self.nodes[(row + 1) * self.cols + col]);
                for neighbour in right.into_iter().chain(below) {
                    let distance = node.position.distance(neighbour.position);
                    if distance < reach {
                        let opacity = (1.0 - distance / reach) * 0.35;
                        surface.stroke_line(
                            node.position,
                            neighbour.position,
                            1.0,
                            LINK_COLOR.with_alpha(opacity),
                        );
                    }
                }
            }
        }

        for node in &self.nodes {
            surface.fill_circle(node.position, NODE_RADIUS, NODE_COLOR, 0.0);
        }
    }
}
