use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ConstellationConfig;
use crate::render::{Rgba, Surface};

use super::{Animation, PointerContext, Vec2};

const CYAN: Rgba = Rgba::rgb(0, 243, 255);
const PURPLE: Rgba = Rgba::rgb(188, 19, 254);
const SLATE: Rgba = Rgba::rgb(100, 116, 139);
const GLOW: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: Rgba,
}

/// Drifting particles joined by faint lines, pulled towards the pointer.
#[derive(Debug, Clone)]
pub struct Constellation {
    config: ConstellationConfig,
    pointer: PointerContext,
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl Constellation {
    pub fn new(config: ConstellationConfig, pointer: PointerContext, seed: u64) -> Self {
        Self {
            config,
            pointer,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    fn spawn_particles(&mut self) {
        let speed = self.config.initial_speed;
        let min_size = self.config.min_size;
        let max_size = self.config.max_size.max(min_size);
        let mut particles = Vec::with_capacity(self.config.particle_count);
        for _ in 0..self.config.particle_count {
            let rng = &mut self.rng;
            particles.push(Particle {
                position: Vec2::new(rng.gen::<f32>() * self.width, rng.gen::<f32>() * self.height),
                velocity: Vec2::new(
                    (rng.gen::<f32>() - 0.5) * speed,
                    (rng.gen::<f32>() - 0.5) * speed,
                ),
                size: min_size + rng.gen::<f32>() * (max_size - min_size),
                color: if rng.gen_bool(0.5) { CYAN } else { PURPLE },
            });
        }
        self.particles = particles;
    }

    fn step_particle(&mut self, index: usize, pointer: Option<Vec2>) {
        let config = self.config;
        let (width, height) = (self.width, self.height);
        let particle = &mut self.particles[index];

        particle.position += particle.velocity;
        if particle.position.x < 0.0 || particle.position.x > width {
            particle.velocity.x = -particle.velocity.x;
        }
        if particle.position.y < 0.0 || particle.position.y > height {
            particle.velocity.y = -particle.velocity.y;
        }

        if let Some(pointer) = pointer {
            let delta = pointer - particle.position;
            let distance = delta.length();
            if distance > f32::EPSILON && distance < config.pointer_distance {
                let force = (config.pointer_distance - distance) / config.pointer_distance;
                particle.velocity += delta * (force * config.pointer_pull / distance);
            }
        }

        particle.velocity = particle.velocity * config.friction;

        let rng = &mut self.rng;
        if particle.velocity.x.abs() < config.min_speed {
            particle.velocity.x += (rng.gen::<f32>() - 0.5) * config.jitter;
        }
        if particle.velocity.y.abs() < config.min_speed {
            particle.velocity.y += (rng.gen::<f32>() - 0.5) * config.jitter;
        }
    }
}

impl Animation for Constellation {
    fn name(&self) -> &'static str {
        "constellation"
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.spawn_particles();
    }

    fn update(&mut self, _frame: u64) {
        let pointer = self.pointer.get();
        for index in 0..self.particles.len() {
            self.step_particle(index, pointer);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(self.width, self.height);
        let pointer = self.pointer.get();
        let reach = self.config.connection_distance;

        for (i, a) in self.particles.iter().enumerate() {
            let near_pointer = pointer
                .is_some_and(|p| a.position.distance(p) < self.config.pointer_distance);
            for b in &self.particles[i + 1..] {
                let distance = a.position.distance(b.position);
                if distance >= reach {
                    continue;
                }
                let opacity = 1.0 - distance / reach;
                let color = if near_pointer {
                    CYAN.with_alpha(opacity * 0.6)
                } else {
                    SLATE.with_alpha(opacity * 0.3)
                };
                surface.stroke_line(a.position, b.position, 1.0, color);
            }
        }

        for particle in &self.particles {
            surface.fill_circle(particle.position, particle.size, particle.color, GLOW);
        }
    }
}
