use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, SiteError};

/// Smallest grid spacing the spring web accepts, in pixels.
pub const MIN_WEB_SPACING: f32 = 4.0;

/// Top-level configuration structure for the site behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub breakpoints: Breakpoints,
    pub slider: SliderConfig,
    pub reveal: RevealConfig,
    pub constellation: ConstellationConfig,
    pub web: WebConfig,
}

impl SiteConfig {
    /// Parses a configuration document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    fn validate(&self) -> Result<()> {
        if self.breakpoints.tablet > self.breakpoints.desktop {
            return Err(SiteError::InvalidInput(
                "tablet breakpoint must not exceed the desktop breakpoint",
            ));
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(SiteError::InvalidInput(
                "reveal threshold must lie within [0, 1]",
            ));
        }
        if self.web.spacing.is_nan() || self.web.spacing < MIN_WEB_SPACING {
            return Err(SiteError::InvalidInput(
                "web spacing must be at least 4 pixels",
            ));
        }
        Ok(())
    }
}

/// Viewport widths (in CSS pixels) at which the layout tier changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    /// Smallest width classified as tablet.
    pub tablet: f32,
    /// Smallest width classified as desktop.
    pub desktop: f32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tablet: 768.0,
            desktop: 992.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Quiet period before a resize or mutation burst triggers a relayout.
    pub debounce_ms: u64,
    /// Item width used when the first item cannot be measured.
    pub fallback_item_width: f32,
    /// Gap used when the track reports no usable gap.
    pub fallback_gap: f32,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 120,
            fallback_item_width: 220.0,
            fallback_gap: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Share of the element that must be inside the root before it reveals.
    pub threshold: f32,
    /// Pixels trimmed from the bottom of the viewport root.
    pub bottom_margin: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.12,
            bottom_margin: 80.0,
        }
    }
}

/// Tuning for the particle constellation behind the hero section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstellationConfig {
    pub particle_count: usize,
    pub connection_distance: f32,
    pub pointer_distance: f32,
    pub pointer_pull: f32,
    pub friction: f32,
    /// Below this speed (per axis) a particle receives a random nudge.
    pub min_speed: f32,
    pub jitter: f32,
    pub initial_speed: f32,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self {
            particle_count: 60,
            connection_distance: 180.0,
            pointer_distance: 250.0,
            pointer_pull: 0.6,
            friction: 0.98,
            min_speed: 0.1,
            jitter: 0.05,
            initial_speed: 0.5,
            min_size: 1.0,
            max_size: 3.0,
        }
    }
}

/// Tuning for the spring web grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Target distance between neighbouring grid nodes.
    pub spacing: f32,
    pub stiffness: f32,
    pub pointer_radius: f32,
    pub pointer_push: f32,
    pub friction: f32,
    /// Links longer than this are not drawn.
    pub link_distance: f32,
    /// Vertical drift of the resting grid, in pixels.
    pub wave_amplitude: f32,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            spacing: 80.0,
            stiffness: 0.04,
            pointer_radius: 160.0,
            pointer_push: 2.4,
            friction: 0.9,
            link_distance: 140.0,
            wave_amplitude: 2.0,
        }
    }
}
