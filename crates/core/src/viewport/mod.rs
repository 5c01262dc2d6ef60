//! Viewport classification into layout tiers.

use serde::{Deserialize, Serialize};

use crate::config::Breakpoints;

/// Layout tier derived from a viewport width snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutTier {
    Mobile,
    Tablet,
    Desktop,
}

/// Which of the two mutually exclusive subtrees a section currently renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    None,
    Mobile,
    Desktop,
}

impl LayoutTier {
    /// Classifies a viewport width. Widths below the tablet breakpoint are
    /// mobile, widths at or above the desktop breakpoint are desktop.
    pub fn classify(width: f32, breakpoints: &Breakpoints) -> Self {
        if width >= breakpoints.desktop {
            LayoutTier::Desktop
        } else if width >= breakpoints.tablet {
            LayoutTier::Tablet
        } else {
            LayoutTier::Mobile
        }
    }

    /// Two-way split used by the processes and projects sections.
    pub fn content_variant(self) -> Variant {
        match self {
            LayoutTier::Desktop => Variant::Desktop,
            LayoutTier::Tablet | LayoutTier::Mobile => Variant::Mobile,
        }
    }

    /// The navbar keeps its desktop rendition on tablets.
    pub fn navbar_variant(self) -> Variant {
        match self {
            LayoutTier::Mobile => Variant::Mobile,
            LayoutTier::Tablet | LayoutTier::Desktop => Variant::Desktop,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutTier::Mobile => "mobile",
            LayoutTier::Tablet => "tablet",
            LayoutTier::Desktop => "desktop",
        }
    }
}

/// Scroll-animation offsets applied to the "who we are" cards and FAQ
/// accordions for a tier. Mobile leaves whatever the markup declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AosOffsets {
    pub cards: u32,
    pub accordions: u32,
}

pub fn aos_offsets(tier: LayoutTier) -> Option<AosOffsets> {
    match tier {
        LayoutTier::Desktop => Some(AosOffsets {
            cards: 900,
            accordions: 400,
        }),
        LayoutTier::Tablet => Some(AosOffsets {
            cards: 300,
            accordions: 200,
        }),
        LayoutTier::Mobile => None,
    }
}
