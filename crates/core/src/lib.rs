//! Core library for the Rturox-Tech website.
//!
//! The crate holds the page behaviour independently of any browser engine.
//! The browser is reached through small seams: an in-memory element tree
//! ([`Document`]), a measurement probe ([`LayoutProbe`]), host-supplied
//! millisecond timestamps and a drawing [`Surface`]. A web host forwards
//! real DOM events into [`Page`]; native tests and the CLI use the in-memory
//! implementations shipped here.

pub mod canvas;
pub mod config;
pub mod content;
pub mod dom;
pub mod error;
pub mod nav;
pub mod page;
pub mod rebuild;
pub mod render;
pub mod reveal;
pub mod slider;
pub mod timeline;
pub mod viewport;

pub use canvas::{
    Animation, Constellation, FrameLoop, LoopHandle, PointerContext, SpringWeb, Vec2,
};
pub use config::{Breakpoints, RevealConfig, SiteConfig, SliderConfig};
pub use content::{Organization, SiteContent};
pub use dom::{Document, LayoutProbe, NodeId, Rect, StaticLayout};
pub use error::{Result, SiteError};
pub use nav::{NavToggle, ScrollRequest, SmoothScroll};
pub use page::{skeleton, Page, Viewport};
pub use rebuild::{ColdCache, ImageCache, ResponsiveRebuilder, Section};
pub use render::{DrawList, Rgba, Surface};
pub use reveal::{IntersectionEntry, RevealAnimator};
pub use slider::{Slider, SliderBinding, SliderEvent};
pub use timeline::{Debouncer, Millis, TimerQueue};
pub use viewport::{LayoutTier, Variant};
