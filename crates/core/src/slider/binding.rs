use crate::config::SliderConfig;
use crate::dom::{Document, LayoutProbe, NodeId};
use crate::timeline::Millis;

use super::{Measurements, Settle, Slider, SliderKey};

/// Containers that receive a slider.
pub const SLIDER_CONTAINERS: &str = ".team-slider, .projects-slider";

/// Elements a slider instance is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderParts {
    pub container: NodeId,
    pub wrap: NodeId,
    pub track: NodeId,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

impl SliderParts {
    /// Locates the track and its wrapper. Buttons are optional.
    pub fn locate(doc: &Document, container: NodeId) -> Option<Self> {
        let wrap = doc.query_selector_within(container, ".slider-track-wrap")?;
        let track = doc.query_selector_within(container, ".slider-track")?;
        Some(Self {
            container,
            wrap,
            track,
            prev: doc.query_selector_within(container, ".slider-btn.prev"),
            next: doc.query_selector_within(container, ".slider-btn.next"),
        })
    }
}

/// Host events a slider reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderEvent {
    PrevClick,
    NextClick,
    PointerDown { pointer_id: i32, x: f32 },
    PointerMove { pointer_id: i32, x: f32 },
    PointerUp { pointer_id: i32, x: f32 },
    PointerCancel,
    Key(SliderKey),
    /// The wrapper changed size or the window resized.
    Resized,
    /// Items were added to or removed from the track.
    Mutated,
    /// Window `load`: fonts and images may have changed item widths.
    Loaded,
    AnimationFrame,
}

#[derive(Debug, Clone)]
pub struct SliderBinding {
    parts: SliderParts,
    slider: Slider,
    restore_transition: bool,
}

impl SliderBinding {
    /// Attaches a slider to `container`. Returns `None` when the container
    /// lacks a track or wrapper; other sliders are unaffected.
    pub fn attach(
        doc: &mut Document,
        container: NodeId,
        config: SliderConfig,
        probe: &dyn LayoutProbe,
        now: Millis,
    ) -> Option<Self> {
        let Some(parts) = SliderParts::locate(doc, container) else {
            tracing::debug!(?container, "slider container without track, skipping");
            return None;
        };
        let (count, measurements) = measure(doc, &parts, probe);
        if count == 0 {
            tracing::debug!(?container, "slider has no items yet");
        }
        let mut binding = Self {
            parts,
            slider: Slider::new(config, count, measurements),
            restore_transition: false,
        };
        doc.set_attribute(parts.wrap, "tabindex", "0");
        binding.update_buttons(doc);
        binding.slider.request_relayout(now);
        Some(binding)
    }

    pub fn parts(&self) -> &SliderParts {
        &self.parts
    }

    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    pub fn index(&self) -> usize {
        self.slider.index()
    }

    /// Translates a click on `target` into the matching button event.
    pub fn click_event(&self, doc: &Document, target: NodeId) -> Option<SliderEvent> {
        if self.parts.prev.is_some_and(|prev| doc.contains(prev, target)) {
            Some(SliderEvent::PrevClick)
        } else if self.parts.next.is_some_and(|next| doc.contains(next, target)) {
            Some(SliderEvent::NextClick)
        } else {
            None
        }
    }

    pub fn owns_pointer_target(&self, doc: &Document, target: NodeId) -> bool {
        doc.contains(self.parts.track, target)
    }

    pub fn owns_key_target(&self, doc: &Document, target: NodeId) -> bool {
        doc.contains(self.parts.wrap, target)
    }

    pub fn handle(&mut self, doc: &mut Document, event: SliderEvent, now: Millis) {
        match event {
            SliderEvent::PrevClick => {
                if self.is_disabled(doc, self.parts.prev) {
                    return;
                }
                let settle = self.slider.prev();
                self.apply(doc, settle);
            }
            SliderEvent::NextClick => {
                if self.is_disabled(doc, self.parts.next) {
                    return;
                }
                let settle = self.slider.next();
                self.apply(doc, settle);
            }
            SliderEvent::Key(key) => {
                let button = match key {
                    SliderKey::ArrowLeft => (self.parts.prev, SliderEvent::PrevClick),
                    SliderKey::ArrowRight => (self.parts.next, SliderEvent::NextClick),
                };
                if let (Some(_), click) = button {
                    self.handle(doc, click, now);
                }
            }
            SliderEvent::PointerDown { pointer_id, x } => {
                if self.slider.press(pointer_id, x) {
                    self.restore_transition = false;
                    doc.set_style(self.parts.track, "transition", "none");
                }
            }
            SliderEvent::PointerMove { pointer_id, x } => {
                self.slider.drag_to(pointer_id, x);
            }
            SliderEvent::PointerUp { pointer_id, x } => {
                if let Some(settle) = self.slider.release(pointer_id, x) {
                    doc.set_style(self.parts.track, "transition", "");
                    self.apply(doc, Some(settle));
                }
            }
            SliderEvent::PointerCancel => {
                if let Some(settle) = self.slider.cancel_drag() {
                    doc.set_style(self.parts.track, "transition", "");
                    self.apply(doc, Some(settle));
                }
            }
            SliderEvent::Resized | SliderEvent::Mutated | SliderEvent::Loaded => {
                self.slider.request_relayout(now);
            }
            SliderEvent::AnimationFrame => {
                if let Some(offset) = self.slider.take_frame() {
                    write_transform(doc, self.parts.track, offset);
                }
                if self.restore_transition && !self.slider.is_dragging() {
                    self.restore_transition = false;
                    doc.set_style(self.parts.track, "transition", "");
                }
            }
        }
    }

    /// Runs the debounced relayout once its quiet period has elapsed.
    pub fn tick(&mut self, doc: &mut Document, probe: &dyn LayoutProbe, now: Millis) {
        if !self.slider.relayout_due(now) {
            return;
        }
        let (count, measurements) = measure(doc, &self.parts, probe);
        let settle = self.slider.relayout(count, measurements);
        self.apply(doc, Some(settle));
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.slider.relayout_deadline()
    }

    /// Releases the wiring and clears the inline state the slider wrote.
    pub fn detach(self, doc: &mut Document) {
        doc.remove_attribute(self.parts.wrap, "tabindex");
        doc.set_style(self.parts.track, "transform", "");
        doc.set_style(self.parts.track, "transition", "");
        for button in [self.parts.prev, self.parts.next].into_iter().flatten() {
            doc.remove_attribute(button, "disabled");
        }
    }

    fn is_disabled(&self, doc: &Document, button: Option<NodeId>) -> bool {
        button.is_some_and(|b| doc.attribute(b, "disabled").is_some())
    }

    fn apply(&mut self, doc: &mut Document, settle: Option<Settle>) {
        let Some(settle) = settle else {
            return;
        };
        if !settle.animate {
            doc.set_style(self.parts.track, "transition", "none");
            self.restore_transition = true;
        }
        write_transform(doc, self.parts.track, settle.offset);
        self.update_buttons(doc);
        tracing::trace!(index = settle.index, offset = settle.offset, "slider settled");
    }

    fn update_buttons(&self, doc: &mut Document) {
        let (Some(prev), Some(next)) = (self.parts.prev, self.parts.next) else {
            return;
        };
        let state = self.slider.buttons();
        set_disabled(doc, prev, state.prev_disabled);
        set_disabled(doc, next, state.next_disabled);
    }
}

fn set_disabled(doc: &mut Document, button: NodeId, disabled: bool) {
    if disabled {
        doc.set_attribute(button, "disabled", "");
    } else {
        doc.remove_attribute(button, "disabled");
    }
}

fn write_transform(doc: &mut Document, track: NodeId, offset: f32) {
    doc.set_style(track, "transform", format!("translate3d(-{offset}px, 0, 0)"));
}

fn measure(doc: &Document, parts: &SliderParts, probe: &dyn LayoutProbe) -> (usize, Measurements) {
    let items = doc.query_selector_all_within(parts.track, ".slide-item");
    let measurements = Measurements {
        wrapper_width: probe.width(parts.wrap).unwrap_or(0.0),
        item_width: items.first().and_then(|item| probe.width(*item)),
        gap: probe.gap(parts.track),
    };
    (items.len(), measurements)
}

/// Attaches a slider to every slider container in the document.
pub fn init_sliders(
    doc: &mut Document,
    config: SliderConfig,
    probe: &dyn LayoutProbe,
    now: Millis,
) -> Vec<SliderBinding> {
    let containers = doc.query_selector_all(SLIDER_CONTAINERS);
    containers
        .into_iter()
        .filter_map(|container| SliderBinding::attach(doc, container, config, probe, now))
        .collect()
}
