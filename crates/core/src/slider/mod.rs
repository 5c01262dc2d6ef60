//! Drag, keyboard and resize aware carousel.
//!
//! [`Slider`] holds the index arithmetic and gesture state and knows nothing
//! about the page. [`SliderBinding`] attaches one to a slider container in a
//! [`Document`](crate::dom::Document) and writes the results back as inline
//! styles and button attributes.

mod binding;

pub use binding::{init_sliders, SliderBinding, SliderEvent, SliderParts, SLIDER_CONTAINERS};

use serde::{Deserialize, Serialize};

use crate::config::SliderConfig;
use crate::timeline::{Debouncer, FrameThrottle, Millis};

/// Persistent slider state. `index` never exceeds `max(0, items - visible)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderState {
    pub index: usize,
    pub item_width: f32,
    pub gap: f32,
}

/// Raw measurements reported by the host. `None` or non-positive values
/// fall back to the configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    pub wrapper_width: f32,
    pub item_width: Option<f32>,
    pub gap: Option<f32>,
}

/// Resting position the track should move to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settle {
    pub index: usize,
    pub offset: f32,
    pub animate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderKey {
    ArrowLeft,
    ArrowRight,
}

impl SliderKey {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(SliderKey::ArrowLeft),
            "ArrowRight" => Some(SliderKey::ArrowRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    pointer_id: i32,
    start_x: f32,
    start_offset: f32,
}

#[derive(Debug, Clone)]
pub struct Slider {
    state: SliderState,
    item_count: usize,
    wrapper_width: f32,
    drag: Option<DragState>,
    frame: FrameThrottle<f32>,
    relayout: Debouncer,
    config: SliderConfig,
}

impl Slider {
    pub fn new(config: SliderConfig, item_count: usize, measurements: Measurements) -> Self {
        let mut slider = Self {
            state: SliderState {
                index: 0,
                item_width: config.fallback_item_width,
                gap: config.fallback_gap,
            },
            item_count,
            wrapper_width: 1.0,
            drag: None,
            frame: FrameThrottle::default(),
            relayout: Debouncer::new(config.debounce_ms),
            config,
        };
        slider.apply_measurements(measurements);
        slider.clamp_index();
        slider
    }

    pub fn state(&self) -> SliderState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.state.index
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Distance between the left edges of two neighbouring items.
    pub fn stride(&self) -> f32 {
        self.state.item_width + self.state.gap
    }

    /// Number of whole items that fit inside the wrapper, at least one.
    pub fn visible_count(&self) -> usize {
        let fit = ((self.wrapper_width + self.state.gap) / self.stride()).floor();
        if fit.is_finite() && fit >= 1.0 {
            fit as usize
        } else {
            1
        }
    }

    pub fn max_index(&self) -> usize {
        self.item_count.saturating_sub(self.visible_count())
    }

    pub fn clamp_index(&mut self) {
        self.state.index = self.state.index.min(self.max_index());
    }

    /// Items moved per prev/next press. One item of the previous page stays
    /// in view.
    pub fn step(&self) -> usize {
        self.visible_count().saturating_sub(1).max(1)
    }

    pub fn offset_for(&self, index: usize) -> f32 {
        index as f32 * self.stride()
    }

    pub fn buttons(&self) -> ButtonState {
        ButtonState {
            prev_disabled: self.state.index == 0,
            next_disabled: self.state.index >= self.max_index(),
        }
    }

    pub fn next(&mut self) -> Option<Settle> {
        if self.item_count == 0 {
            return None;
        }
        self.state.index = (self.state.index + self.step()).min(self.max_index());
        self.clamp_index();
        Some(self.settle(true))
    }

    pub fn prev(&mut self) -> Option<Settle> {
        if self.item_count == 0 {
            return None;
        }
        self.state.index = self.state.index.saturating_sub(self.step());
        self.clamp_index();
        Some(self.settle(true))
    }

    pub fn key(&mut self, key: SliderKey) -> Option<Settle> {
        match key {
            SliderKey::ArrowLeft => self.prev(),
            SliderKey::ArrowRight => self.next(),
        }
    }

    /// Starts a drag gesture. Empty sliders ignore the press.
    pub fn press(&mut self, pointer_id: i32, x: f32) -> bool {
        if self.item_count == 0 {
            return false;
        }
        self.drag = Some(DragState {
            pointer_id,
            start_x: x,
            start_offset: self.offset_for(self.state.index),
        });
        self.frame.cancel();
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Follows the pointer. The offset is not snapped to an item; it is only
    /// kept from scrolling before the first item. Returns `false` when no
    /// drag is active or the move belongs to another pointer.
    pub fn drag_to(&mut self, pointer_id: i32, x: f32) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        if drag.pointer_id != pointer_id {
            return false;
        }
        let offset = (drag.start_offset - (x - drag.start_x)).max(0.0);
        self.frame.request(offset);
        true
    }

    /// Offset to paint on the next animation frame while dragging.
    pub fn take_frame(&mut self) -> Option<f32> {
        self.frame.take()
    }

    /// Ends the drag and snaps to the nearest item the pointer travelled to.
    pub fn release(&mut self, pointer_id: i32, x: f32) -> Option<Settle> {
        let drag = self.drag.filter(|drag| drag.pointer_id == pointer_id)?;
        self.drag = None;
        self.frame.cancel();

        let delta = x - drag.start_x;
        let moved = js_round(-delta / self.stride());
        let target = (self.state.index as i64).saturating_add(moved).max(0);
        self.state.index = usize::try_from(target).unwrap_or(usize::MAX);
        self.clamp_index();
        Some(self.settle(true))
    }

    /// Aborts the drag and returns to the current index.
    pub fn cancel_drag(&mut self) -> Option<Settle> {
        self.drag.take()?;
        self.frame.cancel();
        Some(self.settle(true))
    }

    /// Restarts the relayout quiet period.
    pub fn request_relayout(&mut self, now: Millis) {
        self.relayout.trigger(now);
    }

    /// `true` once the quiet period after the last relayout request is over.
    pub fn relayout_due(&mut self, now: Millis) -> bool {
        self.relayout.poll(now)
    }

    pub fn relayout_deadline(&self) -> Option<Millis> {
        self.relayout.deadline()
    }

    /// Adopts fresh measurements and re-settles without animation.
    pub fn relayout(&mut self, item_count: usize, measurements: Measurements) -> Settle {
        self.item_count = item_count;
        self.apply_measurements(measurements);
        self.clamp_index();
        self.settle(false)
    }

    fn apply_measurements(&mut self, measurements: Measurements) {
        self.state.item_width = positive(measurements.item_width.map(f32::round))
            .unwrap_or(self.config.fallback_item_width);
        self.state.gap = positive(measurements.gap).unwrap_or(self.config.fallback_gap);
        self.wrapper_width = positive(Some(measurements.wrapper_width))
            .unwrap_or(0.0)
            .max(1.0);
        tracing::trace!(
            item_width = self.state.item_width,
            gap = self.state.gap,
            wrapper = self.wrapper_width,
            "slider measured"
        );
    }

    fn settle(&self, animate: bool) -> Settle {
        Settle {
            index: self.state.index,
            offset: self.offset_for(self.state.index),
            animate,
        }
    }
}

fn positive(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Rounds half-way cases towards positive infinity, the way browsers round
/// pointer deltas (`Math.round`).
fn js_round(value: f32) -> i64 {
    if value.is_finite() {
        (value + 0.5).floor() as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider(items: usize, wrapper: f32, item: f32, gap: f32) -> Slider {
        Slider::new(
            SliderConfig::default(),
            items,
            Measurements {
                wrapper_width: wrapper,
                item_width: Some(item),
                gap: Some(gap),
            },
        )
    }

    #[test]
    fn next_steps_with_overlap_and_clamps() {
        // 3 * 220 + 2 * 16 = 692 fits exactly three items.
        let mut s = slider(7, 692.0, 220.0, 16.0);
        assert_eq!(s.visible_count(), 3);
        assert_eq!(s.max_index(), 4);

        let indices: Vec<_> = (0..3).map(|_| s.next().unwrap().index).collect();
        assert_eq!(indices, vec![2, 4, 4]);
        assert!(s.buttons().next_disabled);
        assert!(!s.buttons().prev_disabled);
    }

    #[test]
    fn prev_saturates_at_zero() {
        let mut s = slider(7, 692.0, 220.0, 16.0);
        s.next();
        assert_eq!(s.prev().unwrap().index, 0);
        assert_eq!(s.prev().unwrap().index, 0);
        assert!(s.buttons().prev_disabled);
    }

    #[test]
    fn settle_offset_is_index_times_stride() {
        let mut s = slider(7, 692.0, 220.0, 16.0);
        let settle = s.next().unwrap();
        assert_eq!(settle.offset, 472.0);
        assert!(settle.animate);
    }

    #[test]
    fn empty_slider_is_inert() {
        let mut s = slider(0, 692.0, 220.0, 16.0);
        assert!(s.next().is_none());
        assert!(s.prev().is_none());
        assert!(!s.press(1, 10.0));
        assert_eq!(s.index(), 0);
        assert!(s.buttons().prev_disabled && s.buttons().next_disabled);
    }

    #[test]
    fn degenerate_measurements_fall_back() {
        let s = Slider::new(
            SliderConfig::default(),
            3,
            Measurements {
                wrapper_width: -5.0,
                item_width: Some(0.0),
                gap: Some(f32::NAN),
            },
        );
        assert_eq!(s.state().item_width, 220.0);
        assert_eq!(s.state().gap, 16.0);
        assert_eq!(s.visible_count(), 1);
    }

    #[test]
    fn drag_left_by_two_strides_moves_two_items() {
        let mut s = slider(10, 692.0, 220.0, 16.0);
        assert!(s.press(1, 800.0));
        assert!(s.drag_to(1, 600.0));
        assert_eq!(s.take_frame(), Some(200.0));
        let settle = s.release(1, 800.0 - 2.0 * 236.0).unwrap();
        assert_eq!(settle.index, 2);
    }

    #[test]
    fn drag_offset_never_goes_before_first_item() {
        let mut s = slider(10, 692.0, 220.0, 16.0);
        s.press(1, 100.0);
        s.drag_to(1, 900.0);
        assert_eq!(s.take_frame(), Some(0.0));
        assert_eq!(s.release(1, 900.0).unwrap().index, 0);
    }

    #[test]
    fn short_drags_round_to_nearest_item() {
        let mut s = slider(10, 692.0, 220.0, 16.0);
        s.press(1, 500.0);
        assert_eq!(s.release(1, 500.0 - 117.0).unwrap().index, 0);
        s.press(1, 500.0);
        assert_eq!(s.release(1, 500.0 - 119.0).unwrap().index, 1);
    }

    #[test]
    fn release_from_other_pointer_is_ignored() {
        let mut s = slider(10, 692.0, 220.0, 16.0);
        s.press(1, 500.0);
        assert!(!s.drag_to(2, 0.0));
        assert!(s.release(2, 0.0).is_none());
        assert!(s.is_dragging());
        assert_eq!(s.cancel_drag().unwrap().index, 0);
        assert!(!s.is_dragging());
    }

    #[test]
    fn relayout_reclamps_without_animation() {
        let mut s = slider(7, 692.0, 220.0, 16.0);
        s.next();
        s.next();
        assert_eq!(s.index(), 4);
        // Wider wrapper shows all seven items.
        let settle = s.relayout(
            7,
            Measurements {
                wrapper_width: 2_000.0,
                item_width: Some(220.0),
                gap: Some(16.0),
            },
        );
        assert_eq!(settle.index, 0);
        assert!(!settle.animate);
    }

    #[test]
    fn relayout_is_debounced() {
        let mut s = slider(7, 692.0, 220.0, 16.0);
        s.request_relayout(0);
        s.request_relayout(100);
        assert!(!s.relayout_due(150));
        assert!(s.relayout_due(220));
        assert!(!s.relayout_due(400));
    }

    #[test]
    fn keys_map_to_navigation() {
        assert_eq!(SliderKey::from_key("ArrowLeft"), Some(SliderKey::ArrowLeft));
        assert_eq!(SliderKey::from_key("Enter"), None);
        let mut s = slider(7, 692.0, 220.0, 16.0);
        assert_eq!(s.key(SliderKey::ArrowRight).unwrap().index, 2);
        assert_eq!(s.key(SliderKey::ArrowLeft).unwrap().index, 0);
    }
}
