//! One-shot scroll reveal.
//!
//! Elements tagged `.reveal` get the `active` class the first time they
//! cross the visibility threshold, after their optional `data-delay`.

use std::collections::BTreeSet;

use crate::config::RevealConfig;
use crate::dom::{Document, NodeId, Rect};
use crate::timeline::{Millis, TimerQueue};

pub const REVEAL_SELECTOR: &str = ".reveal";
pub const ACTIVE_CLASS: &str = "active";

/// One batched intersection notification for an observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Builds an entry from geometry for hosts without a native observer.
    pub fn from_geometry(
        target: NodeId,
        element: Rect,
        viewport: Rect,
        config: &RevealConfig,
    ) -> Self {
        Self {
            target,
            is_intersecting: qualifies(element, viewport, config),
        }
    }
}

/// Root margin in CSS syntax, for hosts configuring a native observer.
pub fn root_margin(config: &RevealConfig) -> String {
    format!("0px 0px -{}px 0px", config.bottom_margin)
}

/// Share of `element` visible inside the viewport after trimming the bottom
/// margin.
pub fn intersection_ratio(element: Rect, viewport: Rect, config: &RevealConfig) -> f32 {
    let root = Rect::new(
        viewport.x,
        viewport.y,
        viewport.width,
        (viewport.height - config.bottom_margin).max(0.0),
    );
    let area = element.area();
    if area <= 0.0 {
        // Zero-sized targets count as fully visible once inside the root.
        return match root.intersection(&element) {
            Some(_) => 1.0,
            None => 0.0,
        };
    }
    root.intersection(&element)
        .map(|overlap| (overlap.area() / area).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

pub fn qualifies(element: Rect, viewport: Rect, config: &RevealConfig) -> bool {
    let ratio = intersection_ratio(element, viewport, config);
    ratio > 0.0 && ratio >= config.threshold
}

#[derive(Debug, Clone)]
pub struct RevealAnimator {
    config: RevealConfig,
    observed: BTreeSet<NodeId>,
    pending: TimerQueue<NodeId>,
    revealed: usize,
}

impl RevealAnimator {
    /// Starts observing every reveal element. `None` when the page has none.
    pub fn init(doc: &Document, config: RevealConfig) -> Option<Self> {
        let observed: BTreeSet<_> = doc.query_selector_all(REVEAL_SELECTOR).into_iter().collect();
        if observed.is_empty() {
            tracing::debug!("no reveal elements on the page");
            return None;
        }
        Some(Self {
            config,
            observed,
            pending: TimerQueue::new(),
            revealed: 0,
        })
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observed.contains(&node)
    }

    pub fn observed(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.observed.iter().copied()
    }

    /// Number of elements that have been scheduled for reveal so far.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Handles a batch of notifications. Qualifying targets are unobserved
    /// immediately and scheduled for activation; anything no longer observed
    /// is ignored, so an element reveals at most once.
    pub fn on_intersections(&mut self, doc: &Document, entries: &[IntersectionEntry], now: Millis) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if !self.observed.remove(&entry.target) {
                continue;
            }
            let delay = delay_of(doc, entry.target);
            self.pending.schedule(now, delay, entry.target);
            self.revealed += 1;
            tracing::trace!(target = ?entry.target, delay, "reveal scheduled");
        }
    }

    /// Applies activations whose delay has elapsed.
    pub fn tick(&mut self, doc: &mut Document, now: Millis) {
        for node in self.pending.drain_due(now) {
            doc.add_class(node, ACTIVE_CLASS);
        }
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.next_deadline()
    }

    /// Stops observing everything still waiting. Scheduled activations
    /// still run.
    pub fn disconnect(&mut self) {
        self.observed.clear();
    }
}

fn delay_of(doc: &Document, node: NodeId) -> Millis {
    doc.attribute(node, "data-delay")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .map(|ms| ms as Millis)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let a = doc.create_element("div", &["reveal"], None);
        let b = doc.create_element("div", &["reveal"], None);
        doc.set_attribute(b, "data-delay", "150");
        doc.append_all(doc.root(), &[a, b]);
        (doc, a, b)
    }

    fn hit(target: NodeId) -> IntersectionEntry {
        IntersectionEntry {
            target,
            is_intersecting: true,
        }
    }

    #[test]
    fn no_reveal_elements_means_no_animator() {
        assert!(RevealAnimator::init(&Document::new(), RevealConfig::default()).is_none());
    }

    #[test]
    fn reveals_once_even_when_reentering() {
        let (mut doc, a, _) = page();
        let mut reveal = RevealAnimator::init(&doc, RevealConfig::default()).unwrap();

        reveal.on_intersections(&doc, &[hit(a)], 0);
        reveal.tick(&mut doc, 0);
        assert!(doc.has_class(a, ACTIVE_CLASS));
        assert!(!reveal.is_observing(a));

        doc.remove_class(a, ACTIVE_CLASS);
        reveal.on_intersections(&doc, &[hit(a), hit(a)], 500);
        reveal.tick(&mut doc, 10_000);
        assert!(!doc.has_class(a, ACTIVE_CLASS));
        assert_eq!(reveal.revealed(), 1);
    }

    #[test]
    fn honours_per_element_delay() {
        let (mut doc, _, b) = page();
        let mut reveal = RevealAnimator::init(&doc, RevealConfig::default()).unwrap();
        reveal.on_intersections(&doc, &[hit(b)], 1_000);
        reveal.tick(&mut doc, 1_100);
        assert!(!doc.has_class(b, ACTIVE_CLASS));
        assert_eq!(reveal.next_deadline(), Some(1_150));
        reveal.tick(&mut doc, 1_150);
        assert!(doc.has_class(b, ACTIVE_CLASS));
    }

    #[test]
    fn non_intersecting_entries_keep_observing() {
        let (doc, a, _) = page();
        let mut reveal = RevealAnimator::init(&doc, RevealConfig::default()).unwrap();
        reveal.on_intersections(
            &doc,
            &[IntersectionEntry {
                target: a,
                is_intersecting: false,
            }],
            0,
        );
        assert!(reveal.is_observing(a));
    }

    #[test]
    fn malformed_delay_is_zero() {
        let (mut doc, a, _) = page();
        doc.set_attribute(a, "data-delay", "soon");
        assert_eq!(delay_of(&doc, a), 0);
    }

    #[test]
    fn threshold_respects_bottom_margin() {
        let config = RevealConfig::default();
        let viewport = Rect::new(0.0, 0.0, 1_000.0, 800.0);
        // 100px tall element peeking 90px above the fold: only 10px fall
        // inside the trimmed root (720px), which is 10%.
        let element = Rect::new(0.0, 710.0, 200.0, 100.0);
        assert!((intersection_ratio(element, viewport, &config) - 0.1).abs() < 1e-4);
        assert!(!qualifies(element, viewport, &config));

        let higher = Rect::new(0.0, 700.0, 200.0, 100.0);
        assert!(qualifies(higher, viewport, &config));
        assert_eq!(root_margin(&config), "0px 0px -80px 0px");
    }
}
