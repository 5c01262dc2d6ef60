//! Composition root.
//!
//! `Page` runs every initializer against one document and routes host
//! events to whichever components care about them. Components never talk
//! to each other; a section missing from the markup only disables the
//! component that needed it.

mod skeleton;

pub use skeleton::skeleton;

use crate::canvas::{Constellation, FrameLoop, LoopHandle, PointerContext, SpringWeb};
use crate::config::SiteConfig;
use crate::content::SiteContent;
use crate::dom::{Document, LayoutProbe, NodeId, Rect};
use crate::nav::{NavToggle, ScrollRequest, SmoothScroll};
use crate::rebuild::{ImageCache, ResponsiveRebuilder};
use crate::render::Surface;
use crate::reveal::{IntersectionEntry, RevealAnimator};
use crate::slider::{init_sliders, SliderBinding, SliderEvent, SliderKey};
use crate::timeline::Millis;
use crate::viewport::LayoutTier;

/// Window dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug)]
pub struct Page<P> {
    doc: Document,
    probe: P,
    config: SiteConfig,
    viewport: Viewport,
    page_y: f32,
    rebuilder: ResponsiveRebuilder,
    sliders: Vec<SliderBinding>,
    reveal: Option<RevealAnimator>,
    nav: Option<NavToggle>,
    pointer: PointerContext,
    frames: FrameLoop,
    loops: Vec<LoopHandle>,
}

impl<P: LayoutProbe> Page<P> {
    /// Runs the page-load initializers: the first rebuild, sliders, reveal
    /// observation, the navigation toggle and both canvas animations.
    pub fn load(
        mut doc: Document,
        probe: P,
        config: SiteConfig,
        content: SiteContent,
        viewport: Viewport,
        cache: &dyn ImageCache,
        now: Millis,
    ) -> Self {
        let mut rebuilder = ResponsiveRebuilder::attach(&doc, content, config.breakpoints);
        rebuilder.on_resize(&mut doc, viewport.width, cache);

        let sliders = init_sliders(&mut doc, config.slider, &probe, now);
        let reveal = RevealAnimator::init(&doc, config.reveal);
        let nav = NavToggle::attach(&doc);
        if nav.is_none() {
            tracing::debug!("navigation toggle missing, skipping");
        }

        let pointer = PointerContext::new();
        let mut frames = FrameLoop::new(viewport.width, viewport.height);
        let loops = vec![
            frames.spawn(Box::new(Constellation::new(
                config.constellation,
                pointer.clone(),
                now,
            ))),
            frames.spawn(Box::new(SpringWeb::new(config.web, pointer.clone()))),
        ];

        tracing::info!(
            sliders = sliders.len(),
            reveal = reveal.is_some(),
            nav = nav.is_some(),
            "page initialised"
        );

        Self {
            doc,
            probe,
            config,
            viewport,
            page_y: 0.0,
            rebuilder,
            sliders,
            reveal,
            nav,
            pointer,
            frames,
            loops,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn rebuilder(&self) -> &ResponsiveRebuilder {
        &self.rebuilder
    }

    pub fn sliders(&self) -> &[SliderBinding] {
        &self.sliders
    }

    pub fn reveal(&self) -> Option<&RevealAnimator> {
        self.reveal.as_ref()
    }

    pub fn nav(&self) -> Option<&NavToggle> {
        self.nav.as_ref()
    }

    pub fn pointer(&self) -> &PointerContext {
        &self.pointer
    }

    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }

    /// Window resize. The rebuilder runs immediately; sliders only restart
    /// their quiet period.
    pub fn resize(&mut self, viewport: Viewport, cache: &dyn ImageCache, now: Millis) -> LayoutTier {
        self.viewport = viewport;
        let tier = self.rebuilder.on_resize(&mut self.doc, viewport.width, cache);
        for slider in &mut self.sliders {
            slider.handle(&mut self.doc, SliderEvent::Resized, now);
        }
        self.frames.resize(viewport.width, viewport.height);
        tier
    }

    /// Window `load`: item widths may have changed once images arrived.
    pub fn loaded(&mut self, now: Millis) {
        for slider in &mut self.sliders {
            slider.handle(&mut self.doc, SliderEvent::Loaded, now);
        }
    }

    /// Children of `node` changed. Sliders whose track contains it relayout.
    pub fn mutated(&mut self, node: NodeId, now: Millis) {
        for slider in &mut self.sliders {
            if self.doc.contains(slider.parts().track, node) {
                slider.handle(&mut self.doc, SliderEvent::Mutated, now);
            }
        }
    }

    pub fn scrolled(&mut self, page_y: f32) {
        self.page_y = page_y;
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.set(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.clear();
    }

    /// Delivers a pointer gesture to the slider whose track contains
    /// `target`. Returns whether a slider took it.
    pub fn slider_pointer(&mut self, target: NodeId, event: SliderEvent, now: Millis) -> bool {
        let Some(slider) = self
            .sliders
            .iter_mut()
            .find(|slider| slider.owns_pointer_target(&self.doc, target))
        else {
            return false;
        };
        slider.handle(&mut self.doc, event, now);
        true
    }

    /// Key press with focus on `target`.
    pub fn key(&mut self, target: NodeId, key: &str, now: Millis) -> bool {
        let Some(key) = SliderKey::from_key(key) else {
            return false;
        };
        let Some(slider) = self
            .sliders
            .iter_mut()
            .find(|slider| slider.owns_key_target(&self.doc, target))
        else {
            return false;
        };
        slider.handle(&mut self.doc, SliderEvent::Key(key), now);
        true
    }

    /// Document click. Every component that cares sees it; an in-page
    /// anchor yields the scroll the host should perform.
    pub fn click(&mut self, target: NodeId, now: Millis) -> Option<ScrollRequest> {
        if let Some(nav) = self.nav {
            nav.on_click(&mut self.doc, target);
        }
        for slider in &mut self.sliders {
            if let Some(event) = slider.click_event(&self.doc, target) {
                slider.handle(&mut self.doc, event, now);
            }
        }
        self.rebuilder.on_click(&mut self.doc, target);

        let anchor = SmoothScroll::anchor_for(&self.doc, target)?;
        let request = SmoothScroll::resolve(&self.doc, &self.probe, anchor, self.page_y)?;
        tracing::trace!(top = request.top, hash = %request.hash, "smooth scroll");
        Some(request)
    }

    pub fn intersections(&mut self, entries: &[IntersectionEntry], now: Millis) {
        if let Some(reveal) = &mut self.reveal {
            reveal.on_intersections(&self.doc, entries, now);
        }
    }

    /// Computes intersection entries from probed geometry and delivers
    /// them, for hosts without a native observer.
    pub fn observe_reveals(&mut self, now: Millis) {
        let Some(reveal) = &mut self.reveal else {
            return;
        };
        let viewport = Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height);
        let entries: Vec<_> = reveal
            .observed()
            .filter_map(|node| {
                let rect = self.probe.rect(node)?;
                Some(IntersectionEntry::from_geometry(node, rect, viewport, reveal.config()))
            })
            .collect();
        reveal.on_intersections(&self.doc, &entries, now);
    }

    pub fn image_loaded(&mut self, image: NodeId) -> bool {
        self.rebuilder.image_loaded(&mut self.doc, image)
    }

    /// Page visibility. Hidden pages pause the canvas animations.
    pub fn set_visible(&mut self, visible: bool) {
        self.frames.set_visible(visible);
    }

    /// One animation frame: pending slider frames, due timers, then the
    /// canvas animations. Returns how many animations drew.
    ///
    /// A relayout that lands in this frame keeps `transition: none` until the
    /// next frame lifts it.
    pub fn tick(&mut self, now: Millis, surface: &mut dyn Surface) -> usize {
        for slider in &mut self.sliders {
            slider.handle(&mut self.doc, SliderEvent::AnimationFrame, now);
            slider.tick(&mut self.doc, &self.probe, now);
        }
        if let Some(reveal) = &mut self.reveal {
            reveal.tick(&mut self.doc, now);
        }
        self.frames.tick(surface)
    }

    /// Earliest pending slider relayout or reveal activation.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.sliders
            .iter()
            .filter_map(SliderBinding::next_deadline)
            .chain(self.reveal.as_ref().and_then(RevealAnimator::next_deadline))
            .min()
    }

    /// Undoes every initializer and hands the document back.
    pub fn teardown(mut self) -> Document {
        for handle in &self.loops {
            handle.stop();
        }
        for slider in self.sliders.drain(..) {
            slider.detach(&mut self.doc);
        }
        if let Some(reveal) = &mut self.reveal {
            reveal.disconnect();
        }
        if let Some(nav) = self.nav {
            nav.close(&mut self.doc);
        }
        self.rebuilder.detach(&mut self.doc);
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::StaticLayout;
    use crate::rebuild::{ColdCache, Section};
    use crate::render::DrawList;
    use crate::reveal::ACTIVE_CLASS;
    use crate::viewport::Variant;

    fn page(width: f32) -> Page<StaticLayout> {
        let content = SiteContent::default();
        let doc = skeleton(&content);
        let mut layout = StaticLayout::new();
        let wrap = doc.query_selector(".slider-track-wrap").unwrap();
        let track = doc.query_selector(".slider-track").unwrap();
        layout.set_width(wrap, 692.0);
        layout.set_gap(track, 16.0);
        for item in doc.query_selector_all(".slide-item") {
            layout.set_width(item, 220.0);
        }
        Page::load(
            doc,
            layout,
            SiteConfig::default(),
            content,
            Viewport::new(width, 800.0),
            &ColdCache,
            0,
        )
    }

    #[test]
    fn load_runs_every_initializer() {
        let page = page(1_200.0);
        assert_eq!(page.sliders().len(), 1);
        assert!(page.reveal().is_some());
        assert!(page.nav().is_some());
        assert_eq!(page.frames().len(), 2);
        assert_eq!(page.rebuilder().variant(Section::Processes), Variant::Desktop);
    }

    #[test]
    fn missing_sections_do_not_break_the_rest() {
        let mut doc = Document::new();
        let host = doc.create_element("div", &["processes"], None);
        doc.append(doc.root(), host);
        let page = Page::load(
            doc,
            StaticLayout::new(),
            SiteConfig::default(),
            SiteContent::default(),
            Viewport::new(500.0, 800.0),
            &ColdCache,
            0,
        );
        assert!(page.sliders().is_empty());
        assert!(page.reveal().is_none());
        assert!(page.nav().is_none());
        assert_eq!(page.rebuilder().variant(Section::Processes), Variant::Mobile);
        assert_eq!(page.rebuilder().variant(Section::Navbar), Variant::None);
    }

    #[test]
    fn slider_buttons_route_through_clicks() {
        let mut page = page(1_200.0);
        let next = page.document().query_selector(".slider-btn.next").unwrap();
        let track = page.sliders()[0].parts().track;

        page.click(next, 10);
        assert_eq!(page.sliders()[0].index(), 2);
        assert_eq!(
            page.document().style(track, "transform"),
            Some("translate3d(-472px, 0, 0)")
        );
    }

    #[test]
    fn arrow_keys_reach_the_focused_slider() {
        let mut page = page(1_200.0);
        let wrap = page.sliders()[0].parts().wrap;
        assert!(page.key(wrap, "ArrowRight", 5));
        assert_eq!(page.sliders()[0].index(), 2);
        assert!(!page.key(wrap, "Enter", 6));
        let outside = page.document().query_selector(".faq").unwrap();
        assert!(!page.key(outside, "ArrowLeft", 7));
    }

    #[test]
    fn anchor_clicks_resolve_a_scroll_and_close_the_menu() {
        let mut page = page(1_200.0);
        let doc = page.document();
        let toggle = doc.get_element_by_id("nav-toggle").unwrap();
        let faq = doc.get_element_by_id("faq").unwrap();
        let navbar = doc.query_selector(".navbar").unwrap();
        let faq_link = doc.query_selector(r##"#nav-links a[href="#faq"]"##).unwrap();
        page.probe_mut().set_rect(faq, Rect::new(0.0, 900.0, 1_200.0, 400.0));
        page.probe_mut().set_rect(navbar, Rect::new(0.0, 0.0, 1_200.0, 70.0));
        page.scrolled(250.0);

        page.click(toggle, 0);
        assert!(page.nav().unwrap().is_open(page.document()));

        let request = page.click(faq_link, 1).unwrap();
        assert_eq!(request.top, 900.0 + 250.0 - 70.0);
        assert_eq!(request.hash, "#faq");
        assert!(!page.nav().unwrap().is_open(page.document()));
    }

    #[test]
    fn reveals_activate_after_their_delay() {
        let mut page = page(1_200.0);
        let cards = page.document().query_selector_all(".whoweare-item");
        for (i, card) in cards.iter().enumerate() {
            let rect = Rect::new(0.0, 100.0 + i as f32 * 50.0, 300.0, 40.0);
            page.probe_mut().set_rect(*card, rect);
        }

        page.observe_reveals(1_000);
        assert_eq!(page.next_deadline(), Some(120));

        let mut surface = DrawList::new();
        page.tick(1_000, &mut surface);
        assert!(page.document().has_class(cards[0], ACTIVE_CLASS));
        assert!(!page.document().has_class(cards[2], ACTIVE_CLASS));
        page.tick(1_300, &mut surface);
        assert!(page.document().has_class(cards[2], ACTIVE_CLASS));
    }

    #[test]
    fn tick_drives_both_animations() {
        let mut page = page(1_200.0);
        page.pointer_moved(600.0, 400.0);
        let mut surface = DrawList::new();
        assert_eq!(page.tick(16, &mut surface), 2);
        assert!(surface.circles() > 0);

        page.set_visible(false);
        assert_eq!(page.tick(32, &mut surface), 0);
    }

    #[test]
    fn resize_swaps_variants_and_debounces_sliders() {
        let mut page = page(1_200.0);
        let mut surface = DrawList::new();
        page.tick(200, &mut surface);
        assert_eq!(page.next_deadline(), None);

        let tier = page.resize(Viewport::new(500.0, 800.0), &ColdCache, 300);
        assert_eq!(tier, LayoutTier::Mobile);
        assert_eq!(page.rebuilder().variant(Section::Navbar), Variant::Mobile);
        assert_eq!(page.document().query_selector_all(".desktop-nav").len(), 0);
        assert_eq!(page.next_deadline(), Some(420));
        assert_eq!(page.frames().size(), (500.0, 800.0));
    }

    #[test]
    fn relayout_skips_the_transition_until_the_next_frame() {
        let mut page = page(1_200.0);
        let next = page.document().query_selector(".slider-btn.next").unwrap();
        let track = page.sliders()[0].parts().track;
        let wrap = page.sliders()[0].parts().wrap;
        page.click(next, 10);
        page.click(next, 20);
        assert!(page.sliders()[0].index() > 0);

        page.probe_mut().set_width(wrap, 2_000.0);
        page.resize(Viewport::new(1_200.0, 800.0), &ColdCache, 1_000);
        let mut surface = DrawList::new();
        page.tick(1_120, &mut surface);
        assert_eq!(page.sliders()[0].index(), 0);
        assert_eq!(
            page.document().style(track, "transform"),
            Some("translate3d(-0px, 0, 0)")
        );
        assert_eq!(page.document().style(track, "transition"), Some("none"));

        page.tick(1_136, &mut surface);
        assert_eq!(page.document().style(track, "transition"), None);
    }

    #[test]
    fn teardown_removes_what_load_added() {
        let page = page(1_200.0);
        let doc = page.teardown();
        assert!(doc.query_selector(".desktop-nav").is_none());
        assert!(doc.query_selector(".processes-desktop").is_none());
        let wrap = doc.query_selector(".slider-track-wrap").unwrap();
        assert_eq!(doc.attribute(wrap, "tabindex"), None);
    }
}
