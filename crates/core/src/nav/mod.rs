//! Navigation glue: the burger toggle and in-page anchor scrolling.

use crate::dom::{Document, LayoutProbe, NodeId};

const ACTIVE: &str = "active";

/// Open/close state of the collapsible navigation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavToggle {
    toggle: NodeId,
    links: NodeId,
}

impl NavToggle {
    /// Wires `#nav-toggle` to `#nav-links`. Both must exist.
    pub fn attach(doc: &Document) -> Option<Self> {
        let toggle = doc.get_element_by_id("nav-toggle")?;
        let links = doc.get_element_by_id("nav-links")?;
        Some(Self { toggle, links })
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.links, ACTIVE)
    }

    /// Reacts to a document click on `target`.
    pub fn on_click(&self, doc: &mut Document, target: NodeId) {
        if doc.contains(self.toggle, target) {
            let open = doc.toggle_class(self.links, ACTIVE);
            if open {
                doc.add_class(self.toggle, ACTIVE);
            } else {
                doc.remove_class(self.toggle, ACTIVE);
            }
            doc.set_attribute(self.toggle, "aria-expanded", open.to_string());
            return;
        }
        if doc.contains(self.links, target) {
            if self.is_link(doc, target) {
                self.close(doc);
            }
            return;
        }
        self.close(doc);
    }

    pub fn close(&self, doc: &mut Document) {
        doc.remove_class(self.links, ACTIVE);
        doc.remove_class(self.toggle, ACTIVE);
        doc.set_attribute(self.toggle, "aria-expanded", "false");
    }

    fn is_link(&self, doc: &Document, target: NodeId) -> bool {
        doc.query_selector_all_within(self.links, "a")
            .into_iter()
            .any(|anchor| doc.contains(anchor, target))
    }
}

/// Where the window should scroll for an in-page anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRequest {
    pub top: f32,
    /// Fragment to push onto the history, including the `#`.
    pub hash: String,
}

pub struct SmoothScroll;

impl SmoothScroll {
    /// Anchors the site intercepts.
    pub const SELECTOR: &'static str = r##"a[href^="#"]"##;

    /// Resolves a click on an in-page anchor, leaving room for the navbar.
    /// Returns `None` for external links and for fragments without a target.
    pub fn resolve(
        doc: &Document,
        probe: &dyn LayoutProbe,
        link: NodeId,
        page_y: f32,
    ) -> Option<ScrollRequest> {
        let href = doc.attribute(link, "href")?;
        let id = href.strip_prefix('#')?;
        if id.is_empty() {
            return None;
        }
        let target = doc.get_element_by_id(id)?;
        let element_top = probe.rect(target)?.top();
        let navbar_height = doc
            .query_selector(".navbar")
            .and_then(|navbar| probe.rect(navbar))
            .map(|rect| rect.height)
            .unwrap_or(0.0);
        Some(ScrollRequest {
            top: element_top + page_y - navbar_height,
            hash: format!("#{id}"),
        })
    }

    /// Finds the intercepted anchor a click landed in, if any.
    pub fn anchor_for(doc: &Document, target: NodeId) -> Option<NodeId> {
        let mut current = Some(target);
        while let Some(node) = current {
            if doc.matches(node, Self::SELECTOR) {
                return Some(node);
            }
            current = doc.parent(node);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Rect, StaticLayout};

    fn nav() -> (Document, NavToggle, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let toggle = doc.create_element("button", &[], None);
        doc.set_attribute(toggle, "id", "nav-toggle");
        let bar = doc.create_element("span", &["bar"], None);
        doc.append(toggle, bar);
        let links = doc.create_element("ul", &[], None);
        doc.set_attribute(links, "id", "nav-links");
        let item = doc.create_element("li", &[], None);
        let anchor = doc.create_element("a", &[], Some("FAQ"));
        doc.set_attribute(anchor, "href", "#faq");
        doc.append(links, item);
        doc.append(item, anchor);
        let outside = doc.create_element("main", &[], None);
        doc.append_all(doc.root(), &[toggle, links, outside]);
        let nav = NavToggle::attach(&doc).unwrap();
        (doc, nav, bar, anchor, outside)
    }

    #[test]
    fn toggle_flips_state_and_aria() {
        let (mut doc, nav, bar, ..) = nav();
        nav.on_click(&mut doc, bar);
        assert!(nav.is_open(&doc));
        assert_eq!(doc.attribute(nav.toggle, "aria-expanded"), Some("true"));
        nav.on_click(&mut doc, bar);
        assert!(!nav.is_open(&doc));
        assert_eq!(doc.attribute(nav.toggle, "aria-expanded"), Some("false"));
    }

    #[test]
    fn link_and_outside_clicks_close() {
        let (mut doc, nav, bar, anchor, outside) = nav();
        nav.on_click(&mut doc, bar);
        nav.on_click(&mut doc, anchor);
        assert!(!nav.is_open(&doc));

        nav.on_click(&mut doc, bar);
        nav.on_click(&mut doc, outside);
        assert!(!nav.is_open(&doc));
        assert!(!doc.has_class(nav.toggle, "active"));
    }

    #[test]
    fn clicking_list_background_keeps_menu_open() {
        let (mut doc, nav, bar, ..) = nav();
        nav.on_click(&mut doc, bar);
        nav.on_click(&mut doc, nav.links);
        assert!(nav.is_open(&doc));
    }

    #[test]
    fn missing_elements_skip_wiring() {
        assert!(NavToggle::attach(&Document::new()).is_none());
    }

    #[test]
    fn smooth_scroll_offsets_by_navbar() {
        let (mut doc, _, _, anchor, _) = nav();
        let navbar = doc.create_element("header", &["navbar"], None);
        let faq = doc.create_element("section", &[], None);
        doc.set_attribute(faq, "id", "faq");
        doc.append_all(doc.root(), &[navbar, faq]);

        let mut layout = StaticLayout::new();
        layout.set_rect(navbar, Rect::new(0.0, 0.0, 1_200.0, 90.0));
        layout.set_rect(faq, Rect::new(0.0, 400.0, 1_200.0, 600.0));

        let request = SmoothScroll::resolve(&doc, &layout, anchor, 1_000.0).unwrap();
        assert_eq!(request.top, 1_310.0);
        assert_eq!(request.hash, "#faq");
        assert_eq!(SmoothScroll::anchor_for(&doc, anchor), Some(anchor));
    }

    #[test]
    fn smooth_scroll_ignores_dangling_fragments() {
        let mut doc = Document::new();
        let top = doc.create_element("a", &[], Some("Home"));
        doc.set_attribute(top, "href", "#");
        let missing = doc.create_element("a", &[], None);
        doc.set_attribute(missing, "href", "#nowhere");
        doc.append_all(doc.root(), &[top, missing]);
        let layout = StaticLayout::new();
        assert!(SmoothScroll::resolve(&doc, &layout, top, 0.0).is_none());
        assert!(SmoothScroll::resolve(&doc, &layout, missing, 0.0).is_none());
    }
}
