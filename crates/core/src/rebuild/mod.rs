//! Responsive section rebuilder.
//!
//! Each of the navbar, processes and projects sections renders exactly one
//! variant subtree for the current layout tier. The rebuilder records which
//! variant it built per section, so repeated resizes within a tier are
//! no-ops and a tier change swaps the subtree instead of stacking a second
//! one.

mod builders;
mod lazy;

pub use lazy::{ColdCache, ImageCache, LazyImages, LOADED_CLASS};

use crate::config::Breakpoints;
use crate::content::SiteContent;
use crate::dom::{Document, NodeId};
use crate::viewport::{aos_offsets, LayoutTier, Variant};

use builders::ImageSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Navbar,
    Processes,
    Projects,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Navbar, Section::Processes, Section::Projects];

    /// Container the section's variants are appended to.
    pub fn host_selector(self) -> &'static str {
        match self {
            Section::Navbar => ".navbar",
            Section::Processes => ".processes",
            Section::Projects => ".projects",
        }
    }

    /// Root class of the subtree built for `variant`.
    pub fn variant_class(self, variant: Variant) -> Option<&'static str> {
        match (self, variant) {
            (_, Variant::None) => None,
            (Section::Navbar, Variant::Mobile) => Some("mobile-nav"),
            (Section::Navbar, Variant::Desktop) => Some("desktop-nav"),
            (Section::Processes, Variant::Mobile) => Some("processes-mobile"),
            (Section::Processes, Variant::Desktop) => Some("processes-desktop"),
            (Section::Projects, Variant::Mobile) => Some("projects-mobile-cnt"),
            (Section::Projects, Variant::Desktop) => Some("projects-desktop-cnt"),
        }
    }

    fn variant_for(self, tier: LayoutTier) -> Variant {
        match self {
            Section::Navbar => tier.navbar_variant(),
            Section::Processes | Section::Projects => tier.content_variant(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SectionSlot {
    host: NodeId,
    variant: Variant,
    root: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ResponsiveRebuilder {
    content: SiteContent,
    breakpoints: Breakpoints,
    navbar: Option<SectionSlot>,
    processes: Option<SectionSlot>,
    projects: Option<SectionSlot>,
    tier: Option<LayoutTier>,
    images: LazyImages,
}

impl ResponsiveRebuilder {
    /// Locates the section hosts. Sections missing from the page are skipped
    /// for the rebuilder's lifetime.
    pub fn attach(doc: &Document, content: SiteContent, breakpoints: Breakpoints) -> Self {
        let slot = |section: Section| {
            let host = doc.query_selector(section.host_selector());
            if host.is_none() {
                tracing::debug!(?section, "section host missing, skipping");
            }
            host.map(|host| SectionSlot {
                host,
                variant: Variant::None,
                root: None,
            })
        };
        Self {
            navbar: slot(Section::Navbar),
            processes: slot(Section::Processes),
            projects: slot(Section::Projects),
            content,
            breakpoints,
            tier: None,
            images: LazyImages::new(),
        }
    }

    pub fn tier(&self) -> Option<LayoutTier> {
        self.tier
    }

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    pub fn variant(&self, section: Section) -> Variant {
        self.slot(section).map(|s| s.variant).unwrap_or_default()
    }

    /// Root of the subtree currently rendered for `section`.
    pub fn rendered_root(&self, section: Section) -> Option<NodeId> {
        self.slot(section).and_then(|s| s.root)
    }

    pub fn images(&self) -> &LazyImages {
        &self.images
    }

    /// Re-evaluates the tier for `width` and makes every section render the
    /// matching variant. Runs on every resize, without debouncing.
    pub fn on_resize(&mut self, doc: &mut Document, width: f32, cache: &dyn ImageCache) -> LayoutTier {
        let tier = LayoutTier::classify(width, &self.breakpoints);
        if self.tier != Some(tier) {
            tracing::info!(tier = tier.as_str(), width, "layout tier changed");
            self.tier = Some(tier);
        }
        apply_aos_offsets(doc, tier);
        for section in Section::ALL {
            self.ensure(doc, section, section.variant_for(tier), cache);
        }
        self.images.prune(doc);
        tier
    }

    /// Host notification for a showcase image `load` event.
    pub fn image_loaded(&mut self, doc: &mut Document, image: NodeId) -> bool {
        self.images.image_loaded(doc, image)
    }

    /// Handles clicks on the desktop process selector: the clicked step
    /// becomes active and its text fills the content panel.
    pub fn on_click(&mut self, doc: &mut Document, target: NodeId) -> bool {
        let Some(root) = self
            .processes
            .filter(|slot| slot.variant == Variant::Desktop)
            .and_then(|slot| slot.root)
        else {
            return false;
        };
        let items = doc.query_selector_all_within(root, ".processes-list-item");
        let Some(index) = items.iter().position(|item| doc.contains(*item, target)) else {
            return false;
        };
        let Some(step) = self.content.processes.get(index) else {
            return false;
        };
        for (i, item) in items.iter().enumerate() {
            if i == index {
                doc.add_class(*item, "active");
            } else {
                doc.remove_class(*item, "active");
            }
        }
        let title = doc.query_selector_within(root, ".processes-content-title");
        let text = doc.query_selector_within(root, ".processes-content-text");
        if let (Some(title), Some(text)) = (title, text) {
            doc.set_text(title, Some(&step.heading));
            doc.set_text(text, Some(&step.text));
        }
        true
    }

    /// Removes every subtree the rebuilder created.
    pub fn detach(mut self, doc: &mut Document) {
        for section in Section::ALL {
            if let Some(slot) = self.slot_mut(section) {
                if let Some(root) = slot.root.take() {
                    doc.remove(root);
                }
                slot.variant = Variant::None;
            }
        }
    }

    fn slot(&self, section: Section) -> Option<&SectionSlot> {
        match section {
            Section::Navbar => self.navbar.as_ref(),
            Section::Processes => self.processes.as_ref(),
            Section::Projects => self.projects.as_ref(),
        }
    }

    fn slot_mut(&mut self, section: Section) -> Option<&mut SectionSlot> {
        match section {
            Section::Navbar => self.navbar.as_mut(),
            Section::Processes => self.processes.as_mut(),
            Section::Projects => self.projects.as_mut(),
        }
    }

    fn ensure(&mut self, doc: &mut Document, section: Section, want: Variant, cache: &dyn ImageCache) {
        let Some(slot) = self.slot(section).copied() else {
            return;
        };
        let intact = slot.root.is_some_and(|root| doc.parent(root) == Some(slot.host));
        if slot.variant == want && intact {
            return;
        }

        if let Some(root) = slot.root {
            doc.remove(root);
        }
        // Markup shipped with the page or left by someone else.
        let stale = [Variant::Mobile, Variant::Desktop]
            .into_iter()
            .filter_map(|variant| section.variant_class(variant))
            .map(|class| format!(".{class}"))
            .collect::<Vec<_>>()
            .join(", ");
        for node in doc.query_selector_all_within(slot.host, &stale) {
            doc.remove(node);
        }

        let root = self.build(doc, section, want, cache);
        if let Some(root) = root {
            doc.append(slot.host, root);
        }
        if let Some(slot) = self.slot_mut(section) {
            slot.root = root;
            slot.variant = want;
        }
        tracing::debug!(?section, ?want, "section rebuilt");
    }

    fn build(
        &mut self,
        doc: &mut Document,
        section: Section,
        variant: Variant,
        cache: &dyn ImageCache,
    ) -> Option<NodeId> {
        let content = &self.content;
        let mut sink = ImageSink {
            lazy: &mut self.images,
            cache,
        };
        let root = match (section, variant) {
            (_, Variant::None) => return None,
            (Section::Navbar, Variant::Mobile) => {
                builders::navbar_mobile(doc, &content.nav_links, &content.socials)
            }
            (Section::Navbar, Variant::Desktop) => {
                builders::navbar_desktop(doc, &content.nav_links, &content.socials)
            }
            (Section::Processes, Variant::Mobile) => {
                builders::processes_mobile(doc, &content.processes)
            }
            (Section::Processes, Variant::Desktop) => {
                builders::processes_desktop(doc, &content.processes)
            }
            (Section::Projects, Variant::Mobile) => {
                builders::projects_mobile(doc, &content.projects, &mut sink)
            }
            (Section::Projects, Variant::Desktop) => {
                builders::projects_desktop(doc, &content.projects, &mut sink)
            }
        };
        Some(root)
    }
}

fn apply_aos_offsets(doc: &mut Document, tier: LayoutTier) {
    let Some(offsets) = aos_offsets(tier) else {
        return;
    };
    for card in doc.query_selector_all(".whoweare-item") {
        doc.set_attribute(card, "data-aos-offset", offsets.cards.to_string());
    }
    for accordion in doc.query_selector_all(".faq .accordion") {
        doc.set_attribute(accordion, "data-aos-offset", offsets.accordions.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Document {
        let mut doc = Document::new();
        for class in ["navbar", "processes", "projects"] {
            let host = doc.create_element("section", &[class], None);
            doc.append(doc.root(), host);
        }
        doc
    }

    fn count(doc: &Document, section: Section, variant: Variant) -> usize {
        let class = section.variant_class(variant).unwrap();
        doc.query_selector_all(&format!(".{class}")).len()
    }

    #[test]
    fn builds_one_variant_per_section() {
        let mut doc = page();
        let mut rebuilder = ResponsiveRebuilder::attach(&doc, SiteContent::default(), Breakpoints::default());
        assert_eq!(rebuilder.on_resize(&mut doc, 800.0, &ColdCache), LayoutTier::Tablet);

        assert_eq!(rebuilder.variant(Section::Navbar), Variant::Desktop);
        assert_eq!(rebuilder.variant(Section::Processes), Variant::Mobile);
        assert_eq!(count(&doc, Section::Navbar, Variant::Desktop), 1);
        assert_eq!(count(&doc, Section::Navbar, Variant::Mobile), 0);
        assert_eq!(count(&doc, Section::Projects, Variant::Mobile), 1);
    }

    #[test]
    fn repeated_resizes_within_a_tier_are_noops() {
        let mut doc = page();
        let mut rebuilder = ResponsiveRebuilder::attach(&doc, SiteContent::default(), Breakpoints::default());
        rebuilder.on_resize(&mut doc, 1_200.0, &ColdCache);
        let root = rebuilder.rendered_root(Section::Projects);
        rebuilder.on_resize(&mut doc, 1_300.0, &ColdCache);
        assert_eq!(rebuilder.rendered_root(Section::Projects), root);
    }

    #[test]
    fn removes_prerendered_markup_of_other_variant() {
        let mut doc = page();
        let host = doc.query_selector(".processes").unwrap();
        let stale = doc.create_element("div", &["processes-desktop"], None);
        doc.append(host, stale);

        let mut rebuilder = ResponsiveRebuilder::attach(&doc, SiteContent::default(), Breakpoints::default());
        rebuilder.on_resize(&mut doc, 500.0, &ColdCache);
        assert!(!doc.exists(stale));
        assert_eq!(count(&doc, Section::Processes, Variant::Mobile), 1);
    }

    #[test]
    fn rebuilds_when_subtree_was_removed_externally() {
        let mut doc = page();
        let mut rebuilder = ResponsiveRebuilder::attach(&doc, SiteContent::default(), Breakpoints::default());
        rebuilder.on_resize(&mut doc, 500.0, &ColdCache);
        let root = rebuilder.rendered_root(Section::Navbar).unwrap();
        doc.remove(root);
        rebuilder.on_resize(&mut doc, 500.0, &ColdCache);
        assert_eq!(count(&doc, Section::Navbar, Variant::Mobile), 1);
    }

    #[test]
    fn missing_hosts_are_skipped() {
        let mut doc = Document::new();
        let projects = doc.create_element("section", &["projects"], None);
        doc.append(doc.root(), projects);
        let mut rebuilder = ResponsiveRebuilder::attach(&doc, SiteContent::default(), Breakpoints::default());
        rebuilder.on_resize(&mut doc, 1_200.0, &ColdCache);
        assert_eq!(rebuilder.variant(Section::Navbar), Variant::None);
        assert_eq!(rebuilder.variant(Section::Projects), Variant::Desktop);
    }

    #[test]
    fn aos_offsets_follow_tier() {
        let mut doc = page();
        let card = doc.create_element("div", &["whoweare-item"], None);
        let faq = doc.create_element("section", &["faq"], None);
        let accordion = doc.create_element("div", &["accordion"], None);
        doc.append(faq, accordion);
        doc.append_all(doc.root(), &[card, faq]);

        let mut rebuilder = ResponsiveRebuilder::attach(&doc, SiteContent::default(), Breakpoints::default());
        rebuilder.on_resize(&mut doc, 1_200.0, &ColdCache);
        assert_eq!(doc.attribute(card, "data-aos-offset"), Some("900"));
        assert_eq!(doc.attribute(accordion, "data-aos-offset"), Some("400"));
        rebuilder.on_resize(&mut doc, 800.0, &ColdCache);
        assert_eq!(doc.attribute(card, "data-aos-offset"), Some("300"));
        rebuilder.on_resize(&mut doc, 500.0, &ColdCache);
        assert_eq!(doc.attribute(card, "data-aos-offset"), Some("300"));
    }

    #[test]
    fn desktop_process_selection_swaps_content() {
        let mut doc = page();
        let mut rebuilder = ResponsiveRebuilder::attach(&doc, SiteContent::default(), Breakpoints::default());
        rebuilder.on_resize(&mut doc, 1_200.0, &ColdCache);

        let items = doc.query_selector_all(".processes-list-item");
        let label = doc.query_selector_within(items[2], "span").unwrap();
        assert!(rebuilder.on_click(&mut doc, label));
        assert!(doc.has_class(items[2], "active"));
        assert!(!doc.has_class(items[0], "active"));

        let title = doc.query_selector(".processes-content-title").unwrap();
        assert_eq!(doc.text(title), Some("What is the approval stage?"));
        let content = doc.query_selector(".processes-content").unwrap();
        let order: Vec<_> = doc
            .children(content)
            .iter()
            .map(|c| doc.element(*c).unwrap().tag().to_string())
            .collect();
        assert_eq!(order, vec!["h3", "p"]);
    }

    #[test]
    fn lazy_images_from_removed_variant_are_forgotten() {
        let mut doc = page();
        let mut rebuilder = ResponsiveRebuilder::attach(&doc, SiteContent::default(), Breakpoints::default());
        rebuilder.on_resize(&mut doc, 500.0, &ColdCache);
        assert_eq!(rebuilder.images().len(), 2);
        let image = doc.query_selector(".showcase-img").unwrap();
        rebuilder.on_resize(&mut doc, 1_200.0, &ColdCache);
        assert_eq!(rebuilder.images().len(), 2);
        assert!(!rebuilder.image_loaded(&mut doc, image));

        let desktop_image = doc.query_selector(".desktop-showcase-img").unwrap();
        assert!(rebuilder.image_loaded(&mut doc, desktop_image));
        let image_box = doc.parent(desktop_image).unwrap();
        assert!(doc.has_class(image_box, LOADED_CLASS));
    }

    #[test]
    fn detach_removes_built_subtrees() {
        let mut doc = page();
        let mut rebuilder = ResponsiveRebuilder::attach(&doc, SiteContent::default(), Breakpoints::default());
        rebuilder.on_resize(&mut doc, 500.0, &ColdCache);
        rebuilder.detach(&mut doc);
        assert!(doc.query_selector(".mobile-nav").is_none());
        assert!(doc.query_selector(".projects-mobile-cnt").is_none());
    }
}
