//! In-memory element tree standing in for the browser document.
//!
//! Every component in the crate mutates the page through [`Document`], so a
//! web host can mirror the operations onto the real DOM while native hosts
//! and tests inspect the tree directly.

mod layout;
mod selector;

use std::collections::BTreeMap;
use std::fmt::Write as _;

pub use layout::{LayoutProbe, Rect, StaticLayout};
pub use selector::Selector;

use selector::Compound;

/// Handle to an element inside a [`Document`]. Handles of removed elements
/// stay invalid forever; slots are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Bare text node, as created by [`Document::create_text`].
    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn matches(&self, compound: &Compound) -> bool {
        if self.is_text() {
            return false;
        }
        if let Some(tag) = &compound.tag {
            if !self.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &compound.id {
            if self.attributes.get("id") != Some(id) {
                return false;
            }
        }
        compound.classes.iter().all(|class| self.has_class(class))
            && compound
                .attrs
                .iter()
                .all(|attr| attr.matches(self.attributes.get(&attr.name).map(String::as_str)))
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document whose root is an empty `body`.
    pub fn new() -> Self {
        let body = Element {
            tag: "body".to_string(),
            ..Default::default()
        };
        Self {
            nodes: vec![Some(body)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Creates a detached element with the given classes and text content.
    pub fn create_element(&mut self, tag: &str, classes: &[&str], text: Option<&str>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Element {
            tag: tag.to_ascii_lowercase(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            text: text.filter(|t| !t.is_empty()).map(str::to_string),
            ..Default::default()
        }));
        id
    }

    /// Creates a detached text node. Unlike element text, which renders
    /// before the children, a text node keeps its position among siblings.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Element {
            tag: TEXT_TAG.to_string(),
            text: Some(text.to_string()),
            ..Default::default()
        }));
        id
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0).and_then(Option::as_ref)
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0).and_then(Option::as_mut)
    }

    pub fn exists(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    /// Whether the element is reachable from the root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    /// Moves `child` (and its subtree) to the end of `parent`'s children.
    /// Appending an ancestor into its own descendant is ignored.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.exists(parent) || !self.exists(child) || self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(element) = self.element_mut(child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.element_mut(parent) {
            element.children.push(child);
        }
        true
    }

    pub fn append_all(&mut self, parent: NodeId, children: &[NodeId]) {
        for child in children {
            self.append(parent, *child);
        }
    }

    /// Removes the element and frees its whole subtree. The root cannot be
    /// removed.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if node == self.root || !self.exists(node) {
            return false;
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(element.children);
            }
        }
        true
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.element(node).and_then(|el| el.parent);
        if let Some(parent) = parent {
            if let Some(element) = self.element_mut(parent) {
                element.children.retain(|c| *c != node);
            }
        }
        if let Some(element) = self.element_mut(node) {
            element.parent = None;
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).and_then(|el| el.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.element(node).map(Element::children).unwrap_or(&[])
    }

    /// Inclusive containment, like `Node.contains`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if !self.exists(id) {
                return false;
            }
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    /// Flips a class and reports whether it is present afterwards.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            self.has_class(node, class)
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|el| el.attribute(name))
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(node) {
            element.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.element_mut(node) {
            element.attributes.remove(name);
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node).and_then(|el| el.style(property))
    }

    /// Sets an inline style. An empty value clears the property, mirroring
    /// `element.style.prop = ''`.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(element) = self.element_mut(node) {
            if value.is_empty() {
                element.styles.remove(property);
            } else {
                element.styles.insert(property.to_string(), value);
            }
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.element(node).and_then(Element::text)
    }

    pub fn set_text(&mut self, node: NodeId, text: Option<&str>) {
        if let Some(element) = self.element_mut(node) {
            element.text = text.filter(|t| !t.is_empty()).map(str::to_string);
        }
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    /// First connected element matching `selector`, in document order.
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_within(self.root, selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.query_selector_all_within(self.root, selector)
    }

    /// First descendant of `scope` matching `selector`. Invalid selectors
    /// match nothing.
    pub fn query_selector_within(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        let selector = self.parse_or_log(selector)?;
        self.descendants(scope)
            .find(|node| self.matches_selector(*node, &selector))
    }

    pub fn query_selector_all_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(selector) = self.parse_or_log(selector) else {
            return Vec::new();
        };
        self.descendants(scope)
            .filter(|node| self.matches_selector(*node, &selector))
            .collect()
    }

    pub fn matches(&self, node: NodeId, selector: &str) -> bool {
        self.parse_or_log(selector)
            .is_some_and(|selector| self.matches_selector(node, &selector))
    }

    fn parse_or_log(&self, selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::debug!(selector, %err, "ignoring invalid selector");
                None
            }
        }
    }

    fn matches_selector(&self, node: NodeId, selector: &Selector) -> bool {
        selector
            .alternatives()
            .iter()
            .any(|compounds| self.matches_complex(node, compounds))
    }

    fn matches_complex(&self, node: NodeId, compounds: &[Compound]) -> bool {
        let Some((last, ancestors)) = compounds.split_last() else {
            return false;
        };
        if !self.element(node).is_some_and(|el| el.matches(last)) {
            return false;
        }
        let mut remaining = ancestors.iter().rev().peekable();
        let mut current = self.parent(node);
        while let Some(compound) = remaining.peek() {
            let Some(id) = current else {
                return false;
            };
            if self.element(id).is_some_and(|el| el.matches(compound)) {
                remaining.next();
            }
            current = self.parent(id);
        }
        true
    }

    /// Pre-order traversal of the strict descendants of `scope`.
    pub fn descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.children(next).iter().rev().copied());
            Some(next)
        })
    }

    /// Serialises the element and its subtree as HTML.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, 0, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, depth: usize, out: &mut String) {
        let Some(element) = self.element(node) else {
            return;
        };
        let indent = "  ".repeat(depth);
        if element.is_text() {
            let text = element.text.as_deref().unwrap_or_default();
            let _ = writeln!(out, "{indent}{}", escape(text));
            return;
        }
        let _ = write!(out, "{indent}<{}", element.tag);
        if !element.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&element.classes.join(" ")));
        }
        for (name, value) in &element.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        if !element.styles.is_empty() {
            let style = element
                .styles
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            let _ = write!(out, " style=\"{}\"", escape(&style));
        }
        out.push('>');
        if is_void(&element.tag) {
            out.push('\n');
            return;
        }
        if let Some(text) = &element.text {
            out.push_str(&escape(text));
        }
        if element.children.is_empty() {
            let _ = writeln!(out, "</{}>", element.tag);
            return;
        }
        out.push('\n');
        for child in &element.children {
            self.write_html(*child, depth + 1, out);
        }
        let _ = writeln!(out, "{indent}</{}>", element.tag);
    }
}

const TEXT_TAG: &str = "#text";

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "input" | "meta" | "link")
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let section = doc.create_element("section", &["projects"], None);
        let wrap = doc.create_element("div", &["slider-track-wrap"], None);
        let item = doc.create_element("div", &["slide-item", "first"], Some("One"));
        doc.append(doc.root(), section);
        doc.append(section, wrap);
        doc.append(wrap, item);
        (doc, section, wrap, item)
    }

    #[test]
    fn queries_by_class_compound_and_descendant() {
        let (doc, section, wrap, item) = sample();
        assert_eq!(doc.query_selector(".projects"), Some(section));
        assert_eq!(doc.query_selector(".slide-item.first"), Some(item));
        assert_eq!(doc.query_selector(".projects .slide-item"), Some(item));
        assert_eq!(doc.query_selector(".missing .slide-item"), None);
        assert_eq!(doc.query_selector_within(section, "div"), Some(wrap));
        assert_eq!(doc.query_selector_all("div").len(), 2);
    }

    #[test]
    fn removing_frees_the_subtree() {
        let (mut doc, section, wrap, item) = sample();
        assert!(doc.remove(wrap));
        assert!(!doc.exists(item));
        assert!(doc.children(section).is_empty());
        assert!(doc.query_selector(".slide-item").is_none());
        assert!(!doc.remove(doc.root()));
    }

    #[test]
    fn detached_elements_are_invisible_to_queries() {
        let mut doc = Document::new();
        let loose = doc.create_element("div", &["loose"], None);
        assert!(doc.query_selector(".loose").is_none());
        assert!(!doc.is_connected(loose));
        doc.append(doc.root(), loose);
        assert!(doc.is_connected(loose));
    }

    #[test]
    fn append_refuses_cycles() {
        let (mut doc, section, wrap, _) = sample();
        assert!(!doc.append(wrap, section));
        assert_eq!(doc.parent(wrap), Some(section));
    }

    #[test]
    fn toggle_class_reports_state() {
        let (mut doc, section, ..) = sample();
        assert!(doc.toggle_class(section, "active"));
        assert!(!doc.toggle_class(section, "active"));
    }

    #[test]
    fn attribute_prefix_queries() {
        let mut doc = Document::new();
        let a = doc.create_element("a", &[], Some("FAQ"));
        doc.set_attribute(a, "href", "#faq");
        let b = doc.create_element("a", &[], Some("Home"));
        doc.set_attribute(b, "href", "https://example.com");
        doc.append_all(doc.root(), &[a, b]);
        assert_eq!(doc.query_selector_all(r##"a[href^="#"]"##), vec![a]);
    }

    #[test]
    fn serialises_html() {
        let mut doc = Document::new();
        let img = doc.create_element("img", &["logo-img"], None);
        doc.set_attribute(img, "alt", "a \"logo\"");
        let link = doc.create_element("a", &["logo"], None);
        doc.append(link, img);
        let html = doc.to_html(link);
        assert!(html.starts_with("<a class=\"logo\">"));
        assert!(html.contains("<img class=\"logo-img\" alt=\"a &quot;logo&quot;\">"));
        assert!(html.trim_end().ends_with("</a>"));
    }
}
