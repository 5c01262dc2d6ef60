//! Markup for each section variant.

use crate::content::{NavLink, ProcessStep, Project, Social};
use crate::dom::{Document, NodeId};

use super::lazy::{ImageCache, LazyImages};

const LOGO_SRC: &str = "./dist/img/logo.png";
const LOGO_ALT: &str = "A logo depicting a raccoon created from simple geometric shapes.";

/// Shared state the project builders need for lazy images.
pub(crate) struct ImageSink<'a> {
    pub(crate) lazy: &'a mut LazyImages,
    pub(crate) cache: &'a dyn ImageCache,
}

fn el(doc: &mut Document, tag: &str, classes: &[&str]) -> NodeId {
    doc.create_element(tag, classes, None)
}

fn text_el(doc: &mut Document, tag: &str, classes: &[&str], text: &str) -> NodeId {
    doc.create_element(tag, classes, Some(text))
}

pub(crate) fn processes_mobile(doc: &mut Document, steps: &[ProcessStep]) -> NodeId {
    let root = el(doc, "div", &["processes-mobile"]);
    let accordions = el(doc, "div", &["accordions"]);
    for (index, step) in steps.iter().enumerate() {
        let panel_id = format!("processes-accordion-{}", index + 1);
        let accordion = el(doc, "div", &["accordion"]);

        let heading = el(doc, "button", &["accordion-heading"]);
        doc.set_attribute(heading, "aria-controls", panel_id.as_str());
        doc.set_attribute(heading, "aria-expanded", "false");
        doc.set_attribute(
            heading,
            "aria-label",
            "Expands or collapses the content of the accordion block.",
        );
        let arrow = el(doc, "i", &["bx", "bx-down-arrow-circle"]);
        let label = doc.create_text(&step.button);
        doc.append_all(heading, &[arrow, label]);

        let content = el(doc, "div", &["accordion-content"]);
        doc.set_attribute(content, "id", panel_id);
        let label = text_el(doc, "h3", &["accordion-label"], &step.heading);
        let text = text_el(doc, "p", &["accordion-text"], &step.text);
        doc.append_all(content, &[label, text]);

        doc.append_all(accordion, &[heading, content]);
        doc.append(accordions, accordion);
    }
    doc.append(root, accordions);
    root
}

pub(crate) fn processes_desktop(doc: &mut Document, steps: &[ProcessStep]) -> NodeId {
    let root = el(doc, "div", &["processes-desktop"]);
    let container = el(doc, "div", &["processes-ctn"]);
    let list = el(doc, "div", &["processes-list"]);
    let list_box = el(doc, "div", &["processes-list-box"]);
    for (index, step) in steps.iter().enumerate() {
        let item = el(doc, "button", &["processes-list-item"]);
        if index == 0 {
            doc.add_class(item, "active");
        }
        let dot = el(doc, "div", &["dot"]);
        let label = text_el(doc, "span", &["processes-list-item-text"], &step.button);
        doc.append_all(item, &[dot, label]);
        doc.append(list_box, item);
    }
    doc.append(list, list_box);

    let content = el(doc, "div", &["processes-content"]);
    if let Some(first) = steps.first() {
        let title = text_el(doc, "h3", &["processes-content-title"], &first.heading);
        let text = text_el(doc, "p", &["processes-content-text"], &first.text);
        doc.append_all(content, &[title, text]);
    }
    doc.append_all(container, &[list, content]);
    doc.append(root, container);
    root
}

/// Description block of a project, optionally followed by its showcase.
pub(crate) fn project(
    doc: &mut Document,
    project: &Project,
    showcase: Option<&mut ImageSink<'_>>,
) -> NodeId {
    let block = el(doc, "div", &["project", project.name.as_str()]);
    let desc = el(doc, "div", &["project-desc"]);

    let heading = el(doc, "div", &["desc-heading"]);
    let title = text_el(doc, "h3", &["heading-title"], &project.title);
    let tag = text_el(doc, "small", &["heading-tag"], &project.tag);
    doc.append_all(heading, &[title, tag]);

    let content = el(doc, "div", &["desc-content"]);
    let main = text_el(doc, "p", &["content-main"], &project.content);
    let date = text_el(doc, "small", &["content-date"], &project.date);
    doc.append_all(content, &[main, date]);

    let buttons = el(doc, "div", &["desc-btns"]);
    if let Some(visit) = &project.visit {
        let anchor = text_el(doc, "a", &["button", "primary"], "Visit");
        doc.set_attribute(anchor, "href", visit.as_str());
        doc.set_attribute(anchor, "target", "_blank");
        doc.set_attribute(anchor, "rel", "noopener");
        let globe = el(doc, "i", &["bx", "bx-globe"]);
        doc.append(anchor, globe);
        doc.append(buttons, anchor);
    }
    doc.append_all(desc, &[heading, content, buttons]);
    doc.append(block, desc);

    if let Some(sink) = showcase {
        let wrapper = el(doc, "div", &["project-showcase"]);
        let image_box = el(doc, "div", &["showcase-box"]);
        doc.set_style(
            image_box,
            "background-image",
            format!("url({})", project.placeholder_src()),
        );
        let image = el(doc, "img", &["showcase-img"]);
        doc.set_attribute(image, "alt", project.image_alt());
        doc.set_attribute(image, "src", project.image_src());
        doc.set_attribute(image, "loading", "lazy");
        doc.append(image_box, image);
        sink.lazy.register(doc, image_box, image, sink.cache);
        doc.append(wrapper, image_box);
        doc.append(block, wrapper);
    }
    block
}

pub(crate) fn projects_mobile(
    doc: &mut Document,
    projects: &[Project],
    sink: &mut ImageSink<'_>,
) -> NodeId {
    let root = el(doc, "div", &["projects-mobile-cnt"]);
    for entry in projects {
        let block = project(doc, entry, Some(&mut *sink));
        doc.append(root, block);
    }
    root
}

pub(crate) fn projects_desktop(
    doc: &mut Document,
    projects: &[Project],
    sink: &mut ImageSink<'_>,
) -> NodeId {
    let root = el(doc, "div", &["projects-desktop-cnt"]);
    let descriptions = el(doc, "div", &["projects-desc", "projects-parallax"]);
    for entry in projects {
        let block = project(doc, entry, None);
        doc.append(descriptions, block);
    }

    let showcases = el(doc, "div", &["projects-showcase", "projects-parallax"]);
    for entry in projects {
        let showcase = el(doc, "div", &["desktop-showcase"]);
        let image_box = el(doc, "div", &["desktop-showcase-box"]);
        doc.set_style(
            image_box,
            "background-image",
            format!("url('{}')", entry.placeholder_src()),
        );
        let image = el(doc, "img", &["desktop-showcase-img"]);
        doc.set_attribute(image, "src", entry.image_src());
        doc.set_attribute(image, "alt", entry.image_alt());
        doc.append(image_box, image);
        sink.lazy.register(doc, image_box, image, sink.cache);
        doc.append(showcase, image_box);
        doc.append(showcases, showcase);
    }
    doc.append_all(root, &[descriptions, showcases]);
    root
}

fn nav_link(doc: &mut Document, link: &NavLink) -> NodeId {
    let item = el(doc, "li", &[]);
    let anchor = text_el(doc, "a", &["nav-list-item"], &link.text);
    doc.set_attribute(anchor, "href", link.href.as_str());
    doc.append(item, anchor);
    item
}

fn social_anchor(doc: &mut Document, social: &Social) -> NodeId {
    let anchor = el(doc, "a", &["nav-socials-item"]);
    doc.set_attribute(anchor, "rel", "noopener");
    doc.set_attribute(anchor, "href", social.href.as_str());
    doc.set_attribute(anchor, "aria-label", social.label.as_str());
    let icon_class = format!("bxl-{}", social.icon);
    let icon = el(doc, "i", &["bx", icon_class.as_str()]);
    doc.append(anchor, icon);
    anchor
}

fn logo(doc: &mut Document) -> NodeId {
    let anchor = el(doc, "a", &["logo"]);
    doc.set_attribute(anchor, "href", "#");
    let image = el(doc, "img", &["logo-img"]);
    doc.set_attribute(image, "src", LOGO_SRC);
    doc.set_attribute(image, "alt", LOGO_ALT);
    doc.append(anchor, image);
    anchor
}

pub(crate) fn navbar_mobile(doc: &mut Document, links: &[NavLink], socials: &[Social]) -> NodeId {
    let root = el(doc, "div", &["mobile-nav"]);
    let logo = logo(doc);

    let burger = el(doc, "button", &["burger-icon"]);
    for _ in 0..3 {
        let bar = el(doc, "div", &["bar"]);
        doc.append(burger, bar);
    }
    doc.set_attribute(burger, "aria-label", "Mobile navigation switch (on or off)");
    doc.set_attribute(burger, "aria-expanded", "false");
    doc.set_attribute(burger, "aria-controls", "nav-list");

    let list = el(doc, "ul", &["nav-list"]);
    doc.set_attribute(list, "id", "nav-list");
    for link in links {
        let item = nav_link(doc, link);
        doc.append(list, item);
    }
    let socials_item = el(doc, "li", &[]);
    let socials_block = el(doc, "div", &["socials", "nav-list-item"]);
    for social in socials {
        let anchor = social_anchor(doc, social);
        doc.append(socials_block, anchor);
    }
    doc.append(socials_item, socials_block);
    doc.append(list, socials_item);

    let background = el(doc, "div", &["nav-list-background"]);
    doc.append_all(root, &[logo, burger, list, background]);
    root
}

pub(crate) fn navbar_desktop(doc: &mut Document, links: &[NavLink], socials: &[Social]) -> NodeId {
    let root = el(doc, "div", &["desktop-nav"]);
    let list = el(doc, "div", &["nav-list"]);

    let left = el(doc, "ul", &["flex-left"]);
    for link in links.iter().filter(|l| l.on_left) {
        let item = nav_link(doc, link);
        doc.append(left, item);
    }
    let logo = logo(doc);

    let right = el(doc, "div", &["flex-right"]);
    let right_links = el(doc, "ul", &["right-links"]);
    for link in links.iter().filter(|l| !l.on_left) {
        let item = nav_link(doc, link);
        doc.append(right_links, item);
    }
    let socials_block = el(doc, "ul", &["socials"]);
    for social in socials {
        let item = el(doc, "li", &["nav-list-social"]);
        let anchor = social_anchor(doc, social);
        doc.append(item, anchor);
        doc.append(socials_block, item);
    }
    doc.append_all(right, &[right_links, socials_block]);
    doc.append_all(list, &[left, logo, right]);
    doc.append(root, list);
    root
}
