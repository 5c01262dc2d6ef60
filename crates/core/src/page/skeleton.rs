use crate::content::SiteContent;
use crate::dom::{Document, NodeId};

/// Team members shown in the slider that ships with the page.
const TEAM: [(&str, &str); 6] = [
    ("Tomasz", "Founder"),
    ("Ola", "Designer"),
    ("Bartek", "Frontend"),
    ("Kinga", "Backend"),
    ("Marek", "Marketing"),
    ("Ewa", "Support"),
];

const WHOWEARE: [(&str, &str); 3] = [
    ("Design", "Modern layouts tailored to your brand."),
    ("Development", "Fast, responsive websites built to last."),
    ("Support", "We stay with you after launch."),
];

const FAQ: [(&str, &str); 3] = [
    ("How long does it take?", "Usually between two and six weeks."),
    ("Do you host websites?", "We help you choose and configure hosting."),
    ("Can I edit the content later?", "Yes, we hand over everything you need."),
];

fn section(doc: &mut Document, classes: &[&str], id: Option<&str>) -> NodeId {
    let node = doc.create_element("section", classes, None);
    if let Some(id) = id {
        doc.set_attribute(node, "id", id);
    }
    doc.append(doc.root(), node);
    node
}

fn reveal(doc: &mut Document, tag: &str, classes: &[&str], text: &str, delay: u32) -> NodeId {
    let node = doc.create_element(tag, classes, Some(text));
    doc.add_class(node, "reveal");
    if delay > 0 {
        doc.set_attribute(node, "data-delay", delay.to_string());
    }
    node
}

/// Base markup the site ships before any script runs: empty section hosts
/// for the rebuilder, the collapsible navigation, a team slider and the
/// reveal-tagged blocks.
pub fn skeleton(content: &SiteContent) -> Document {
    let mut doc = Document::new();
    let root = doc.root();

    let header = doc.create_element("header", &["site-header"], None);
    let toggle = doc.create_element("button", &["nav-toggle"], None);
    doc.set_attribute(toggle, "id", "nav-toggle");
    doc.set_attribute(toggle, "aria-expanded", "false");
    doc.set_attribute(toggle, "aria-controls", "nav-links");
    let links = doc.create_element("ul", &["nav-links"], None);
    doc.set_attribute(links, "id", "nav-links");
    for link in &content.nav_links {
        let item = doc.create_element("li", &[], None);
        let anchor = doc.create_element("a", &[], Some(link.text.as_str()));
        doc.set_attribute(anchor, "href", link.href.as_str());
        doc.append(item, anchor);
        doc.append(links, item);
    }
    doc.append_all(header, &[toggle, links]);
    doc.append(root, header);

    let navbar = doc.create_element("nav", &["navbar"], None);
    doc.append(root, navbar);

    let about = section(&mut doc, &["whoweare"], Some("about-us"));
    for (i, &(title, text)) in WHOWEARE.iter().enumerate() {
        let card = reveal(&mut doc, "div", &["whoweare-item"], title, i as u32 * 150);
        let body = doc.create_element("p", &[], Some(text));
        doc.append(card, body);
        doc.append(about, card);
    }

    section(&mut doc, &["processes"], Some("services"));
    section(&mut doc, &["projects"], Some("projects"));

    let team = section(&mut doc, &["team"], Some("team"));
    let slider = doc.create_element("div", &["team-slider"], None);
    let prev = doc.create_element("button", &["slider-btn", "prev"], None);
    doc.set_attribute(prev, "aria-label", "Previous");
    let next = doc.create_element("button", &["slider-btn", "next"], None);
    doc.set_attribute(next, "aria-label", "Next");
    let wrap = doc.create_element("div", &["slider-track-wrap"], None);
    let track = doc.create_element("div", &["slider-track"], None);
    for (name, role) in TEAM {
        let item = doc.create_element("div", &["slide-item"], None);
        let heading = doc.create_element("h4", &[], Some(name));
        let caption = doc.create_element("small", &[], Some(role));
        doc.append_all(item, &[heading, caption]);
        doc.append(track, item);
    }
    doc.append(wrap, track);
    doc.append_all(slider, &[prev, wrap, next]);
    doc.append(team, slider);

    let faq = section(&mut doc, &["faq"], Some("faq"));
    for (i, &(question, answer)) in FAQ.iter().enumerate() {
        let accordion = reveal(&mut doc, "div", &["accordion"], question, i as u32 * 100);
        let body = doc.create_element("p", &[], Some(answer));
        doc.append(accordion, body);
        doc.append(faq, accordion);
    }

    let contact = section(&mut doc, &["contact"], Some("contact"));
    let mail = content
        .socials
        .iter()
        .find(|social| social.href.starts_with("mailto:"))
        .map(|social| social.href.as_str())
        .unwrap_or("#contact");
    let cta = reveal(&mut doc, "a", &["button", "primary"], "Write to us", 0);
    doc.set_attribute(cta, "href", mail);
    doc.append(contact, cta);

    doc
}
