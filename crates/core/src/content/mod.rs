//! Static content rendered by the responsive sections.
//!
//! The lists are plain data: adding or removing an entry changes the
//! rendered markup without touching any builder.

use serde::{Deserialize, Serialize};

use crate::Result;

/// One step of the "how we work" process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStep {
    pub heading: String,
    pub text: String,
    /// Short label shown on the step selector / accordion heading.
    pub button: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Slug used for the CSS class and the showcase image file names.
    pub name: String,
    pub title: String,
    pub tag: String,
    pub date: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit: Option<String>,
}

impl Project {
    pub fn image_src(&self) -> String {
        format!("./dist/img/{}.webp", self.name)
    }

    pub fn placeholder_src(&self) -> String {
        format!("./dist/img/{}-placeholder.png", self.name)
    }

    pub fn image_alt(&self) -> String {
        format!("Image of the title section on the page {}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub text: String,
    pub href: String,
    /// Desktop navbar places the link left of the logo.
    #[serde(default)]
    pub on_left: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    /// Boxicons logo suffix, rendered as `bxl-<icon>`.
    pub icon: String,
    pub href: String,
    pub label: String,
}

/// schema.org organization descriptor embedded for crawlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub description: String,
    pub url: String,
    pub logo: String,
    #[serde(rename = "sameAs")]
    pub same_as: Vec<String>,
    #[serde(rename = "contactPoint")]
    pub contact_point: ContactPoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    #[serde(rename = "contactType")]
    pub contact_type: String,
    pub email: String,
}

#[derive(Serialize)]
struct JsonLd<'a, T: Serialize> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Serialize)]
struct ContactPointLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(flatten)]
    body: &'a ContactPoint,
}

#[derive(Serialize)]
struct OrganizationLd<'a> {
    name: &'a str,
    description: &'a str,
    url: &'a str,
    logo: &'a str,
    #[serde(rename = "sameAs")]
    same_as: &'a [String],
    #[serde(rename = "contactPoint")]
    contact_point: ContactPointLd<'a>,
}

impl Organization {
    /// Renders the `application/ld+json` block.
    pub fn to_json_ld(&self) -> Result<String> {
        let body = OrganizationLd {
            name: &self.name,
            description: &self.description,
            url: &self.url,
            logo: &self.logo,
            same_as: &self.same_as,
            contact_point: ContactPointLd {
                kind: "ContactPoint",
                body: &self.contact_point,
            },
        };
        let document = JsonLd {
            context: "https://schema.org",
            kind: "Organization",
            body: &body,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

/// Everything the rebuilder renders, plus the metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContent {
    pub processes: Vec<ProcessStep>,
    pub projects: Vec<Project>,
    pub nav_links: Vec<NavLink>,
    pub socials: Vec<Social>,
    pub organization: Organization,
}

impl SiteContent {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn step(heading: &str, text: &str, button: &str) -> ProcessStep {
    ProcessStep {
        heading: heading.to_string(),
        text: text.to_string(),
        button: button.to_string(),
    }
}

fn link(text: &str, href: &str, on_left: bool) -> NavLink {
    NavLink {
        text: text.to_string(),
        href: href.to_string(),
        on_left,
    }
}

fn social(icon: &str, href: &str, label: &str) -> Social {
    Social {
        icon: icon.to_string(),
        href: href.to_string(),
        label: label.to_string(),
    }
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            processes: vec![
                step(
                    "How are the discussions progressing?",
                    "We begin by defining the service being provided. If its construction or design, we ask if there is an existing logo or business card. Then we ask about the content that should be included on the website. Based on this, we create the structure and provide a price estimate for the project. After that, we begin the design process.",
                    "Consultation",
                ),
                step(
                    "What does the project presentation look like?",
                    "After completing the website design, we present it to you for review. At that point, we welcome any feedback regarding color choices, section layout, etc. We also explain why certain elements need to have specific characteristics. Then, we implement all the requested changes.",
                    "Presentation",
                ),
                step(
                    "What is the approval stage?",
                    "This is the step where you decide whether to accept or reject our services. If you commission us to create a website, we will inform you how long it will likely take. Additionally, we will need the exact content that you want to be included on your website.",
                    "Approval",
                ),
                step(
                    "Project execution!",
                    "Leave this step to us! We will immediately start creating your modern, dream website. During this time, you can provide us with any additional information, and we will take it into account. Once the work is complete, all thats left is to upload it to the hosting server.",
                    "Execution",
                ),
            ],
            projects: vec![
                Project {
                    name: "PowerHouse".to_string(),
                    title: "PowerHouse Events".to_string(),
                    tag: "Design and construction".to_string(),
                    date: "8.05.2023".to_string(),
                    content: "PowerHouse is an event management company that lacked a strong digital presence. After partnering with us, they now have a dynamic, modern website that reflects their energy and professionalism, boosting both visibility and client engagement.".to_string(),
                    visit: Some("https://www.powerhouse.org.in/index.html".to_string()),
                },
                Project {
                    name: "Crackers".to_string(),
                    title: "PowerHouse FireWork".to_string(),
                    tag: "Design and construction".to_string(),
                    date: "26.04.2023".to_string(),
                    content: "PowerHouse Crackers, a local fireworks retailer, needed a vibrant online presence to match the energy of their brand. We delivered a festive, user-friendly website and a tailored digital marketing strategy that helped them reach more customers and boost seasonal sales.".to_string(),
                    visit: None,
                },
            ],
            nav_links: vec![
                link("Home", "#", true),
                link("About", "#about-us", true),
                link("Services", "#services", true),
                link("FAQ", "#faq", false),
                link("Contact", "#contact", false),
            ],
            socials: vec![
                social("gmail", "mailto:tbsktechnology@gmail.com", "Link to the group email."),
                social("facebook-square", "#", "Link to Facebook."),
                social("linkedin-square", "#", "Link to LinkedIn."),
            ],
            organization: Organization {
                name: "Rturox-Tech".to_string(),
                description: "Professional web development and digital solutions company".to_string(),
                url: "https://www.rturox-tech.com".to_string(),
                logo: "https://www.rturox-tech.com/assets/logo.png".to_string(),
                same_as: vec![
                    "https://www.linkedin.com/company/rturox-tech".to_string(),
                    "https://www.instagram.com/rturox.tech".to_string(),
                ],
                contact_point: ContactPoint {
                    contact_type: "Customer Service".to_string(),
                    email: "you@example.com".to_string(),
                },
            },
        }
    }
}
