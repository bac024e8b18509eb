// Rendering: ResumeDocument -> presentation tree for a template.
// Pure functions, no storage access. Inline markup in summaries and bullets is
// passed through untouched; markdown output strips it.

pub mod filters;
pub mod handlers;
pub mod markdown;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::resume::{ResumeDocument, SectionKey};
use filters::{
    date_range, keep_additional, keep_certification, keep_education, keep_project, keep_skill,
    keep_work, non_blank, present,
};

// ────────────────────────────────────────────────────────────────────────────
// Templates
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    /// Single column: header, summary, then every section in order.
    Professional,
    /// Sidebar with contact, skills, education and certifications.
    Tech,
}

impl TemplateId {
    pub const ALL: [TemplateId; 2] = [TemplateId::Professional, TemplateId::Tech];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Professional => "professional",
            TemplateId::Tech => "tech",
        }
    }

    pub fn info(self) -> TemplateInfo {
        let (name, description) = match self {
            TemplateId::Professional => (
                "Classic Professional",
                "Traditional single-column layout suitable for most industries.",
            ),
            TemplateId::Tech => (
                "Modern Tech",
                "Two-column layout with a skills sidebar, tuned for engineering roles.",
            ),
        };
        TemplateInfo {
            id: self,
            name,
            description,
        }
    }

    /// Sections placed in the sidebar; empty for single-column templates.
    fn sidebar_sections(self) -> &'static [SectionKey] {
        match self {
            TemplateId::Professional => &[],
            TemplateId::Tech => &[
                SectionKey::Skills,
                SectionKey::Education,
                SectionKey::Certifications,
            ],
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown template '{s}'"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn catalogue() -> Vec<TemplateInfo> {
    TemplateId::ALL.into_iter().map(TemplateId::info).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Presentation tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedResume {
    pub template: TemplateId,
    pub header: Header,
    pub summary: Option<String>,
    pub sidebar: Vec<Block>,
    pub main: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub name: String,
    pub label: Option<String>,
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub title: String,
    pub body: BlockBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum BlockBody {
    Entries(Vec<Entry>),
    /// Short tags, e.g. skill keywords.
    Chips(Vec<String>),
    Bullets(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entry {
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

pub fn render(doc: &ResumeDocument, template: TemplateId) -> RenderedResume {
    let sidebar_keys = template.sidebar_sections();
    let mut sidebar = Vec::new();
    let mut main = Vec::new();

    for &key in doc.section_order.keys() {
        let blocks = section_blocks(doc, key, template);
        if sidebar_keys.contains(&key) {
            sidebar.extend(blocks);
        } else {
            main.extend(blocks);
        }
    }

    RenderedResume {
        template,
        header: header(doc),
        summary: present(&doc.basics.summary),
        sidebar,
        main,
    }
}

fn header(doc: &ResumeDocument) -> Header {
    let basics = &doc.basics;
    let mut contacts = Vec::new();
    let mut push = |text: Option<String>, url: Option<String>| {
        if let Some(text) = text {
            contacts.push(Contact { text, url });
        }
    };

    push(present(&basics.email), present(&basics.email).map(|e| format!("mailto:{e}")));
    push(present(&basics.phone), None);
    if let Some(city) = present(&basics.location.city) {
        let place = match present(&basics.location.region) {
            Some(region) => format!("{city}, {region}"),
            None => city,
        };
        push(Some(place), None);
    }
    push(present(&basics.url), present(&basics.url));
    for profile in &basics.profiles {
        // Profiles without a url have nothing to link to.
        let Some(url) = present(&profile.url) else {
            continue;
        };
        let handle = present(&profile.username).unwrap_or_else(|| "Link".to_string());
        let text = match present(&profile.network) {
            Some(network) => format!("{network}: {handle}"),
            None => handle,
        };
        push(Some(text), Some(url));
    }

    Header {
        name: basics.name.trim().to_string(),
        label: present(&basics.label),
        contacts,
    }
}

fn entries_block(key: SectionKey, entries: Vec<Entry>) -> Vec<Block> {
    if entries.is_empty() {
        return Vec::new();
    }
    vec![Block {
        title: key.title().to_string(),
        body: BlockBody::Entries(entries),
    }]
}

fn section_blocks(doc: &ResumeDocument, key: SectionKey, template: TemplateId) -> Vec<Block> {
    match key {
        SectionKey::Work => entries_block(
            key,
            doc.work
                .iter()
                .filter(|w| keep_work(w))
                .map(|w| Entry {
                    heading: w.name.clone(),
                    subheading: present(&w.position),
                    dates: date_range(&w.start_date, &w.end_date),
                    link: present(&w.url),
                    detail: present(&w.summary),
                    bullets: non_blank(&w.highlights),
                })
                .collect(),
        ),
        SectionKey::Education => entries_block(
            key,
            doc.education
                .iter()
                .filter(|e| keep_education(e))
                .map(|e| Entry {
                    heading: e.institution.clone(),
                    subheading: degree(&e.study_type, &e.area),
                    dates: date_range(&e.start_date, &e.end_date),
                    link: present(&e.url),
                    detail: present(&e.score).map(|s| format!("GPA: {s}")),
                    bullets: non_blank(&e.courses),
                })
                .collect(),
        ),
        SectionKey::Projects => entries_block(
            key,
            doc.projects
                .iter()
                .filter(|p| keep_project(p))
                .map(|p| Entry {
                    heading: p.name.clone(),
                    subheading: None,
                    dates: date_range(&p.start_date, &p.end_date),
                    link: present(&p.url),
                    detail: present(&p.description),
                    bullets: non_blank(&p.highlights),
                })
                .collect(),
        ),
        SectionKey::Skills => {
            let skills: Vec<_> = doc.skills.iter().filter(|s| keep_skill(s)).collect();
            if skills.is_empty() {
                return Vec::new();
            }
            let body = match template {
                TemplateId::Tech => {
                    BlockBody::Chips(skills.iter().flat_map(|s| non_blank(&s.keywords)).collect())
                }
                TemplateId::Professional => BlockBody::Entries(
                    skills
                        .iter()
                        .map(|s| Entry {
                            heading: s.name.clone(),
                            subheading: present(&s.level),
                            detail: Some(non_blank(&s.keywords).join(", ")),
                            ..Default::default()
                        })
                        .collect(),
                ),
            };
            vec![Block {
                title: key.title().to_string(),
                body,
            }]
        }
        SectionKey::Certifications => entries_block(
            key,
            doc.certifications
                .iter()
                .filter(|c| keep_certification(c))
                .map(|c| Entry {
                    heading: c.name.clone(),
                    subheading: present(&c.issuer),
                    dates: present(&c.date),
                    link: present(&c.url),
                    ..Default::default()
                })
                .collect(),
        ),
        SectionKey::Additional => doc
            .additional
            .iter()
            .filter(|a| keep_additional(a))
            .map(|a| Block {
                title: a.title.trim().to_string(),
                body: BlockBody::Bullets(non_blank(&a.items)),
            })
            .collect(),
    }
}

fn degree(study_type: &str, area: &str) -> Option<String> {
    match (present(study_type), present(area)) {
        (Some(study_type), Some(area)) => Some(format!("{study_type} in {area}")),
        (one, other) => one.or(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::examples::ExampleKey;
    use crate::models::resume::{Profile, SectionOrder, SkillEntry, WorkEntry};

    fn titles(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn test_blank_document_renders_nothing() {
        let rendered = render(&ResumeDocument::default(), TemplateId::Professional);
        assert!(rendered.main.is_empty());
        assert!(rendered.sidebar.is_empty());
        assert!(rendered.summary.is_none());
        assert!(rendered.header.contacts.is_empty());
    }

    #[test]
    fn test_sections_follow_section_order() {
        let mut doc = ExampleKey::Backend.document();
        doc.section_order = SectionOrder::normalized(["skills", "work"]);
        let rendered = render(&doc, TemplateId::Professional);
        let order = titles(&rendered.main);
        assert_eq!(order[0], "Skills");
        assert_eq!(order[1], "Experience");
    }

    #[test]
    fn test_tech_template_splits_columns() {
        let doc = ExampleKey::Frontend.document();
        let rendered = render(&doc, TemplateId::Tech);
        assert!(titles(&rendered.sidebar).contains(&"Skills"));
        assert!(!titles(&rendered.main).contains(&"Skills"));
        let skills = rendered.sidebar.iter().find(|b| b.title == "Skills").unwrap();
        assert!(matches!(skills.body, BlockBody::Chips(_)));
    }

    #[test]
    fn test_empty_entries_are_filtered() {
        let mut doc = ResumeDocument::default();
        doc.work = vec![
            WorkEntry::default(),
            WorkEntry {
                name: "Acme".to_string(),
                highlights: vec!["Shipped".to_string(), " ".to_string()],
                ..Default::default()
            },
        ];
        doc.skills.push(SkillEntry::default());
        let rendered = render(&doc, TemplateId::Professional);
        assert_eq!(titles(&rendered.main), vec!["Experience"]);
        let BlockBody::Entries(entries) = &rendered.main[0].body else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bullets, vec!["Shipped"]);
    }

    #[test]
    fn test_profiles_need_url() {
        let mut doc = ResumeDocument::default();
        doc.basics.profiles = vec![
            Profile {
                network: "GitHub".to_string(),
                username: "lin".to_string(),
                url: String::new(),
            },
            Profile {
                network: "LinkedIn".to_string(),
                username: String::new(),
                url: "https://linkedin.com/in/lin".to_string(),
            },
        ];
        let rendered = render(&doc, TemplateId::Professional);
        assert_eq!(rendered.header.contacts.len(), 1);
        assert_eq!(rendered.header.contacts[0].text, "LinkedIn: Link");
    }

    #[test]
    fn test_template_ids_parse() {
        assert_eq!("tech".parse::<TemplateId>().unwrap(), TemplateId::Tech);
        assert!("fancy".parse::<TemplateId>().is_err());
        assert_eq!(catalogue().len(), 2);
    }
}
