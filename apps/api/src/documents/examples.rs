//! Built-in, read-only starter documents and the document reference type.
//!
//! Examples never enter the index and are never persisted. The first edit made
//! while one is active forks it into a real user document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::{Basics, Location, Profile, ResumeDocument, SkillEntry, WorkEntry};

/// Prefix of the persisted pseudo-id of an example (`example_frontend`).
pub const EXAMPLE_PREFIX: &str = "example_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExampleKey {
    Frontend,
    Backend,
}

impl ExampleKey {
    pub const ALL: [ExampleKey; 2] = [ExampleKey::Frontend, ExampleKey::Backend];

    pub fn short_name(self) -> &'static str {
        match self {
            ExampleKey::Frontend => "frontend",
            ExampleKey::Backend => "backend",
        }
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.short_name() == name)
    }

    /// "Frontend Example", "Backend Example".
    pub fn display_name(self) -> String {
        let short = self.short_name();
        let mut chars = short.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
        format!("{capitalized} Example")
    }

    /// A fresh copy of the example body.
    pub fn document(self) -> ResumeDocument {
        match self {
            ExampleKey::Frontend => frontend_example(),
            ExampleKey::Backend => backend_example(),
        }
    }
}

/// Identifies what the session is looking at: an indexed user document or a
/// built-in example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentRef {
    User(Uuid),
    Example(ExampleKey),
}

impl DocumentRef {
    pub fn is_example(&self) -> bool {
        matches!(self, DocumentRef::Example(_))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DocumentRefError {
    #[error("Unknown example '{0}'")]
    UnknownExample(String),

    #[error("Invalid document id '{0}'")]
    InvalidId(String),
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRef::User(id) => write!(f, "{id}"),
            DocumentRef::Example(key) => write!(f, "{EXAMPLE_PREFIX}{}", key.short_name()),
        }
    }
}

impl FromStr for DocumentRef {
    type Err = DocumentRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(short) = s.strip_prefix(EXAMPLE_PREFIX) {
            return ExampleKey::from_short_name(short)
                .map(DocumentRef::Example)
                .ok_or_else(|| DocumentRefError::UnknownExample(short.to_string()));
        }
        Uuid::parse_str(s)
            .map(DocumentRef::User)
            .map_err(|_| DocumentRefError::InvalidId(s.to_string()))
    }
}

impl Serialize for DocumentRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in document bodies
// ────────────────────────────────────────────────────────────────────────────

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn profile(network: &str, username: &str, url: &str) -> Profile {
    Profile {
        network: network.to_string(),
        username: username.to_string(),
        url: url.to_string(),
    }
}

fn skill(id: &str, name: &str, level: &str, keywords: &[&str]) -> SkillEntry {
    SkillEntry {
        id: id.to_string(),
        name: name.to_string(),
        level: level.to_string(),
        keywords: strings(keywords),
    }
}

fn job(id: &str, company: &str, position: &str, start: &str, end: &str, highlights: &[&str]) -> WorkEntry {
    WorkEntry {
        id: id.to_string(),
        name: company.to_string(),
        position: position.to_string(),
        start_date: start.to_string(),
        end_date: end.to_string(),
        highlights: strings(highlights),
        ..Default::default()
    }
}

/// Placeholder document used to seed a brand-new environment.
pub fn initial_document() -> ResumeDocument {
    ResumeDocument {
        basics: Basics {
            name: "John Doe".to_string(),
            label: "Software Engineer".to_string(),
            email: "john@example.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            url: "https://johndoe.com".to_string(),
            summary: "Experienced software engineer with a focus on scalable web applications and clean code architecture.".to_string(),
            location: Location {
                city: "San Francisco".to_string(),
                region: "CA".to_string(),
                country_code: "US".to_string(),
                ..Default::default()
            },
            profiles: vec![
                profile("GitHub", "johndoe", "https://github.com/johndoe"),
                profile("LinkedIn", "johndoe", "https://linkedin.com/in/johndoe"),
            ],
        },
        ..Default::default()
    }
}

fn frontend_example() -> ResumeDocument {
    let mut doc = initial_document();
    doc.basics.name = "Alex Johnson".to_string();
    doc.basics.label = "Senior Frontend Engineer".to_string();
    doc.basics.summary = "Creative and detail-oriented Frontend Engineer with 6+ years of experience building responsive, accessible, and performant web applications. Expert in the React ecosystem and modern CSS architecture. Passionate about UI/UX and web performance optimization.".to_string();
    doc.basics.profiles = vec![
        profile("GitHub", "alexj", "https://github.com/alexj"),
        profile("LinkedIn", "alexj", "https://linkedin.com/in/alexj"),
        profile("Portfolio", "alex.dev", "https://alex.dev"),
    ];
    doc.skills = vec![
        skill("1", "Core", "Expert", &["JavaScript (ES6+)", "TypeScript", "HTML5", "CSS3/SCSS"]),
        skill("2", "Frameworks", "Expert", &["React", "Next.js", "Vue.js", "Tailwind CSS", "Redux"]),
        skill("3", "Tools", "Intermediate", &["Webpack", "Vite", "Jest", "Cypress", "Git", "Figma"]),
    ];
    doc.work = vec![
        job(
            "w1",
            "TechFlow Solutions",
            "Senior Frontend Engineer",
            "2021-03",
            "Present",
            &[
                "Led the migration of a legacy jQuery dashboard to <b>Next.js</b>, improving page load time by 40%.",
                "Architected a reusable component library used across 5 internal products, increasing developer velocity by 25%.",
                "Mentored 3 junior developers and introduced strict code review standards and CI/CD pipelines.",
            ],
        ),
        job(
            "w2",
            "Creative Agency",
            "Frontend Developer",
            "2018-06",
            "2021-02",
            &[
                "Developed pixel-perfect responsive websites for high-profile clients including Nike and Adidas.",
                "Implemented complex animations using <b>Framer Motion</b> and GSAP to enhance user engagement.",
                "Collaborated closely with designers to ensure technical feasibility of UI/UX concepts.",
            ],
        ),
    ];
    doc
}

fn backend_example() -> ResumeDocument {
    let mut doc = initial_document();
    doc.basics.name = "Sarah Smith".to_string();
    doc.basics.label = "Backend Engineer".to_string();
    doc.basics.summary = "Results-driven Backend Engineer specializing in building scalable microservices and distributed systems. Proficient in Go, Python, and cloud infrastructure (AWS). Strong background in database design and API security.".to_string();
    doc.basics.profiles = vec![profile("GitHub", "sarahcodes", "https://github.com/sarahcodes")];
    doc.skills = vec![
        skill("1", "Languages", "Expert", &["Go (Golang)", "Python", "Java", "SQL"]),
        skill("2", "Infrastructure", "Expert", &["AWS (Lambda, S3, EC2)", "Docker", "Kubernetes", "Terraform"]),
        skill("3", "Databases", "Intermediate", &["PostgreSQL", "Redis", "MongoDB", "Elasticsearch"]),
    ];
    doc.work = vec![
        job(
            "w1",
            "CloudStream Inc.",
            "Backend Developer",
            "2020-01",
            "Present",
            &[
                "Designed and implemented high-throughput RESTful APIs serving 1M+ daily active users.",
                "Optimized database queries in PostgreSQL, reducing average latency from 200ms to 50ms.",
                "Managed Kubernetes clusters and implemented auto-scaling policies to handle traffic spikes.",
            ],
        ),
        job(
            "w2",
            "DataCorp",
            "Software Engineer",
            "2017-05",
            "2019-12",
            &[
                "Built data ingestion pipelines using Python and Apache Kafka processing TBs of data daily.",
                "Implemented OAuth2 authentication flows to secure internal APIs.",
                "Wrote 90%+ unit test coverage for critical payment processing modules.",
            ],
        ),
    ];
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_ref_round_trips_through_string() {
        let r: DocumentRef = "example_frontend".parse().unwrap();
        assert_eq!(r, DocumentRef::Example(ExampleKey::Frontend));
        assert_eq!(r.to_string(), "example_frontend");
        assert!(r.is_example());
    }

    #[test]
    fn test_user_ref_parses_uuid() {
        let id = Uuid::new_v4();
        let r: DocumentRef = id.to_string().parse().unwrap();
        assert_eq!(r, DocumentRef::User(id));
        assert!(!r.is_example());
    }

    #[test]
    fn test_unknown_example_and_garbage_ids_are_rejected() {
        assert_eq!(
            "example_designer".parse::<DocumentRef>(),
            Err(DocumentRefError::UnknownExample("designer".to_string()))
        );
        assert!(matches!(
            "not-an-id".parse::<DocumentRef>(),
            Err(DocumentRefError::InvalidId(_))
        ));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ExampleKey::Frontend.display_name(), "Frontend Example");
        assert_eq!(ExampleKey::Backend.display_name(), "Backend Example");
    }

    #[test]
    fn test_examples_are_populated() {
        let frontend = ExampleKey::Frontend.document();
        assert_eq!(frontend.basics.name, "Alex Johnson");
        assert_eq!(frontend.work.len(), 2);
        assert_eq!(frontend.skills.len(), 3);

        let backend = ExampleKey::Backend.document();
        assert_eq!(backend.basics.name, "Sarah Smith");
        assert_eq!(backend.basics.profiles.len(), 1);
    }
}
