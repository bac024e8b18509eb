//! Emptiness rules: which entries are substantial enough to render.
//!
//! Editors append blank entries, so a freshly added row must not show up in
//! the output until the user types something into it.

use crate::models::resume::{
    AdditionalSection, CertificationEntry, EducationEntry, ProjectEntry, SkillEntry, WorkEntry,
};

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn any_filled(values: &[String]) -> bool {
    values.iter().any(|v| filled(v))
}

/// Drops blank items, keeping order.
pub fn non_blank(values: &[String]) -> Vec<String> {
    values.iter().filter(|v| filled(v)).cloned().collect()
}

pub fn keep_work(entry: &WorkEntry) -> bool {
    filled(&entry.name) || filled(&entry.position) || filled(&entry.summary) || any_filled(&entry.highlights)
}

pub fn keep_education(entry: &EducationEntry) -> bool {
    filled(&entry.institution) || filled(&entry.study_type) || filled(&entry.area) || filled(&entry.score)
}

pub fn keep_project(entry: &ProjectEntry) -> bool {
    filled(&entry.name) || filled(&entry.description) || any_filled(&entry.highlights)
}

pub fn keep_skill(entry: &SkillEntry) -> bool {
    filled(&entry.name) || any_filled(&entry.keywords)
}

pub fn keep_certification(entry: &CertificationEntry) -> bool {
    filled(&entry.name) || filled(&entry.issuer)
}

pub fn keep_additional(section: &AdditionalSection) -> bool {
    filled(&section.title) && any_filled(&section.items)
}

/// "start – end", or whichever side is present.
pub fn date_range(start: &str, end: &str) -> Option<String> {
    match (start.trim(), end.trim()) {
        ("", "") => None,
        (start, "") => Some(start.to_string()),
        ("", end) => Some(end.to_string()),
        (start, end) => Some(format!("{start} – {end}")),
    }
}

/// `Some(value)` when the value has content.
pub fn present(value: &str) -> Option<String> {
    filled(value).then(|| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_entries_are_dropped() {
        assert!(!keep_work(&WorkEntry {
            highlights: vec!["  ".to_string()],
            ..Default::default()
        }));
        assert!(keep_work(&WorkEntry {
            summary: "Ran ops".to_string(),
            ..Default::default()
        }));
        assert!(keep_education(&EducationEntry {
            score: "3.9".to_string(),
            ..Default::default()
        }));
        assert!(!keep_project(&ProjectEntry {
            url: "https://x.dev".to_string(),
            ..Default::default()
        }));
        assert!(!keep_certification(&CertificationEntry {
            date: "2021".to_string(),
            ..Default::default()
        }));
    }

    #[test]
    fn test_additional_needs_title_and_item() {
        let mut section = AdditionalSection {
            title: "Languages".to_string(),
            ..Default::default()
        };
        assert!(!keep_additional(&section));
        section.items.push("Spanish".to_string());
        assert!(keep_additional(&section));
        section.title.clear();
        assert!(!keep_additional(&section));
    }

    #[test]
    fn test_date_range() {
        assert_eq!(date_range("2020-01", "Present").as_deref(), Some("2020-01 – Present"));
        assert_eq!(date_range("", "2019").as_deref(), Some("2019"));
        assert_eq!(date_range(" ", ""), None);
    }
}
