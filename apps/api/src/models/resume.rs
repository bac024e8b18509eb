use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates the stable identifier carried by every list entry.
pub fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Basics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub network: String,
    pub username: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Basics {
    pub name: String,
    pub label: String,
    pub email: String,
    pub phone: String,
    pub url: String,
    /// Rich text (may contain inline markup).
    pub summary: String,
    pub location: Location,
    pub profiles: Vec<Profile>,
}

// ────────────────────────────────────────────────────────────────────────────
// List sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkEntry {
    #[serde(default = "new_entry_id")]
    pub id: String,
    /// Company name.
    pub name: String,
    pub position: String,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
    pub summary: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    #[serde(default = "new_entry_id")]
    pub id: String,
    pub institution: String,
    pub url: String,
    pub area: String,
    pub study_type: String,
    pub start_date: String,
    pub end_date: String,
    pub score: String,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillEntry {
    #[serde(default = "new_entry_id")]
    pub id: String,
    pub name: String,
    pub level: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    #[serde(default = "new_entry_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub highlights: Vec<String>,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationEntry {
    #[serde(default = "new_entry_id")]
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub url: String,
}

/// A named free-form section such as "Languages" or "Volunteering".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalSection {
    #[serde(default = "new_entry_id")]
    pub id: String,
    pub title: String,
    pub items: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Section ordering
// ────────────────────────────────────────────────────────────────────────────

/// The reorderable sections of a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    Work,
    Education,
    Skills,
    Projects,
    Certifications,
    Additional,
}

impl SectionKey {
    /// Canonical ordering, used for new documents and to fill gaps in stored orders.
    pub const ALL: [SectionKey; 6] = [
        SectionKey::Work,
        SectionKey::Education,
        SectionKey::Skills,
        SectionKey::Projects,
        SectionKey::Certifications,
        SectionKey::Additional,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Work => "work",
            SectionKey::Education => "education",
            SectionKey::Skills => "skills",
            SectionKey::Projects => "projects",
            SectionKey::Certifications => "certifications",
            SectionKey::Additional => "additional",
        }
    }

    /// Heading used by renderers and exporters.
    pub fn title(self) -> &'static str {
        match self {
            SectionKey::Work => "Experience",
            SectionKey::Education => "Education",
            SectionKey::Skills => "Skills",
            SectionKey::Projects => "Projects",
            SectionKey::Certifications => "Certifications",
            SectionKey::Additional => "Additional",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown section '{s}'"))
    }
}

/// A permutation of [`SectionKey::ALL`].
///
/// Every construction path normalises: unknown keys and duplicates are dropped,
/// missing keys are appended in canonical order. Stored orders written by older
/// builds therefore always decode into a valid permutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SectionOrder(Vec<SectionKey>);

impl SectionOrder {
    pub fn normalized<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut order: Vec<SectionKey> = Vec::with_capacity(SectionKey::ALL.len());
        for raw in keys {
            if let Ok(key) = raw.as_ref().parse::<SectionKey>() {
                if !order.contains(&key) {
                    order.push(key);
                }
            }
        }
        for key in SectionKey::ALL {
            if !order.contains(&key) {
                order.push(key);
            }
        }
        SectionOrder(order)
    }

    pub fn keys(&self) -> &[SectionKey] {
        &self.0
    }

    /// Swaps the section at `index` with its neighbour `offset` steps away.
    /// Returns `None` when either position is out of range.
    pub fn swapped(&self, index: usize, offset: isize) -> Option<SectionOrder> {
        let target = index.checked_add_signed(offset)?;
        if index >= self.0.len() || target >= self.0.len() {
            return None;
        }
        let mut keys = self.0.clone();
        keys.swap(index, target);
        Some(SectionOrder(keys))
    }
}

impl Default for SectionOrder {
    fn default() -> Self {
        SectionOrder(SectionKey::ALL.to_vec())
    }
}

impl From<Vec<String>> for SectionOrder {
    fn from(keys: Vec<String>) -> Self {
        SectionOrder::normalized(keys)
    }
}

impl From<SectionOrder> for Vec<String> {
    fn from(order: SectionOrder) -> Self {
        order.0.iter().map(|k| k.as_str().to_string()).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// One resume's full structured content. `Default` is the blank document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub basics: Basics,
    pub work: Vec<WorkEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillEntry>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub additional: Vec<AdditionalSection>,
    pub section_order: SectionOrder,
}

/// A whole-section replacement, the unit of every document mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "value", rename_all = "camelCase")]
pub enum SectionUpdate {
    Basics(Basics),
    Work(Vec<WorkEntry>),
    Education(Vec<EducationEntry>),
    Skills(Vec<SkillEntry>),
    Projects(Vec<ProjectEntry>),
    Certifications(Vec<CertificationEntry>),
    Additional(Vec<AdditionalSection>),
    SectionOrder(SectionOrder),
}

impl SectionUpdate {
    /// Builds an update from a section name (`basics`, `work`, ..., `sectionOrder`)
    /// and its JSON value.
    pub fn from_value(section: &str, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::json!({ "section": section, "value": value }))
    }

    pub fn section_name(&self) -> &'static str {
        match self {
            SectionUpdate::Basics(_) => "basics",
            SectionUpdate::Work(_) => "work",
            SectionUpdate::Education(_) => "education",
            SectionUpdate::Skills(_) => "skills",
            SectionUpdate::Projects(_) => "projects",
            SectionUpdate::Certifications(_) => "certifications",
            SectionUpdate::Additional(_) => "additional",
            SectionUpdate::SectionOrder(_) => "sectionOrder",
        }
    }

    pub fn apply_to(self, doc: &mut ResumeDocument) {
        match self {
            SectionUpdate::Basics(v) => doc.basics = v,
            SectionUpdate::Work(v) => doc.work = v,
            SectionUpdate::Education(v) => doc.education = v,
            SectionUpdate::Skills(v) => doc.skills = v,
            SectionUpdate::Projects(v) => doc.projects = v,
            SectionUpdate::Certifications(v) => doc.certifications = v,
            SectionUpdate::Additional(v) => doc.additional = v,
            SectionUpdate::SectionOrder(v) => doc.section_order = v,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Partial documents (bulk import)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialLocation {
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialBasics {
    pub name: Option<String>,
    pub label: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub summary: Option<String>,
    pub location: Option<PartialLocation>,
    pub profiles: Option<Vec<Profile>>,
}

/// A possibly incomplete document, as produced by file imports and the AI parsers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialResume {
    pub basics: Option<PartialBasics>,
    pub work: Option<Vec<WorkEntry>>,
    pub education: Option<Vec<EducationEntry>>,
    pub skills: Option<Vec<SkillEntry>>,
    pub projects: Option<Vec<ProjectEntry>>,
    pub certifications: Option<Vec<CertificationEntry>>,
    pub additional: Option<Vec<AdditionalSection>>,
    pub section_order: Option<SectionOrder>,
}

fn override_field(target: &mut String, incoming: Option<String>) {
    if let Some(value) = incoming {
        *target = value;
    }
}

impl PartialLocation {
    pub fn merge_into(self, base: &Location) -> Location {
        let mut merged = base.clone();
        override_field(&mut merged.address, self.address);
        override_field(&mut merged.city, self.city);
        override_field(&mut merged.region, self.region);
        override_field(&mut merged.postal_code, self.postal_code);
        override_field(&mut merged.country_code, self.country_code);
        merged
    }
}

impl PartialBasics {
    /// Shallow field merge: every field present in `self` overrides `base`.
    pub fn merge_into(self, base: &Basics) -> Basics {
        let mut merged = base.clone();
        override_field(&mut merged.name, self.name);
        override_field(&mut merged.label, self.label);
        override_field(&mut merged.email, self.email);
        override_field(&mut merged.phone, self.phone);
        override_field(&mut merged.url, self.url);
        override_field(&mut merged.summary, self.summary);
        if let Some(location) = self.location {
            merged.location = location.merge_into(&base.location);
        }
        if let Some(profiles) = self.profiles {
            merged.profiles = profiles;
        }
        merged
    }
}

impl PartialResume {
    pub fn is_empty(&self) -> bool {
        *self == PartialResume::default()
    }

    /// Merges onto `base`: basics field-by-field, list sections replaced wholesale
    /// when present, section order replaced only when provided.
    pub fn merge_into(self, base: &ResumeDocument) -> ResumeDocument {
        ResumeDocument {
            basics: match self.basics {
                Some(basics) => basics.merge_into(&base.basics),
                None => base.basics.clone(),
            },
            work: self.work.unwrap_or_else(|| base.work.clone()),
            education: self.education.unwrap_or_else(|| base.education.clone()),
            skills: self.skills.unwrap_or_else(|| base.skills.clone()),
            projects: self.projects.unwrap_or_else(|| base.projects.clone()),
            certifications: self
                .certifications
                .unwrap_or_else(|| base.certifications.clone()),
            additional: self.additional.unwrap_or_else(|| base.additional.clone()),
            section_order: self
                .section_order
                .unwrap_or_else(|| base.section_order.clone()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Index metadata
// ────────────────────────────────────────────────────────────────────────────

/// Lightweight index record for one user-owned document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_modified: DateTime<Utc>,
}

impl DocumentMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            last_modified: stamp_now(),
        }
    }
}

/// Current time truncated to the millisecond precision `lastModified` is
/// persisted with, so a freshly stamped meta equals its stored copy.
pub fn stamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
