//! Persona variants for A/B testing applications.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assistant::prompts::{VARIANTS_PROMPT_TEMPLATE, VARIANTS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::{ContentPart, LlmClient};
use crate::markup::strip_html;
use crate::models::resume::{ResumeDocument, SkillEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantType {
    Specialist,
    Leader,
    Generalist,
}

impl VariantType {
    pub const ALL: [VariantType; 3] = [
        VariantType::Specialist,
        VariantType::Leader,
        VariantType::Generalist,
    ];

    pub fn title(self) -> &'static str {
        match self {
            VariantType::Specialist => "Specialist",
            VariantType::Leader => "Leader",
            VariantType::Generalist => "Generalist",
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(rename = "type")]
    pub variant_type: VariantType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
}

/// Accepts exactly one variant of each type, returned in canonical order.
pub fn validate_variants(variants: Vec<Variant>) -> Result<Vec<Variant>, AppError> {
    if variants.len() != VariantType::ALL.len() {
        return Err(AppError::MalformedResponse(format!(
            "Expected 3 variants, got {}",
            variants.len()
        )));
    }
    let mut ordered = Vec::with_capacity(3);
    for wanted in VariantType::ALL {
        let variant = variants
            .iter()
            .find(|v| v.variant_type == wanted)
            .ok_or_else(|| AppError::MalformedResponse(format!("Missing {wanted} variant")))?;
        ordered.push(variant.clone());
    }
    Ok(ordered)
}

#[derive(Debug, Serialize)]
struct ExperienceDigest<'a> {
    role: &'a str,
    company: &'a str,
    desc: String,
}

#[derive(Debug, Serialize)]
struct VariantDigest<'a> {
    name: &'a str,
    summary: String,
    skills: &'a [SkillEntry],
    experience: Vec<ExperienceDigest<'a>>,
}

pub async fn generate_variants(doc: &ResumeDocument, llm: &LlmClient) -> Result<Vec<Variant>, AppError> {
    let digest = VariantDigest {
        name: &doc.basics.name,
        summary: strip_html(&doc.basics.summary),
        skills: &doc.skills,
        experience: doc
            .work
            .iter()
            .map(|w| ExperienceDigest {
                role: &w.position,
                company: &w.name,
                desc: strip_html(&w.highlights.join(" ")),
            })
            .collect(),
    };
    let resume = serde_json::to_string(&digest)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode resume digest: {e}")))?;
    let prompt = VARIANTS_PROMPT_TEMPLATE.replace("{resume}", &resume);

    let variants: Vec<Variant> = llm
        .call_json(&[ContentPart::text(prompt)], VARIANTS_SYSTEM)
        .await?;
    validate_variants(variants)
}

/// Builds the document for a chosen variant and the name it is saved under.
///
/// Label and summary are always replaced; skills only when the variant carries any.
pub fn apply_variant(doc: &ResumeDocument, variant: &Variant) -> (ResumeDocument, String) {
    let mut next = doc.clone();
    next.basics.label = variant.label.clone();
    next.basics.summary = variant.summary.clone();
    if !variant.skills.is_empty() {
        next.skills = variant.skills.clone();
    }
    let owner = match doc.basics.name.trim() {
        "" => "My",
        name => name,
    };
    let name = format!("{owner} - {}", variant.variant_type.title());
    (next, name)
}
