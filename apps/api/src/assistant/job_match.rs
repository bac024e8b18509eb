//! Job description matching: ATS-style score, missing keywords and suggestions.

use serde::{Deserialize, Serialize};

use crate::assistant::prompts::{JOB_MATCH_PROMPT_TEMPLATE, JOB_MATCH_SYSTEM};
use crate::assistant::rewrite::{rewrite_text, RewriteMode};
use crate::errors::AppError;
use crate::llm_client::{ContentPart, LlmClient};
use crate::markup::strip_html;
use crate::models::resume::ResumeDocument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchAnalysis {
    /// 0..=100
    pub score: u8,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

/// The reply as the model sends it; the score may be fractional or out of range
/// but must be present. A reply without one is malformed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    score: f64,
    #[serde(default)]
    missing_keywords: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

impl From<RawAnalysis> for JobMatchAnalysis {
    fn from(raw: RawAnalysis) -> Self {
        Self {
            score: clamp_score(raw.score),
            missing_keywords: non_blank(raw.missing_keywords),
            suggestions: non_blank(raw.suggestions),
        }
    }
}

pub fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Compact view of the resume sent with the job description.
#[derive(Debug, Serialize)]
struct ResumeDigest {
    summary: String,
    skills: Vec<String>,
    experience: String,
}

fn digest(doc: &ResumeDocument) -> ResumeDigest {
    ResumeDigest {
        summary: strip_html(&doc.basics.summary),
        skills: doc
            .skills
            .iter()
            .flat_map(|s| s.keywords.iter().cloned())
            .collect(),
        experience: doc
            .work
            .iter()
            .map(|w| {
                let highlights: Vec<String> =
                    w.highlights.iter().map(String::as_str).map(strip_html).collect();
                format!("{} at {}: {}", w.position, w.name, highlights.join(" "))
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub async fn score_against_job_description(
    doc: &ResumeDocument,
    job_description: &str,
    llm: &LlmClient,
) -> Result<JobMatchAnalysis, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation("jobDescription must not be empty".to_string()));
    }
    let resume = serde_json::to_string(&digest(doc))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode resume digest: {e}")))?;
    let prompt = JOB_MATCH_PROMPT_TEMPLATE
        .replace("{resume}", &resume)
        .replace("{job_description}", job_description);

    let raw: RawAnalysis = llm
        .call_json(&[ContentPart::text(prompt)], JOB_MATCH_SYSTEM)
        .await?;
    Ok(raw.into())
}

/// Rewrites `summary` so that it covers `missing_keywords`.
pub async fn fix_summary(
    summary: &str,
    missing_keywords: &[String],
    llm: &LlmClient,
) -> Result<String, AppError> {
    let keywords = non_blank(missing_keywords.to_vec());
    if keywords.is_empty() {
        return Err(AppError::Validation("missingKeywords must not be empty".to_string()));
    }
    rewrite_text(summary, RewriteMode::FixSummary, Some(&keywords.join(", ")), llm).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_reply;
    use crate::models::resume::{SkillEntry, WorkEntry};

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(clamp_score(-5.0), 0);
        assert_eq!(clamp_score(72.6), 73);
        assert_eq!(clamp_score(180.0), 100);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn test_reply_normalisation() {
        let raw: RawAnalysis = parse_json_reply(
            r#"{"score": 140, "missingKeywords": ["Kafka", " ", null], "suggestions": ["Add metrics"]}"#,
        )
        .unwrap();
        let analysis = JobMatchAnalysis::from(raw);
        assert_eq!(analysis.score, 100);
        assert_eq!(analysis.missing_keywords, vec!["Kafka"]);
        assert_eq!(analysis.suggestions, vec!["Add metrics"]);
    }

    #[test]
    fn test_reply_without_score_is_malformed() {
        for reply in [r#"{"error": "cannot analyze"}"#, "{}", r#"{"score": null}"#] {
            let err = parse_json_reply::<RawAnalysis>(reply).unwrap_err();
            assert!(matches!(AppError::from(err), AppError::MalformedResponse(_)));
        }
    }

    #[test]
    fn test_digest_flattens_skills_and_work() {
        let mut doc = ResumeDocument::default();
        doc.basics.summary = "<b>Backend</b> engineer".to_string();
        doc.skills.push(SkillEntry {
            keywords: vec!["Rust".to_string(), "Go".to_string()],
            ..Default::default()
        });
        doc.work.push(WorkEntry {
            name: "Acme".to_string(),
            position: "SRE".to_string(),
            highlights: vec!["Cut <i>p99</i> by 30%".to_string()],
            ..Default::default()
        });
        let d = digest(&doc);
        assert_eq!(d.summary, "Backend engineer");
        assert_eq!(d.skills, vec!["Rust", "Go"]);
        assert_eq!(d.experience, "SRE at Acme: Cut p99 by 30%");
    }
}
