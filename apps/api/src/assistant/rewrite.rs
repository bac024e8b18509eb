//! Text rewriting: summaries, STAR bullets and keyword-driven summary fixes.

use serde::{Deserialize, Serialize};

use crate::assistant::prompts::{FIX_SUMMARY_TEMPLATE, REWRITE_BULLET_TEMPLATE, REWRITE_SUMMARY_TEMPLATE};
use crate::errors::AppError;
use crate::llm_client::prompts::PLAIN_TEXT_SYSTEM;
use crate::llm_client::{ContentPart, LlmClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteMode {
    Summary,
    Bullet,
    /// Weave the keywords given as context into the summary.
    FixSummary,
}

pub fn build_prompt(text: &str, mode: RewriteMode, context: Option<&str>) -> Result<String, AppError> {
    let prompt = match mode {
        RewriteMode::Summary => REWRITE_SUMMARY_TEMPLATE.replace("{text}", text),
        RewriteMode::Bullet => REWRITE_BULLET_TEMPLATE.replace("{text}", text),
        RewriteMode::FixSummary => {
            let keywords = context
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| {
                    AppError::Validation("fix_summary requires the missing keywords as context".to_string())
                })?;
            FIX_SUMMARY_TEMPLATE
                .replace("{keywords}", keywords)
                .replace("{text}", text)
        }
    };
    Ok(prompt)
}

/// Models sometimes wrap the answer in quotes despite the instructions.
fn unquote(reply: &str) -> &str {
    let reply = reply.trim();
    for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}')] {
        if let Some(inner) = reply
            .strip_prefix(open)
            .and_then(|r| r.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    reply
}

pub async fn rewrite_text(
    text: &str,
    mode: RewriteMode,
    context: Option<&str>,
    llm: &LlmClient,
) -> Result<String, AppError> {
    if text.trim().is_empty() && mode != RewriteMode::FixSummary {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    let prompt = build_prompt(text, mode, context)?;
    let reply = llm
        .call_text(&[ContentPart::text(prompt)], PLAIN_TEXT_SYSTEM)
        .await?;
    let cleaned = unquote(&reply);
    if cleaned.is_empty() {
        return Err(AppError::MalformedResponse("Rewrite came back empty".to_string()));
    }
    Ok(cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_summary_requires_context() {
        assert!(matches!(
            build_prompt("Engineer.", RewriteMode::FixSummary, None),
            Err(AppError::Validation(_))
        ));
        assert!(build_prompt("Engineer.", RewriteMode::FixSummary, Some("  ")).is_err());

        let prompt = build_prompt("Engineer.", RewriteMode::FixSummary, Some("Kubernetes, Go")).unwrap();
        assert!(prompt.contains("Kubernetes, Go"));
        assert!(prompt.contains("\"Engineer.\""));
    }

    #[test]
    fn test_bullet_prompt_mentions_star() {
        let prompt = build_prompt("Fixed bugs", RewriteMode::Bullet, None).unwrap();
        assert!(prompt.contains("STAR"));
        assert!(prompt.contains("Fixed bugs"));
    }

    #[test]
    fn test_mode_wire_names() {
        let mode: RewriteMode = serde_json::from_str("\"fix_summary\"").unwrap();
        assert_eq!(mode, RewriteMode::FixSummary);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("  \"Led a team.\" "), "Led a team.");
        assert_eq!(unquote("\u{201c}Shipped v2\u{201d}"), "Shipped v2");
        assert_eq!(unquote("No quotes"), "No quotes");
    }
}
