//! Axum route handlers for the AI assistant and its credential settings.
//!
//! Every handler snapshots what it needs under the session lock, releases the
//! lock for the model call, then re-acquires it to apply the result. Edits made
//! while a call is outstanding may be overwritten by the result.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assistant::job_match::{fix_summary, score_against_job_description, JobMatchAnalysis};
use crate::assistant::parse::{encode_upload, parse_document, parse_free_text};
use crate::assistant::rewrite::{rewrite_text, RewriteMode};
use crate::assistant::variants::{apply_variant, generate_variants, Variant};
use crate::documents::handlers::ActiveResumeResponse;
use crate::errors::AppError;
use crate::models::resume::{PartialResume, SectionUpdate};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub text: String,
    pub mode: RewriteMode,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RewriteResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixSummaryRequest {
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct VariantsResponse {
    pub variants: Vec<Variant>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyVariantRequest {
    pub variant: Variant,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyStatus {
    /// A key is available from storage or the environment.
    pub configured: bool,
    /// The key comes from storage.
    pub stored: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetApiKeyRequest {
    pub api_key: String,
}

async fn import(state: &AppState, partial: PartialResume) -> Result<Json<ActiveResumeResponse>, AppError> {
    let mut session = state.session.lock().await;
    session.import_bulk(partial).await?;
    Ok(Json(ActiveResumeResponse::from_session(&session)))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/assistant/parse-text
///
/// Extracts resume data from pasted text and merges it into the active resume.
pub async fn handle_parse_text(
    State(state): State<AppState>,
    Json(request): Json<ParseTextRequest>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let partial = parse_free_text(&request.text, &state.llm).await?;
    info!("Parsed resume from {} chars of text", request.text.len());
    import(&state, partial).await
}

/// POST /api/v1/assistant/parse-document
///
/// Multipart form with a single `file` field holding a PDF or image.
pub async fn handle_parse_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;

        let partial = parse_document(&encode_upload(&data), &content_type, &state.llm).await?;
        info!("Parsed resume from {} upload ({} bytes)", content_type, data.len());
        return import(&state, partial).await;
    }

    Err(AppError::Validation("No file field found in request".to_string()))
}

/// POST /api/v1/assistant/rewrite
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<RewriteResponse>, AppError> {
    let text = rewrite_text(
        &request.text,
        request.mode,
        request.context.as_deref(),
        &state.llm,
    )
    .await?;
    Ok(Json(RewriteResponse { text }))
}

/// POST /api/v1/assistant/job-match
pub async fn handle_job_match(
    State(state): State<AppState>,
    Json(request): Json<JobMatchRequest>,
) -> Result<Json<JobMatchAnalysis>, AppError> {
    let snapshot = state.session.lock().await.document().clone();
    let analysis = score_against_job_description(&snapshot, &request.job_description, &state.llm).await?;
    info!("Job match score: {}", analysis.score);
    Ok(Json(analysis))
}

/// POST /api/v1/assistant/job-match/fix-summary
///
/// Rewrites the summary around the missing keywords and saves it.
pub async fn handle_fix_summary(
    State(state): State<AppState>,
    Json(request): Json<FixSummaryRequest>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let summary = state.session.lock().await.document().basics.summary.clone();
    let rewritten = fix_summary(&summary, &request.missing_keywords, &state.llm).await?;

    let mut session = state.session.lock().await;
    let mut basics = session.document().basics.clone();
    basics.summary = rewritten;
    session.mutate_section(SectionUpdate::Basics(basics)).await?;
    Ok(Json(ActiveResumeResponse::from_session(&session)))
}

/// POST /api/v1/assistant/variants
pub async fn handle_generate_variants(State(state): State<AppState>) -> Result<Json<VariantsResponse>, AppError> {
    let snapshot = state.session.lock().await.document().clone();
    let variants = generate_variants(&snapshot, &state.llm).await?;
    Ok(Json(VariantsResponse { variants }))
}

/// POST /api/v1/assistant/variants/apply
///
/// Saves the active resume with the chosen variant applied as a new document.
pub async fn handle_apply_variant(
    State(state): State<AppState>,
    Json(request): Json<ApplyVariantRequest>,
) -> Result<(StatusCode, Json<ActiveResumeResponse>), AppError> {
    let mut session = state.session.lock().await;
    let (document, name) = apply_variant(session.document(), &request.variant);
    session.create_with_data(document, &name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ActiveResumeResponse::from_session(&session)),
    ))
}

/// GET /api/v1/settings/api-key
pub async fn handle_get_api_key(State(state): State<AppState>) -> Result<Json<ApiKeyStatus>, AppError> {
    Ok(Json(ApiKeyStatus {
        configured: state.llm.has_api_key().await?,
        stored: state.llm.has_stored_api_key().await?,
    }))
}

/// PUT /api/v1/settings/api-key
pub async fn handle_set_api_key(
    State(state): State<AppState>,
    Json(request): Json<SetApiKeyRequest>,
) -> Result<StatusCode, AppError> {
    if request.api_key.trim().is_empty() {
        return Err(AppError::Validation("apiKey must not be empty".to_string()));
    }
    state.llm.store_api_key(&request.api_key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/settings/api-key
pub async fn handle_clear_api_key(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.llm.clear_api_key().await?;
    Ok(StatusCode::NO_CONTENT)
}
