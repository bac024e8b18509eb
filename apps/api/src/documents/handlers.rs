//! Axum route handlers for resume documents and the active session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::documents::examples::{DocumentRef, ExampleKey};
use crate::documents::Session;
use crate::errors::AppError;
use crate::models::resume::{DocumentMeta, PartialResume, ResumeDocument, SectionUpdate};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSummary {
    pub id: DocumentRef,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeListResponse {
    pub resumes: Vec<DocumentMeta>,
    pub examples: Vec<ExampleSummary>,
    pub active_id: DocumentRef,
}

/// The active document as seen by the editor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveResumeResponse {
    pub id: DocumentRef,
    pub is_example: bool,
    pub document: ResumeDocument,
}

impl ActiveResumeResponse {
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: session.active(),
            is_example: session.is_example(),
            document: session.document().clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateResumeRequest {
    pub name: Option<String>,
    pub data: Option<ResumeDocument>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

pub(crate) fn parse_ref(raw: &str) -> Result<DocumentRef, AppError> {
    Ok(raw.parse::<DocumentRef>()?)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes
pub async fn handle_list_resumes(State(state): State<AppState>) -> Result<Json<ResumeListResponse>, AppError> {
    let session = state.session.lock().await;
    let examples = ExampleKey::ALL
        .into_iter()
        .map(|key| ExampleSummary {
            id: DocumentRef::Example(key),
            name: key.display_name(),
        })
        .collect();
    Ok(Json(ResumeListResponse {
        resumes: session.list().await?,
        examples,
        active_id: session.active(),
    }))
}

/// POST /api/v1/resumes
///
/// Creates a blank resume, or one seeded with `data`, and makes it active.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ActiveResumeResponse>), AppError> {
    let mut session = state.session.lock().await;
    match (request.data, request.name) {
        (None, None) => {
            session.create_empty().await?;
        }
        (data, name) => {
            let name = name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| crate::documents::session::NEW_DOCUMENT_NAME.to_string());
            session
                .create_with_data(data.unwrap_or_default(), &name)
                .await?;
        }
    }
    Ok((
        StatusCode::CREATED,
        Json(ActiveResumeResponse::from_session(&session)),
    ))
}

/// POST /api/v1/resumes/:id/duplicate
pub async fn handle_duplicate_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DocumentMeta>), AppError> {
    let source = parse_ref(&id)?;
    let session = state.session.lock().await;
    let meta = session.duplicate(source).await?;
    Ok((StatusCode::CREATED, Json(meta)))
}

/// POST /api/v1/resumes/:id/activate
pub async fn handle_activate_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let target = parse_ref(&id)?;
    let mut session = state.session.lock().await;
    session.switch_to(target).await?;
    Ok(Json(ActiveResumeResponse::from_session(&session)))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_rename_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<DocumentMeta>, AppError> {
    let target = parse_ref(&id)?;
    let session = state.session.lock().await;
    Ok(Json(session.rename(target, &request.name).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let target = parse_ref(&id)?;
    let mut session = state.session.lock().await;
    session.delete(target).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/resume
pub async fn handle_get_active(State(state): State<AppState>) -> Json<ActiveResumeResponse> {
    let session = state.session.lock().await;
    Json(ActiveResumeResponse::from_session(&session))
}

/// PUT /api/v1/resume/sections/:section
///
/// Replaces one section (`basics`, `work`, ..., `sectionOrder`) of the active
/// resume. Editing an example forks it first.
pub async fn handle_put_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(value): Json<Value>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let update = SectionUpdate::from_value(&section, value)
        .map_err(|e| AppError::Validation(format!("Invalid '{section}' section: {e}")))?;
    let mut session = state.session.lock().await;
    session.mutate_section(update).await?;
    Ok(Json(ActiveResumeResponse::from_session(&session)))
}

/// POST /api/v1/resume/import
///
/// Merges a (possibly partial) resume JSON into the active resume.
pub async fn handle_import(
    State(state): State<AppState>,
    Json(partial): Json<PartialResume>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let mut session = state.session.lock().await;
    session.import_bulk(partial).await?;
    Ok(Json(ActiveResumeResponse::from_session(&session)))
}
