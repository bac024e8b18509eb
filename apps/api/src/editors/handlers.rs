//! Axum route handlers for entry-level editing of the active resume.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::documents::handlers::ActiveResumeResponse;
use crate::editors::{
    add_profile, edit_list, move_section, patch_basics, remove_profile, set_project_highlights,
    set_work_highlights, Direction, ListOp,
};
use crate::errors::AppError;
use crate::models::resume::{PartialBasics, SectionKey, SectionUpdate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct HighlightsRequest {
    pub markup: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveSectionRequest {
    pub index: usize,
    pub direction: Direction,
}

fn parse_section(raw: &str) -> Result<SectionKey, AppError> {
    raw.parse::<SectionKey>()
        .map_err(|_| AppError::Validation(format!("Unknown section '{raw}'")))
}

/// Computes an update against the current document and commits it, all under one lock.
async fn apply<F>(state: &AppState, build: F) -> Result<Json<ActiveResumeResponse>, AppError>
where
    F: FnOnce(&crate::models::resume::ResumeDocument) -> Result<SectionUpdate, AppError>,
{
    let mut session = state.session.lock().await;
    let update = build(session.document())?;
    session.mutate_section(update).await?;
    Ok(Json(ActiveResumeResponse::from_session(&session)))
}

/// POST /api/v1/resume/sections/:section/entries
pub async fn handle_append_entry(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let section = parse_section(&section)?;
    apply(&state, |doc| Ok(edit_list(doc, section, ListOp::Append)?)).await
}

/// PATCH /api/v1/resume/sections/:section/entries/:index
///
/// Body is a JSON object of camelCase field overrides for the entry.
pub async fn handle_patch_entry(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
    Json(patch): Json<Value>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let section = parse_section(&section)?;
    apply(&state, |doc| Ok(edit_list(doc, section, ListOp::Patch(index, patch))?)).await
}

/// DELETE /api/v1/resume/sections/:section/entries/:index
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let section = parse_section(&section)?;
    apply(&state, |doc| Ok(edit_list(doc, section, ListOp::Remove(index))?)).await
}

/// POST /api/v1/resume/sections/:section/entries/:index/move
pub async fn handle_move_entry(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let section = parse_section(&section)?;
    apply(&state, |doc| {
        Ok(edit_list(doc, section, ListOp::Move(index, request.direction))?)
    })
    .await
}

/// PUT /api/v1/resume/sections/:section/entries/:index/highlights
///
/// Only `work` and `projects` entries carry highlights.
pub async fn handle_set_highlights(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
    Json(request): Json<HighlightsRequest>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let section = parse_section(&section)?;
    apply(&state, |doc| match section {
        SectionKey::Work => Ok(set_work_highlights(doc, index, &request.markup)?),
        SectionKey::Projects => Ok(set_project_highlights(doc, index, &request.markup)?),
        other => Err(AppError::Validation(format!(
            "Section '{other}' has no highlights"
        ))),
    })
    .await
}

/// PATCH /api/v1/resume/basics
pub async fn handle_patch_basics(
    State(state): State<AppState>,
    Json(patch): Json<PartialBasics>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    apply(&state, |doc| Ok(patch_basics(&doc.basics, patch))).await
}

/// POST /api/v1/resume/basics/profiles
pub async fn handle_add_profile(State(state): State<AppState>) -> Result<Json<ActiveResumeResponse>, AppError> {
    apply(&state, |doc| Ok(add_profile(&doc.basics))).await
}

/// DELETE /api/v1/resume/basics/profiles/:index
pub async fn handle_remove_profile(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    apply(&state, |doc| Ok(remove_profile(&doc.basics, index)?)).await
}

/// POST /api/v1/resume/section-order/move
pub async fn handle_move_section(
    State(state): State<AppState>,
    Json(request): Json<MoveSectionRequest>,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    apply(&state, |doc| Ok(move_section(doc, request.index, request.direction))).await
}
