use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::documents::handlers::ActiveResumeResponse;
use crate::export::{from_json, to_json, to_latex};
use crate::state::AppState;

const JSON_DISPOSITION: &str = "attachment; filename=\"resume.json\"";
const LATEX_DISPOSITION: &str = "attachment; filename=\"resume.tex\"";

fn attachment(content_type: &'static str, disposition: &'static str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// GET /api/v1/export/json
pub async fn handle_export_json(State(state): State<AppState>) -> Result<Response, AppError> {
    let json = {
        let session = state.session.lock().await;
        to_json(session.document())
    }
    .map_err(|e| AppError::Internal(e.into()))?;
    Ok(attachment("application/json", JSON_DISPOSITION, json))
}

/// GET /api/v1/export/latex
pub async fn handle_export_latex(State(state): State<AppState>) -> Response {
    let tex = {
        let session = state.session.lock().await;
        to_latex(session.document())
    };
    attachment("application/x-tex", LATEX_DISPOSITION, tex)
}

/// POST /api/v1/import/json
///
/// Body is the raw content of a previously exported (or partial) JSON file,
/// merged into the active resume.
pub async fn handle_import_file(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ActiveResumeResponse>, AppError> {
    let partial =
        from_json(&body).map_err(|e| AppError::Validation(format!("Invalid resume file: {e}")))?;
    let mut session = state.session.lock().await;
    session.import_bulk(partial).await?;
    Ok(Json(ActiveResumeResponse::from_session(&session)))
}
