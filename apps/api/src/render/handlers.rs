use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::render::{catalogue, markdown::to_markdown, render, TemplateId, TemplateInfo};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Json,
    Markdown,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    #[serde(default)]
    pub format: RenderFormat,
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateInfo>> {
    Json(catalogue())
}

/// GET /api/v1/render/:template
///
/// Renders the active resume. `?format=markdown` returns `text/markdown`.
pub async fn handle_render(
    State(state): State<AppState>,
    Path(template): Path<String>,
    Query(query): Query<RenderQuery>,
) -> Result<Response, AppError> {
    let template: TemplateId = template.parse().map_err(AppError::Validation)?;
    let rendered = {
        let session = state.session.lock().await;
        render(session.document(), template)
    };

    Ok(match query.format {
        RenderFormat::Json => Json(rendered).into_response(),
        RenderFormat::Markdown => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            to_markdown(&rendered),
        )
            .into_response(),
    })
}
