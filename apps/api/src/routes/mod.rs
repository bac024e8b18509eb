pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::assistant::handlers as assistant;
use crate::documents::handlers as documents;
use crate::editors::handlers as editors;
use crate::export::handlers as export;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Documents
        .route(
            "/api/v1/resumes",
            get(documents::handle_list_resumes).post(documents::handle_create_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            patch(documents::handle_rename_resume)
                .delete(documents::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/duplicate",
            post(documents::handle_duplicate_resume),
        )
        .route(
            "/api/v1/resumes/:id/activate",
            post(documents::handle_activate_resume),
        )
        // Active resume
        .route("/api/v1/resume", get(documents::handle_get_active))
        .route(
            "/api/v1/resume/sections/:section",
            put(documents::handle_put_section),
        )
        .route("/api/v1/resume/import", post(documents::handle_import))
        // Editors
        .route(
            "/api/v1/resume/basics",
            patch(editors::handle_patch_basics),
        )
        .route(
            "/api/v1/resume/basics/profiles",
            post(editors::handle_add_profile),
        )
        .route(
            "/api/v1/resume/basics/profiles/:index",
            delete(editors::handle_remove_profile),
        )
        .route(
            "/api/v1/resume/sections/:section/entries",
            post(editors::handle_append_entry),
        )
        .route(
            "/api/v1/resume/sections/:section/entries/:index",
            patch(editors::handle_patch_entry).delete(editors::handle_remove_entry),
        )
        .route(
            "/api/v1/resume/sections/:section/entries/:index/move",
            post(editors::handle_move_entry),
        )
        .route(
            "/api/v1/resume/sections/:section/entries/:index/highlights",
            put(editors::handle_set_highlights),
        )
        .route(
            "/api/v1/resume/section-order/move",
            post(editors::handle_move_section),
        )
        // Rendering & export
        .route("/api/v1/templates", get(render::handle_list_templates))
        .route("/api/v1/render/:template", get(render::handle_render))
        .route("/api/v1/export/json", get(export::handle_export_json))
        .route("/api/v1/export/latex", get(export::handle_export_latex))
        .route("/api/v1/import/json", post(export::handle_import_file))
        // Assistant
        .route(
            "/api/v1/settings/api-key",
            get(assistant::handle_get_api_key)
                .put(assistant::handle_set_api_key)
                .delete(assistant::handle_clear_api_key),
        )
        .route(
            "/api/v1/assistant/parse-text",
            post(assistant::handle_parse_text),
        )
        .route(
            "/api/v1/assistant/parse-document",
            post(assistant::handle_parse_document),
        )
        .route("/api/v1/assistant/rewrite", post(assistant::handle_rewrite))
        .route(
            "/api/v1/assistant/job-match",
            post(assistant::handle_job_match),
        )
        .route(
            "/api/v1/assistant/job-match/fix-summary",
            post(assistant::handle_fix_summary),
        )
        .route(
            "/api/v1/assistant/variants",
            post(assistant::handle_generate_variants),
        )
        .route(
            "/api/v1/assistant/variants/apply",
            post(assistant::handle_apply_variant),
        )
        .with_state(state)
}
