//! Axum route handlers for skill extraction and document parsing.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::skills::extractor::SkillExtractor;
use crate::skills::parser::{parse_document, ParsedDocument};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub skills: Vec<String>,
}

/// POST /api/v1/skills/extract
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    let skills = with_extractor(&state, move |extractor| {
        extractor.extract_skills(&request.text)
    })
    .await?;
    Ok(Json(ExtractSkillsResponse { skills }))
}

/// POST /api/v1/documents/parse
///
/// Parses already-extracted text. Empty text yields `parsed: false`, not an error.
pub async fn handle_parse_document(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ParsedDocument>, AppError> {
    let document = with_extractor(&state, move |extractor| {
        parse_document(&request.text, extractor)
    })
    .await?;
    Ok(Json(document))
}

/// POST /api/v1/documents/upload
///
/// Multipart upload with a `file` field (.pdf, .txt or .md).
pub async fn handle_upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParsedDocument>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Upload must include a file name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let text = state
            .text_extractor
            .extract(&file_name, bytes.to_vec())
            .await?;
        let document =
            with_extractor(&state, move |extractor| parse_document(&text, extractor)).await?;

        info!(
            file_name = %file_name,
            parsed = document.parsed,
            skills = document.skills.len(),
            experience_years = document.experience_years,
            "Document analyzed"
        );
        return Ok(Json(document));
    }

    Err(AppError::Validation(format!(
        "Multipart body must include a '{UPLOAD_FIELD}' field"
    )))
}

/// Runs CPU-bound extraction on the blocking pool. The fuzzy fallback scales with
/// text length, and request bodies may be several megabytes.
async fn with_extractor<T, F>(state: &AppState, task: F) -> Result<T, AppError>
where
    F: FnOnce(&SkillExtractor) -> T + Send + 'static,
    T: Send + 'static,
{
    let extractor = Arc::clone(&state.extractor);
    tokio::task::spawn_blocking(move || task(&extractor))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
        })
}
