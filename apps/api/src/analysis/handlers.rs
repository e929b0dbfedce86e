use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::analysis::pipeline::analyze_resume;
use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ResumeSummary};
use crate::state::AppState;

/// POST /api/resumes/upload
///
/// Accepts a multipart body with a single `resume` file field, runs the full
/// analysis pipeline under the configured invocation budget, and returns the
/// persisted record. Elapsing the budget drops the pipeline future, which
/// aborts the in-flight model call and releases the spooled upload.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeRecord>, AppError> {
    let (bytes, file_name) = read_resume_field(multipart, &state.config.accepted_mime).await?;
    info!("Received upload '{file_name}' ({} bytes)", bytes.len());

    let budget = std::time::Duration::from_secs(state.config.analysis_timeout_secs);
    let record = tokio::time::timeout(
        budget,
        analyze_resume(
            state.store.as_ref(),
            state.model.as_ref(),
            bytes,
            &file_name,
        ),
    )
    .await
    .map_err(|_| {
        AppError::AiService(format!(
            "analysis timed out after {}s",
            state.config.analysis_timeout_secs
        ))
    })??;

    Ok(Json(record))
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let summaries = state.store.list().await?;
    Ok(Json(summaries))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ResumeRecord>, AppError> {
    let record = state.store.get_by_id(id).await?;
    Ok(Json(record))
}

/// Pulls the `resume` file field out of the multipart body, enforcing the
/// accepted mime type. Size is bounded by the router's `DefaultBodyLimit`.
async fn read_resume_field(
    mut multipart: Multipart,
    accepted_mime: &str,
) -> Result<(Bytes, String), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("resume") {
            continue;
        }

        match field.content_type() {
            Some(mime) if mime == accepted_mime => {}
            other => {
                return Err(AppError::Validation(format!(
                    "unsupported content type {:?}; only {accepted_mime} is accepted",
                    other.unwrap_or("none")
                )))
            }
        }

        let file_name = field
            .file_name()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                AppError::Validation("upload must carry a non-empty file name".to_string())
            })?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;

        return Ok((bytes, file_name));
    }

    Err(AppError::Validation(
        "missing 'resume' file field".to_string(),
    ))
}
