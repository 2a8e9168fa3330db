use axum::extract::Multipart;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::resume::extract_resume_text;

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub success: bool,
    pub text: String,
}

/// POST /api/v1/resume/upload
///
/// Expects a multipart `resume` file field. Returns the extracted text, which
/// may be empty when the document could not be read.
pub async fn handle_upload_resume(
    mut multipart: Multipart,
) -> Result<Json<UploadResumeResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("resume") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.trim().is_empty() {
            return Err(AppError::Validation("No selected file".to_string()));
        }

        let data = field.bytes().await?;
        info!(file_name = %file_name, bytes = data.len(), "Resume uploaded");

        let text = extract_resume_text(data).await;
        return Ok(Json(UploadResumeResponse {
            success: true,
            text,
        }));
    }

    Err(AppError::Validation("No file part".to_string()))
}
