//! Upload form and JSON API. Both accept a multipart body with `job` and
//! `resume` file fields.

use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    response::Html,
    Json,
};
use bytes::Bytes;
use tracing::{info, warn};

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;
use crate::ingestion::DocumentFormat;
use crate::report::{format_summary, to_pretty_json};
use crate::routes::page;
use crate::state::AppState;

struct Upload {
    file_name: String,
    data: Bytes,
}

/// GET /
pub async fn handle_form() -> Html<String> {
    Html(page::render(None, None))
}

/// POST /
///
/// Renders the results page, or the form again with the error inline.
pub async fn handle_form_submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Html<String> {
    let rendered = run_upload(&state, multipart).await.and_then(|result| {
        let json = to_pretty_json(&result)?;
        let summary = format_summary(&result);
        Ok(page::render(None, Some((&result, &summary, &json))))
    });

    match rendered {
        Ok(html) => Html(html),
        Err(e) => {
            warn!("Form submission failed: {e}");
            Html(page::render(Some(&e.user_message()), None))
        }
    }
}

/// POST /api/v1/analyze
pub async fn handle_api_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    Ok(Json(run_upload(&state, multipart).await?))
}

async fn run_upload(state: &AppState, multipart: Multipart) -> Result<AnalysisResult, AppError> {
    let (job, resume) = receive_uploads(multipart).await?;

    let job_format = accepted_format(job.as_ref(), "job description")?;
    let resume_format = accepted_format(resume.as_ref(), "resume")?;

    // Both present and accepted by the checks above.
    let (Some(job), Some(resume)) = (job, resume) else {
        return Err(AppError::Validation("Missing upload".to_string()));
    };

    // Names collide across requests by design, but within one request the
    // résumé would overwrite the job description and be compared to itself.
    let job_name = secure_filename(&job.file_name, job_format);
    let resume_name = secure_filename(&resume.file_name, resume_format);
    if job_name == resume_name {
        return Err(AppError::Validation(
            "The job description and resume files must have different names.".to_string(),
        ));
    }

    let job_path = store(&job, &job_name, &state.uploads_dir).await?;
    let resume_path = store(&resume, &resume_name, &state.uploads_dir).await?;

    state.analyzer.analyze_files(job_path, resume_path).await
}

async fn receive_uploads(
    mut multipart: Multipart,
) -> Result<(Option<Upload>, Option<Upload>), AppError> {
    let mut job = None;
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e.body_text())))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name != "job" && name != "resume" {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e.body_text())))?;

        let upload = Upload { file_name, data };
        if name == "job" {
            job = Some(upload);
        } else {
            resume = Some(upload);
        }
    }

    Ok((job, resume))
}

/// Rejects a missing upload or one whose extension is not pdf, docx or txt.
fn accepted_format(upload: Option<&Upload>, what: &str) -> Result<DocumentFormat, AppError> {
    upload
        .filter(|u| !u.file_name.is_empty())
        .and_then(|u| DocumentFormat::from_path(Path::new(&u.file_name)))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Please upload a valid {what} file (PDF, DOCX, or TXT)."
            ))
        })
}

async fn store(upload: &Upload, name: &str, dir: &Path) -> Result<PathBuf, AppError> {
    let path = dir.join(name);
    tokio::fs::write(&path, &upload.data)
        .await
        .with_context(|| format!("Cannot store upload at {}", path.display()))?;
    info!("Stored upload {} ({} bytes)", path.display(), upload.data.len());
    Ok(path)
}

/// Client filename reduced to `[A-Za-z0-9._-]` with no directory part.
/// Same name means same path; a later upload overwrites an earlier one.
pub fn secure_filename(original: &str, format: DocumentFormat) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = match base.rfind('.') {
        Some(dot) => &base[..dot],
        None => base,
    };

    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_');
    let stem = if cleaned.is_empty() { "upload" } else { cleaned };

    format!("{stem}.{}", format.label().to_ascii_lowercase())
}
