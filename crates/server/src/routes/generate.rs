//! Newsletter generation handlers.

use std::io::Write;
use std::path::Path;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use newsletter_core::{Audience, ComposeOptions, Newsletter, Source, SourceKind};
use serde::Deserialize;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

const INVALID_FILE_TYPE: &str = "Invalid file type. Only PDF and DOCX files are allowed";

#[derive(Debug, Default, Deserialize)]
pub struct GenerateFromUrlRequest {
    pub url: Option<String>,
    pub model: Option<String>,
    pub audience: Option<String>,
    pub api_token: Option<String>,
}

pub async fn generate_from_url(
    State(state): State<AppState>,
    payload: Result<Json<GenerateFromUrlRequest>, JsonRejection>,
) -> Result<Json<Newsletter>, ApiError> {
    let Json(req) = payload?;
    let url = req
        .url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;

    let audience = req.audience.as_deref().map(str::trim).filter(|value| !value.is_empty());
    let options = ComposeOptions {
        model_id: req.model,
        audience: audience.map(parse_audience).transpose()?,
        api_token: req.api_token,
    };
    let span = info_span!("generate", request_id = %Uuid::new_v4(), source = "url");

    let newsletter = state
        .pipeline
        .run(&Source::Url(url), &options)
        .instrument(span)
        .await
        .map_err(|e| ApiError::from_pipeline(e, "URL"))?;

    Ok(Json(newsletter))
}

/// A document received in a multipart form.
struct Upload {
    filename: String,
    data: Vec<u8>,
}

fn parse_audience(value: &str) -> Result<Audience, ApiError> {
    value.parse().map_err(ApiError::bad_request)
}

/// Write `upload` to a uniquely named file in `dir`.
///
/// The file is removed when the returned handle is dropped.
fn stage_upload(dir: &Path, kind: SourceKind, upload: &Upload) -> Result<tempfile::NamedTempFile, ApiError> {
    let suffix = match kind {
        SourceKind::Pdf => ".pdf",
        SourceKind::Docx => ".docx",
        SourceKind::Url => return Err(ApiError::bad_request(INVALID_FILE_TYPE)),
    };

    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::Builder::new().prefix("upload-").suffix(suffix).tempfile_in(dir)?;
    file.write_all(&upload.data)?;
    file.flush()?;
    Ok(file)
}

pub async fn generate_from_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Newsletter>, ApiError> {
    let mut upload = None;
    let mut options = ComposeOptions::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?.to_vec();
                upload = Some(Upload { filename, data });
            }
            Some("model") => options.model_id = Some(field.text().await?),
            Some("audience") => {
                let value = field.text().await?;
                if !value.trim().is_empty() {
                    options.audience = Some(parse_audience(&value)?);
                }
            }
            Some("api_token") => options.api_token = Some(field.text().await?),
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    if upload.filename.is_empty() {
        return Err(ApiError::bad_request("No file selected"));
    }
    let kind = SourceKind::from_path(Path::new(&upload.filename))
        .map_err(|_| ApiError::bad_request(INVALID_FILE_TYPE))?;

    let span = info_span!(
        "generate",
        request_id = %Uuid::new_v4(),
        source = "file",
        filename = %upload.filename
    );
    let staged = stage_upload(&state.upload_dir, kind, &upload)?;
    info!(parent: &span, path = %staged.path().display(), bytes = upload.data.len(), "upload staged");

    let result = state
        .pipeline
        .run(&Source::File(staged.path().to_path_buf()), &options)
        .instrument(span)
        .await;

    if let Err(e) = staged.close() {
        warn!(error = %e, "could not remove staged upload");
    }

    result.map(Json).map_err(|e| ApiError::from_pipeline(e, "file"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_upload_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let upload = Upload { filename: "brief.docx".into(), data: b"bytes".to_vec() };

        let staged = stage_upload(dir.path(), SourceKind::Docx, &upload).unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.extension().unwrap(), "docx");

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_parse_audience() {
        assert_eq!(parse_audience("technical").unwrap(), Audience::Technical);
        assert_eq!(parse_audience("legal").unwrap_err().status, axum::http::StatusCode::BAD_REQUEST);
    }
}
