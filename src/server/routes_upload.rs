//! Report photo upload route.
//!
//! Accepts a multipart form carrying a report key and any number of files,
//! and hands them to the media store as one ingest batch.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use report_media_common::{Error, ReportKey};
use serde::Serialize;

use super::error::AppError;
use super::request_id::RequestId;
use super::AppContext;
use crate::media::UploadedFile;

/// Form field names accepted for the report key.
const REPORT_KEY_FIELDS: &[&str] = &["reportId", "reportKey", "report_id"];

/// Create upload routes.
pub fn upload_routes(max_upload_bytes: usize) -> Router<AppContext> {
    Router::new()
        .route("/upload", post(upload_photos))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Response body of a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub photo_paths: Vec<String>,
}

/// Store the photos of one report submission.
///
/// Fields carrying a file name are treated as photos; the report key comes
/// from `reportId` (or `reportKey` / `report_id`). Other text fields are
/// ignored.
async fn upload_photos(
    State(ctx): State<AppContext>,
    request_id: Option<Extension<RequestId>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let result = match multipart {
        Ok(multipart) => ingest_form(&ctx, multipart).await,
        Err(rejection) => Err(Error::invalid_input(format!(
            "expected a multipart/form-data body: {}",
            rejection.body_text()
        ))),
    };

    match result {
        Ok(photo_paths) => Ok(Json(UploadResponse {
            success: true,
            photo_paths,
        })),
        Err(e) => Err(AppError::for_request(e, request_id.as_ref())),
    }
}

async fn ingest_form(ctx: &AppContext, multipart: Multipart) -> Result<Vec<String>, Error> {
    let (report_key, files) = read_form(multipart).await?;
    let report_key = ReportKey::parse(report_key.as_deref().unwrap_or_default())?;
    if files.is_empty() {
        return Err(Error::invalid_input("at least one photo is required"));
    }
    ctx.media.ingest(report_key, files).await
}

/// Map a multipart form down to the report key and the uploaded files.
async fn read_form(
    mut multipart: Multipart,
) -> Result<(Option<String>, Vec<UploadedFile>), Error> {
    let mut report_key = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let data = field.bytes().await.map_err(malformed)?;
            // Browsers send an empty, unnamed part for an untouched file input.
            if file_name.is_empty() && data.is_empty() {
                continue;
            }
            files.push(UploadedFile::new(file_name, data));
        } else if REPORT_KEY_FIELDS.contains(&name.as_str()) {
            report_key = Some(field.text().await.map_err(malformed)?);
        } else {
            tracing::trace!(field = %name, "Ignoring form field");
        }
    }

    Ok((report_key, files))
}

fn malformed(e: MultipartError) -> Error {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Error::payload_too_large(e.body_text());
    }
    Error::invalid_input(format!("malformed upload: {}", e.body_text()))
}
