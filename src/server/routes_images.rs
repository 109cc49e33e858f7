//! Stored image serving route.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};

use report_media_common::Error;

use super::error::AppError;
use super::request_id::RequestId;
use super::AppContext;

/// Stored files never change under a given name.
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Create image-related routes.
pub fn image_routes() -> Router<AppContext> {
    Router::new().route("/images/*path", get(serve_image))
}

/// Serve a stored image by its relative path.
///
/// The segments after `/api/images/` form the relative path, e.g.
/// `/api/images/Images/r42/roof.jpg` serves `Images/r42/roof.jpg`.
async fn serve_image(
    State(ctx): State<AppContext>,
    request_id: Option<Extension<RequestId>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(path) = path.map_err(|rejection| {
        AppError::for_request(
            Error::invalid_path(rejection.body_text()),
            request_id.as_ref(),
        )
    })?;

    let media = ctx
        .media
        .retrieve(path)
        .await
        .map_err(|e| AppError::for_request(e, request_id.as_ref()))?;

    Ok((
        StatusCode::OK,
        [
            (header::CACHE_CONTROL, IMMUTABLE_CACHE_CONTROL),
            (header::CONTENT_TYPE, media.content_type),
        ],
        media.data,
    )
        .into_response())
}
