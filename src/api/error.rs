use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::album::AlbumError;
use crate::flickr::FlickrError;

/// What a client sees when a request fails: a status code and
/// `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Album(#[from] AlbumError),
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Album(AlbumError::PinNotFound(_)) | ApiError::Album(AlbumError::PhotoNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Album(AlbumError::Flickr(FlickrError::MalformedPhoto(_))) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Album(AlbumError::Flickr(FlickrError::InvalidUrl(_))) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Album(AlbumError::Flickr(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Album(AlbumError::Storage(_)) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{} {}", status.as_u16(), self);
        } else {
            tracing::debug!("{} {}", status.as_u16(), self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
