use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::album;
use crate::api::error::ApiError;
use crate::db::{query, writer};
use crate::flickr;
use crate::models::photo::{Paged, Photo};
use crate::models::pin::{Coordinate, Pin};
use crate::models::region::MapRegion;
use crate::AppState;

pub async fn health() -> impl IntoResponse {
    let body = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "database": "SQLite",
    });
    (StatusCode::OK, Json(body))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let pins = state.with_db(query::count_pins).await?;
    let body = serde_json::json!({
        "pins": pins,
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
        "flickr": state.stats.snapshot(),
        "per_page": state.flickr.per_page(),
    });
    Ok((StatusCode::OK, Json(body)))
}

// Pin handlers

#[derive(Deserialize)]
pub struct CreatePinRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize)]
pub struct AlbumResponse {
    pub pin_id: i64,
    pub photos: Vec<Photo>,
}

pub async fn list_pins(State(state): State<Arc<AppState>>) -> Result<Json<Paged<Pin>>, ApiError> {
    let items = state.with_db(query::list_pins).await?;
    Ok(Json(Paged { total: items.len() as i64, items }))
}

pub async fn create_pin(State(state): State<Arc<AppState>>, Json(req): Json<CreatePinRequest>) -> Result<impl IntoResponse, ApiError> {
    let coordinate = Coordinate::new(req.latitude, req.longitude);
    if !coordinate.is_valid() {
        return Err(ApiError::BadRequest(format!(
            "invalid coordinate ({}, {})",
            req.latitude, req.longitude
        )));
    }
    let pin = state
        .with_db(move |conn| {
            let id = writer::create_pin(conn, coordinate)?;
            query::get_pin(conn, id)?.ok_or_else(|| anyhow::anyhow!("Failed to retrieve created pin"))
        })
        .await?;
    info!("created pin {} at ({}, {})", pin.id, pin.latitude, pin.longitude);
    Ok((StatusCode::CREATED, Json(pin)))
}

pub async fn get_pin(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<Json<Pin>, ApiError> {
    let pin = state
        .with_db(move |conn| query::get_pin(conn, id))
        .await?
        .ok_or(album::AlbumError::PinNotFound(id))?;
    Ok(Json(pin))
}

pub async fn pin_photos(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<Json<AlbumResponse>, ApiError> {
    let photos = album::open_album(&state, id).await?;
    Ok(Json(AlbumResponse { pin_id: id, photos }))
}

pub async fn refresh_pin_photos(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<Json<album::Collection>, ApiError> {
    let collection = album::new_collection(&state, id).await?;
    Ok(Json(collection))
}

// Photo handlers

pub async fn delete_photo(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<impl IntoResponse, ApiError> {
    album::delete_photo(&state, id).await?;
    Ok((StatusCode::OK, Json(serde_json::json!({ "success": true }))))
}

pub async fn photo_image(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<impl IntoResponse, ApiError> {
    let bytes = album::photo_image(&state, id).await?;
    let mime = flickr::image_mime(&bytes);
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime), (header::CACHE_CONTROL, "public, max-age=86400")],
        bytes,
    ))
}

// Map region handlers

pub async fn get_region(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let region = state.with_db(query::load_map_region).await?;
    Ok(Json(serde_json::json!({ "region": region })))
}

pub async fn put_region(State(state): State<Arc<AppState>>, Json(region): Json<MapRegion>) -> Result<Json<MapRegion>, ApiError> {
    if !region.is_valid() {
        return Err(ApiError::BadRequest("invalid map region".to_string()));
    }
    state.with_db(move |conn| writer::save_map_region(conn, &region)).await?;
    Ok(Json(region))
}
