use axum::{Router, routing::{get, post, delete}};
use std::sync::Arc;
use tower_http::cors::{CorsLayer, AllowOrigin};
use axum::http::Method;
use crate::AppState;
use crate::api::handlers;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(vec![axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route("/pins", get(handlers::list_pins).post(handlers::create_pin))
        .route("/pins/:id", get(handlers::get_pin))
        // More specific routes must come before less specific ones
        .route("/pins/:id/photos/refresh", post(handlers::refresh_pin_photos))
        .route("/pins/:id/photos", get(handlers::pin_photos))
        .route("/photos/:id", delete(handlers::delete_photo))
        .route("/photos/:id/image", get(handlers::photo_image))
        .route("/region", get(handlers::get_region).put(handlers::put_region))
        .layer(cors)
        .with_state(state)
}
