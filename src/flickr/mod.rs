//! Client for the Flickr REST search and static image endpoints.

pub mod response;

use bytes::Bytes;
use image::ImageFormat;
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::cache::ImageCache;
use crate::models::photo::Photo;
use crate::models::pin::Coordinate;
use crate::utils::config::Config;
pub use response::{FlickrPhoto, PhotoContainer, SearchResponse};

pub const DEFAULT_BASE_URL: &str = "https://www.flickr.com/services/rest";
pub const DEFAULT_IMAGE_HOST: &str = "https://live.staticflickr.com";
pub const SEARCH_METHOD: &str = "flickr.photos.search";

#[derive(Debug, thiserror::Error)]
pub enum FlickrError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Flickr returned stat={stat}: {message}")]
    Api { stat: String, message: String },
    #[error("photo is missing its {0}")]
    MalformedPhoto(&'static str),
    #[error("response is not a recognised image")]
    NotAnImage,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint<'a> {
    Search { coordinate: Coordinate, page: i64, per_page: u32 },
    Photo { server: &'a str, id: &'a str, secret: &'a str },
}

impl Endpoint<'_> {
    pub fn url(&self, base_url: &str, image_host: &str, api_key: &str) -> Result<Url, FlickrError> {
        match self {
            Endpoint::Search { coordinate, page, per_page } => {
                let params = [
                    ("method", SEARCH_METHOD.to_string()),
                    ("api_key", api_key.to_string()),
                    ("lat", coordinate.latitude.to_string()),
                    ("lon", coordinate.longitude.to_string()),
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                    ("format", "json".to_string()),
                    ("nojsoncallback", "1".to_string()),
                ];
                Url::parse_with_params(base_url, &params).map_err(|e| FlickrError::InvalidUrl(e.to_string()))
            }
            Endpoint::Photo { server, id, secret } => {
                let server = required(server, "server")?;
                let id = required(id, "id")?;
                let secret = required(secret, "secret")?;
                let raw = format!("{}/{}/{}_{}.jpg", image_host.trim_end_matches('/'), server, id, secret);
                Url::parse(&raw).map_err(|e| FlickrError::InvalidUrl(e.to_string()))
            }
        }
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, FlickrError> {
    let v = value.trim();
    if v.is_empty() || !v.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(FlickrError::MalformedPhoto(field));
    }
    Ok(v)
}

/// MIME type for downloaded image bytes, sniffed from the magic number.
pub fn image_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        _ => "application/octet-stream",
    }
}

#[derive(Clone)]
pub struct FlickrClient {
    http: reqwest::Client,
    base_url: String,
    image_host: String,
    api_key: String,
    per_page: u32,
}

impl FlickrClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, image_host: impl Into<String>, per_page: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            image_host: image_host.into(),
            api_key: api_key.into(),
            per_page,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.api_key.clone(), cfg.flickr_base_url.clone(), cfg.image_host.clone(), cfg.per_page)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn search_url(&self, coordinate: Coordinate, page: i64) -> Result<Url, FlickrError> {
        Endpoint::Search { coordinate, page, per_page: self.per_page }.url(&self.base_url, &self.image_host, &self.api_key)
    }

    /// The image URL doubles as the cache key.
    pub fn image_url(&self, photo: &Photo) -> Result<Url, FlickrError> {
        Endpoint::Photo { server: &photo.server, id: &photo.remote_id, secret: &photo.secret }
            .url(&self.base_url, &self.image_host, &self.api_key)
    }

    /// Fetch one page of photos near `coordinate`. Nothing is persisted here;
    /// the caller records `photos.pages` as the pin's new cursor.
    pub async fn search(&self, coordinate: Coordinate, page: i64) -> Result<SearchResponse, FlickrError> {
        let url = self.search_url(coordinate, page)?;
        debug!("flickr search lat={} lon={} page={}", coordinate.latitude, coordinate.longitude, page);
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!("flickr search returned {}", status);
            return Err(FlickrError::Status(status));
        }
        let body = resp.bytes().await?;
        let envelope: response::Envelope = serde_json::from_slice(&body)?;
        if envelope.stat != "ok" {
            let message = match (envelope.code, envelope.message) {
                (Some(code), Some(msg)) => format!("{} (code {})", msg, code),
                (None, Some(msg)) => msg,
                (Some(code), None) => format!("code {}", code),
                (None, None) => "no message".to_string(),
            };
            return Err(FlickrError::Api { stat: envelope.stat, message });
        }
        let photos = envelope.photos.ok_or(FlickrError::Api {
            stat: envelope.stat.clone(),
            message: "response has no photos".to_string(),
        })?;
        Ok(SearchResponse { photos, stat: envelope.stat })
    }

    /// Image bytes for `photo`, from `cache` when present, otherwise from the
    /// network. Only bytes that look like an image are cached.
    pub async fn fetch_image_bytes(&self, photo: &Photo, cache: &dyn ImageCache) -> Result<Bytes, FlickrError> {
        let url = self.image_url(photo)?;
        let key = url.as_str();
        if let Some(hit) = cache.get(key) {
            debug!("image cache hit {}", key);
            return Ok(hit);
        }
        debug!("image cache miss {}", key);
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FlickrError::Status(status));
        }
        let bytes = resp.bytes().await?;
        if image::guess_format(&bytes).is_err() {
            return Err(FlickrError::NotAnImage);
        }
        cache.set(key, bytes.clone());
        Ok(bytes)
    }
}
