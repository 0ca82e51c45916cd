use std::env;
use std::path::PathBuf;

use crate::cache::CacheMode;

#[derive(Clone, Debug)]
pub struct Config {
    pub data: PathBuf,
    pub port: u16,
    pub api_key: String,
    pub flickr_base_url: String,
    pub image_host: String,
    pub per_page: u32,
    pub cache_mode: CacheMode,
}

impl Config {
    pub fn from_env() -> Self {
        let data = env::var("VT_DATA").unwrap_or_else(|_| "/vt-data".to_string());
        let port = env::var("VT_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(9171);
        let api_key = env::var("VT_FLICKR_API_KEY").unwrap_or_default();
        let flickr_base_url = env::var("VT_FLICKR_BASE_URL").unwrap_or_else(|_| crate::flickr::DEFAULT_BASE_URL.to_string());
        let image_host = env::var("VT_IMAGE_HOST").unwrap_or_else(|_| crate::flickr::DEFAULT_IMAGE_HOST.to_string());
        let per_page = env::var("VT_PER_PAGE").ok().and_then(|v| v.parse().ok()).filter(|n| *n > 0).unwrap_or(10);
        let cache_mode = env::var("VT_CACHE_MODE").ok().and_then(|v| v.parse().ok()).unwrap_or(CacheMode::Memory);
        Self {
            data: PathBuf::from(data),
            port,
            api_key,
            flickr_base_url,
            image_host,
            per_page,
            cache_mode,
        }
    }
}
