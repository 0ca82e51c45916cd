use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Photo metadata persisted for a pin. `image` holds the downloaded bytes once
/// they have been fetched; it is never sent over JSON.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Photo {
    pub id: i64,
    pub pin_id: i64,
    pub remote_id: String,
    pub owner: String,
    pub secret: String,
    pub server: String,
    pub title: String,
    #[serde(skip)]
    pub image: Option<Bytes>,
    #[serde(default)]
    pub has_image: bool,
}

/// Fields of a photo before it has a row of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub remote_id: String,
    pub owner: String,
    pub secret: String,
    pub server: String,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Paged<T> {
    pub total: i64,
    pub items: Vec<T>,
}
