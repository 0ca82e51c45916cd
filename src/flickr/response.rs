use serde::{Deserialize, Deserializer, Serialize};

use crate::models::photo::NewPhoto;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchResponse {
    pub photos: PhotoContainer,
    pub stat: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PhotoContainer {
    #[serde(deserialize_with = "int_or_string")]
    pub page: i64,
    #[serde(deserialize_with = "int_or_string")]
    pub pages: i64,
    #[serde(deserialize_with = "int_or_string")]
    pub perpage: i64,
    #[serde(deserialize_with = "int_or_string")]
    pub total: i64,
    #[serde(default)]
    pub photo: Vec<FlickrPhoto>,
}

/// One entry of a search page. Missing identifying fields decode as empty
/// strings and are rejected later, when an image URL is built from them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FlickrPhoto {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub title: String,
}

impl From<FlickrPhoto> for NewPhoto {
    fn from(p: FlickrPhoto) -> Self {
        NewPhoto {
            remote_id: p.id,
            owner: p.owner,
            secret: p.secret,
            server: p.server,
            title: p.title,
        }
    }
}

/// Everything Flickr may send back, success or failure.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub stat: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub photos: Option<PhotoContainer>,
}

// Older API responses quote the counters.
fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
