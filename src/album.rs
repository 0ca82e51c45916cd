//! Opening a pin's album, replacing its photo collection, and describing how
//! one snapshot of a photo set turns into the next.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::db::{query, writer};
use crate::flickr::FlickrError;
use crate::models::photo::{NewPhoto, Photo};
use crate::pagination;
use crate::AppState;

#[derive(Debug, thiserror::Error)]
pub enum AlbumError {
    #[error("pin {0} not found")]
    PinNotFound(i64),
    #[error("photo {0} not found")]
    PhotoNotFound(i64),
    #[error(transparent)]
    Flickr(#[from] FlickrError),
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// One step from an old snapshot to a new one. `Delete` and `Move::from` index
/// the old snapshot; `Insert`, `Update` and `Move::to` index the new one.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PhotoChange {
    Delete { index: usize },
    Insert { index: usize },
    Update { index: usize },
    Move { from: usize, to: usize },
}

#[derive(Debug, Serialize, Clone)]
pub struct Collection {
    pub pin_id: i64,
    pub page: i64,
    pub total_pages: i64,
    pub photos: Vec<Photo>,
    pub changes: Vec<PhotoChange>,
}

/// The pin's photos. A pin without any gets its first collection fetched.
pub async fn open_album(state: &AppState, pin_id: i64) -> Result<Vec<Photo>, AlbumError> {
    let photos = state
        .with_db(move |conn| {
            if query::get_pin(conn, pin_id)?.is_none() {
                return Ok(None);
            }
            query::list_pin_photos(conn, pin_id).map(Some)
        })
        .await?
        .ok_or(AlbumError::PinNotFound(pin_id))?;

    if !photos.is_empty() {
        return Ok(photos);
    }
    debug!("pin {} has no photos yet, searching", pin_id);
    Ok(new_collection(state, pin_id).await?.photos)
}

/// Search for a fresh page of photos and swap it in for the pin's current set.
///
/// If the search fails nothing is written: the old photos and the pagination
/// cursor stay as they were.
pub async fn new_collection(state: &AppState, pin_id: i64) -> Result<Collection, AlbumError> {
    let (pin, before) = state
        .with_db(move |conn| match query::get_pin(conn, pin_id)? {
            Some(pin) => Ok(Some((pin, query::list_pin_photos(conn, pin_id)?))),
            None => Ok(None),
        })
        .await?
        .ok_or(AlbumError::PinNotFound(pin_id))?;

    let page = {
        let mut rng = state.rng.lock();
        pagination::choose_page(pin.total_pages, &mut *rng)
    };

    let resp = match state.flickr.search(pin.coordinate(), page).await {
        Ok(resp) => resp,
        Err(e) => {
            state.stats.inc_search_failures();
            warn!("search for pin {} (page {}) failed: {}", pin_id, page, e);
            return Err(e.into());
        }
    };
    state.stats.inc_searches();

    let total_pages = resp.photos.pages;
    let fresh: Vec<NewPhoto> = resp.photos.photo.into_iter().map(NewPhoto::from).collect();
    let after = state
        .with_db(move |conn| {
            writer::replace_pin_photos(conn, pin_id, &fresh, total_pages)?;
            query::list_pin_photos(conn, pin_id)
        })
        .await?;
    state.stats.inc_photos_stored(after.len() as u64);

    let changes = diff(&before, &after);
    info!(
        "pin {}: page {} of {}, {} photos replaced by {}",
        pin_id,
        page,
        total_pages,
        before.len(),
        after.len()
    );
    Ok(Collection { pin_id, page, total_pages, photos: after, changes })
}

/// Remove one photo from its pin's album.
pub async fn delete_photo(state: &AppState, photo_id: i64) -> Result<(), AlbumError> {
    let deleted = state.with_db(move |conn| writer::delete_photo(conn, photo_id)).await?;
    if !deleted {
        return Err(AlbumError::PhotoNotFound(photo_id));
    }
    debug!("deleted photo {}", photo_id);
    Ok(())
}

/// Image bytes for a photo: bytes already stored on the row, else the photo
/// cache, else the network. Downloaded bytes are written back to the row.
pub async fn photo_image(state: &AppState, photo_id: i64) -> Result<Bytes, AlbumError> {
    let photo = state
        .with_db(move |conn| query::get_photo(conn, photo_id))
        .await?
        .ok_or(AlbumError::PhotoNotFound(photo_id))?;

    if let Some(stored) = photo.image.clone() {
        state.stats.inc_images_served();
        return Ok(stored);
    }

    let bytes = match state.flickr.fetch_image_bytes(&photo, state.image_cache.as_ref()).await {
        Ok(bytes) => bytes,
        Err(e) => {
            state.stats.inc_image_failures();
            warn!("image for photo {} unavailable: {}", photo_id, e);
            return Err(e.into());
        }
    };

    let stored = bytes.clone();
    // The photo may have been replaced meanwhile; then there is no row to update.
    let kept = state.with_db(move |conn| writer::set_photo_image(conn, photo_id, &stored)).await?;
    if !kept {
        debug!("photo {} vanished before its image was stored", photo_id);
    }
    state.stats.inc_images_served();
    Ok(bytes)
}

fn same_content(a: &Photo, b: &Photo) -> bool {
    a.remote_id == b.remote_id
        && a.owner == b.owner
        && a.secret == b.secret
        && a.server == b.server
        && a.title == b.title
        && a.has_image == b.has_image
}

/// Changes that turn snapshot `old` into snapshot `new`, matching photos by
/// id. Moves are reported only for photos outside the longest run that kept
/// its relative order.
pub fn diff(old: &[Photo], new: &[Photo]) -> Vec<PhotoChange> {
    let old_pos: HashMap<i64, usize> = old.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
    let new_ids: HashMap<i64, usize> = new.iter().enumerate().map(|(j, p)| (p.id, j)).collect();

    let mut changes = Vec::new();
    for (i, p) in old.iter().enumerate() {
        if !new_ids.contains_key(&p.id) {
            changes.push(PhotoChange::Delete { index: i });
        }
    }

    let common: Vec<(usize, usize)> = new
        .iter()
        .enumerate()
        .filter_map(|(j, p)| old_pos.get(&p.id).map(|&i| (i, j)))
        .collect();
    let old_order: Vec<usize> = common.iter().map(|&(i, _)| i).collect();
    let in_place = longest_increasing(&old_order);
    for (k, &(i, j)) in common.iter().enumerate() {
        if !in_place[k] {
            changes.push(PhotoChange::Move { from: i, to: j });
        }
        if !same_content(&old[i], &new[j]) {
            changes.push(PhotoChange::Update { index: j });
        }
    }

    for (j, p) in new.iter().enumerate() {
        if !old_pos.contains_key(&p.id) {
            changes.push(PhotoChange::Insert { index: j });
        }
    }
    changes
}

// Marks the members of one longest strictly increasing subsequence.
fn longest_increasing(seq: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];
    for i in 0..seq.len() {
        let pos = tails.partition_point(|&t| seq[t] < seq[i]);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }
    let mut keep = vec![false; seq.len()];
    let mut cur = tails.last().copied();
    while let Some(i) = cur {
        keep[i] = true;
        cur = prev[i];
    }
    keep
}
