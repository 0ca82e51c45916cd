use anyhow::Result;
use bytes::Bytes;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::photo::Photo;
use crate::models::pin::Pin;
use crate::models::region::{self, MapRegion};

const PIN_COLUMNS: &str = "id, uuid, latitude, longitude, total_pages, created_at";

fn row_to_pin(row: &Row<'_>) -> rusqlite::Result<Pin> {
    let raw: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    Ok(Pin {
        id: row.get("id")?,
        uuid,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        total_pages: row.get("total_pages")?,
        created_at: row.get("created_at")?,
    })
}

// Listing leaves the blob behind; `has_image` says whether one is stored.
fn row_to_photo(row: &Row<'_>, with_image: bool) -> rusqlite::Result<Photo> {
    let image = if with_image {
        row.get::<_, Option<Vec<u8>>>("image")?.map(Bytes::from)
    } else {
        None
    };
    Ok(Photo {
        id: row.get("id")?,
        pin_id: row.get("pin_id")?,
        remote_id: row.get("remote_id")?,
        owner: row.get("owner")?,
        secret: row.get("secret")?,
        server: row.get("server")?,
        title: row.get("title")?,
        image,
        has_image: row.get("has_image")?,
    })
}

pub fn count_pins(conn: &Connection) -> Result<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM pins", [], |r| r.get(0))?;
    Ok(n)
}

pub fn get_pin(conn: &Connection, pin_id: i64) -> Result<Option<Pin>> {
    let sql = format!("SELECT {} FROM pins WHERE id = ?1", PIN_COLUMNS);
    let pin = conn.query_row(&sql, params![pin_id], row_to_pin).optional()?;
    Ok(pin)
}

/// All pins, oldest first
pub fn list_pins(conn: &Connection) -> Result<Vec<Pin>> {
    let sql = format!("SELECT {} FROM pins ORDER BY id", PIN_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_pin)?;
    let mut pins = Vec::new();
    for row in rows {
        pins.push(row?);
    }
    Ok(pins)
}

pub fn count_pin_photos(conn: &Connection, pin_id: i64) -> Result<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM photos WHERE pin_id = ?1", params![pin_id], |r| r.get(0))?;
    Ok(n)
}

/// A pin's photos in the order the search returned them, without image bytes
pub fn list_pin_photos(conn: &Connection, pin_id: i64) -> Result<Vec<Photo>> {
    let mut stmt = conn.prepare(
        "SELECT id, pin_id, remote_id, owner, secret, server, title, image IS NOT NULL AS has_image
         FROM photos WHERE pin_id = ?1 ORDER BY position, id",
    )?;
    let rows = stmt.query_map(params![pin_id], |row| row_to_photo(row, false))?;
    let mut photos = Vec::new();
    for row in rows {
        photos.push(row?);
    }
    Ok(photos)
}

/// One photo including any stored image bytes
pub fn get_photo(conn: &Connection, photo_id: i64) -> Result<Option<Photo>> {
    let photo = conn
        .query_row(
            "SELECT id, pin_id, remote_id, owner, secret, server, title, image, image IS NOT NULL AS has_image
             FROM photos WHERE id = ?1",
            params![photo_id],
            |row| row_to_photo(row, true),
        )
        .optional()?;
    Ok(photo)
}

/// The saved viewport, if all four components were stored and non-zero.
pub fn load_map_region(conn: &Connection) -> Result<Option<MapRegion>> {
    let value = |key: &str| -> Result<f64> {
        let v: Option<f64> = conn
            .query_row("SELECT value FROM settings WHERE key = ?1", params![key], |r| r.get(0))
            .optional()?;
        Ok(v.unwrap_or(0.0))
    };
    let r = MapRegion {
        center_latitude: value(region::KEY_CENTER_LATITUDE)?,
        center_longitude: value(region::KEY_CENTER_LONGITUDE)?,
        latitude_delta: value(region::KEY_SPAN_LATITUDE_DELTA)?,
        longitude_delta: value(region::KEY_SPAN_LONGITUDE_DELTA)?,
    };
    Ok(if r.is_restorable() { Some(r) } else { None })
}
