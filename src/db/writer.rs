use anyhow::Result;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::models::photo::NewPhoto;
use crate::models::pin::Coordinate;
use crate::models::region::{self, MapRegion};

/// Create a pin at `coordinate` with a fresh uuid and no pagination cursor
pub fn create_pin(conn: &Connection, coordinate: Coordinate) -> Result<i64> {
    let now = chrono::Utc::now().timestamp();
    let uuid = Uuid::new_v4();
    conn.execute(
        "INSERT INTO pins (uuid, latitude, longitude, total_pages, created_at) VALUES (?1, ?2, ?3, NULL, ?4)",
        params![uuid.to_string(), coordinate.latitude, coordinate.longitude, now],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Swap a pin's photo set for `photos` and store the new cursor.
///
/// Old rows are deleted before the new ones are inserted, all in a single
/// transaction: readers see either the old set or the new one.
/// Returns the number of rows inserted.
pub fn replace_pin_photos(conn: &Connection, pin_id: i64, photos: &[NewPhoto], total_pages: i64) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;

    let exists = tx.execute("UPDATE pins SET total_pages = ?1 WHERE id = ?2", params![total_pages, pin_id])?;
    if exists == 0 {
        tx.rollback()?;
        return Err(anyhow::anyhow!("pin {} does not exist", pin_id));
    }

    tx.execute("DELETE FROM photos WHERE pin_id = ?1", params![pin_id])?;

    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO photos (pin_id, position, remote_id, owner, secret, server, title, image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)",
        )?;
        for (position, p) in photos.iter().enumerate() {
            stmt.execute(params![pin_id, position as i64, p.remote_id, p.owner, p.secret, p.server, p.title])?;
            inserted += 1;
        }
    }

    tx.commit()?;
    Ok(inserted)
}

/// Delete a single photo
pub fn delete_photo(conn: &Connection, photo_id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM photos WHERE id = ?1", params![photo_id])?;
    Ok(deleted > 0)
}

/// Keep downloaded image bytes on the photo row
pub fn set_photo_image(conn: &Connection, photo_id: i64, image: &[u8]) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE photos SET image = ?1 WHERE id = ?2",
        params![image, photo_id],
    )?;
    Ok(updated > 0)
}

/// Persist the map viewport under its four fixed keys
pub fn save_map_region(conn: &Connection, r: &MapRegion) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let tx = conn.unchecked_transaction()?;
    for (key, value) in [
        (region::KEY_CENTER_LONGITUDE, r.center_longitude),
        (region::KEY_CENTER_LATITUDE, r.center_latitude),
        (region::KEY_SPAN_LONGITUDE_DELTA, r.longitude_delta),
        (region::KEY_SPAN_LATITUDE_DELTA, r.latitude_delta),
    ] {
        tx.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
    }
    tx.commit()?;
    Ok(())
}
