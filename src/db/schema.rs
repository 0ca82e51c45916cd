use anyhow::Result;
use rusqlite::Connection;

pub fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    // Photo rows cascade from their pin.
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS pins (
  id INTEGER PRIMARY KEY,
  uuid TEXT NOT NULL UNIQUE,
  latitude REAL NOT NULL,
  longitude REAL NOT NULL,
  total_pages INTEGER,
  created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS photos (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  pin_id INTEGER NOT NULL,
  position INTEGER NOT NULL DEFAULT 0,
  remote_id TEXT NOT NULL,
  owner TEXT NOT NULL,
  secret TEXT NOT NULL,
  server TEXT NOT NULL,
  title TEXT NOT NULL,
  image BLOB,
  FOREIGN KEY(pin_id) REFERENCES pins(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_photos_pin ON photos(pin_id, position);

CREATE TABLE IF NOT EXISTS settings (
  key TEXT PRIMARY KEY,
  value REAL NOT NULL,
  updated_at INTEGER NOT NULL
);
    "#,
    )?;

    // Backwards-compatible migration: databases from before the pagination
    // cursor was kept per pin lack total_pages.
    let mut stmt = conn.prepare("PRAGMA table_info(pins)")?;
    let mut has_total_pages = false;
    {
        let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
        for name in rows {
            if name.unwrap_or_default() == "total_pages" {
                has_total_pages = true;
                break;
            }
        }
    }
    if !has_total_pages {
        conn.execute("ALTER TABLE pins ADD COLUMN total_pages INTEGER", [])?;
    }

    Ok(())
}
