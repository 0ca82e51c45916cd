pub mod schema;
pub mod writer;
pub mod query;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub fn open_or_create<P: AsRef<Path>>(db_path: P) -> Result<Connection> {
    let db_path = db_path.as_ref();
    let conn = Connection::open(db_path).with_context(|| format!("opening database {:?}", db_path))?;
    schema::apply_pragmas(&conn)?;
    schema::apply_schema(&conn)?;
    Ok(conn)
}

/// Private in-memory store, used by tests and tooling.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::apply_schema(&conn)?;
    Ok(conn)
}
